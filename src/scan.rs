// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Repeat Paginator+Classifier+Aggregator per project key and merge totals for organization-wide summaries
// role: orchestration/project-scanner
// inputs: Project keys, a filter template with a {key} placeholder, worker limit
// outputs: Merged BucketCounters across all projects
// invariants:
// - Page order within one project is strictly sequential
// - Any project failure fails the whole scan; no partial-organization summary is ever surfaced
// - Workers keep private accumulators, merged after the fact; no shared mutable counters
// errors: First SourceUnavailable/Protocol error aborts and propagates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use rayon::prelude::*;

use crate::aggregate::Aggregator;
use crate::classify::Classifier;
use crate::error::Result;
use crate::model::BucketCounters;
use crate::paginate::fetch_all;
use crate::source::{RecordSource, SUMMARY_FIELDS};

/// Placeholder substituted with the project key in filter templates.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Default per-project filter when the caller supplies none.
pub const DEFAULT_FILTER_TEMPLATE: &str = "project = \"{key}\"";

pub struct ProjectScanner<'a> {
  source: &'a dyn RecordSource,
  classifier: &'a Classifier,
  aggregator: &'a Aggregator,
  page_size: usize,
  worker_limit: usize,
}

impl<'a> ProjectScanner<'a> {
  pub fn new(
    source: &'a dyn RecordSource,
    classifier: &'a Classifier,
    aggregator: &'a Aggregator,
    page_size: usize,
    worker_limit: usize,
  ) -> Self {
    ProjectScanner {
      source,
      classifier,
      aggregator,
      page_size,
      worker_limit: worker_limit.max(1),
    }
  }

  /// Scan every project and merge counters. Projects are independent, so they
  /// may run concurrently up to `worker_limit`; a single failure discards the
  /// whole scan.
  pub fn scan_all(&self, project_keys: &[String], filter_template: &str) -> Result<BucketCounters> {
    if project_keys.is_empty() {
      return Ok(self.aggregator.empty_counters());
    }

    if self.worker_limit == 1 || project_keys.len() == 1 {
      return self.scan_sequential(project_keys, filter_template);
    }

    let pool = match rayon::ThreadPoolBuilder::new()
      .num_threads(self.worker_limit.min(project_keys.len()))
      .build()
    {
      Ok(pool) => pool,
      Err(e) => {
        eprintln!("[scan] worker pool unavailable ({e}); scanning sequentially");
        return self.scan_sequential(project_keys, filter_template);
      }
    };

    let partials: Result<Vec<BucketCounters>> = pool.install(|| {
      project_keys
        .par_iter()
        .map(|key| self.scan_one(key, filter_template))
        .collect()
    });

    Ok(merge_partials(self.aggregator.empty_counters(), partials?))
  }

  fn scan_sequential(&self, project_keys: &[String], filter_template: &str) -> Result<BucketCounters> {
    let mut merged = self.aggregator.empty_counters();

    for key in project_keys {
      merged.merge(self.scan_one(key, filter_template)?);
    }

    Ok(merged)
  }

  fn scan_one(&self, key: &str, filter_template: &str) -> Result<BucketCounters> {
    let filter = filter_template.replace(KEY_PLACEHOLDER, key);
    let records = fetch_all(self.source, &filter, self.page_size, SUMMARY_FIELDS)?;

    Ok(
      self
        .aggregator
        .aggregate(records.into_iter().map(|r| self.classifier.classify(r))),
    )
  }
}

fn merge_partials(mut merged: BucketCounters, partials: Vec<BucketCounters>) -> BucketCounters {
  for partial in partials {
    merged.merge(partial);
  }
  merged
}
