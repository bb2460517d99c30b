// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data model (records, pages, counters, summaries, trend points) shared by the core and rendering
// role: model/types
// outputs: Serializable structs with stable snake_case field names
// invariants: Counters are non-negative; trend dates serialize as YYYY-MM-DD; outcome labels always enumerated
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One issue/item as returned by the search endpoint, after normalization.
///
/// Only the fields requested via the search projection are populated; absent
/// optional fields stay `None` and are tolerated downstream (sparse data is
/// legitimate, not a failure).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Record {
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub type_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resolved: Option<String>,
}

/// One page of search results plus the source's declared total at fetch time.
/// `total_known` may drift across pages when the source mutates between calls.
#[derive(Debug, Clone)]
pub struct PageResult {
  pub records: Vec<Record>,
  pub total_known: usize,
  pub returned_count: usize,
}

/// A record plus its categorical summary. Produced by `Classifier`; consumed
/// read-only by `Aggregator`.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord {
  pub record: Record,
  pub is_test_artifact: bool,
  pub is_urgent: bool,
  pub status_name: String,
}

/// Running counters over a classified record stream. Merging is commutative
/// so per-worker accumulators can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounters {
  pub status_counts: BTreeMap<String, u64>,
  pub urgent_count: u64,
  pub outcome_counts: BTreeMap<String, u64>,
}

impl BucketCounters {
  pub fn merge(&mut self, other: BucketCounters) {
    for (status, n) in other.status_counts {
      *self.status_counts.entry(status).or_insert(0) += n;
    }
    self.urgent_count += other.urgent_count;
    for (label, n) in other.outcome_counts {
      *self.outcome_counts.entry(label).or_insert(0) += n;
    }
  }

  pub fn total_records(&self) -> u64 {
    self.status_counts.values().sum()
  }
}

pub const URGENT_MESSAGE: &str = "Needs immediate attention";
pub const CALM_MESSAGE: &str = "No urgent items";

/// The boundary-facing summary shape for `summary` and `scan`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardSummary {
  pub total_records: u64,
  pub status_counts: BTreeMap<String, u64>,
  pub urgent_count: u64,
  pub urgent_message: String,
  pub outcome_counts: BTreeMap<String, u64>,
}

impl From<BucketCounters> for BoardSummary {
  fn from(counters: BucketCounters) -> Self {
    let message = if counters.urgent_count > 0 {
      URGENT_MESSAGE
    } else {
      CALM_MESSAGE
    };

    BoardSummary {
      total_records: counters.total_records(),
      status_counts: counters.status_counts,
      urgent_count: counters.urgent_count,
      urgent_message: message.to_string(),
      outcome_counts: counters.outcome_counts,
    }
  }
}

/// One calendar day in a trend series. Serializes `date` as YYYY-MM-DD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
  pub date: NaiveDate,
  pub resolved_count: u64,
  pub avg_resolution_days: f64,
}

/// Contiguous, gap-filled daily series: exactly one point per day in the
/// requested window, strictly ascending dates.
pub type TrendSeries = Vec<DailyTrendPoint>;
