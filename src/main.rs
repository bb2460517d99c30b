use anyhow::Result;
use clap::Parser;

mod aggregate;
mod classify;
mod cli;
mod error;
mod ext;
mod model;
mod paginate;
mod render;
mod scan;
mod source;
mod trend;
mod util;
mod window;

use crate::cli::{Action, Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: build the record source (env-backed fixtures or HTTP)
  let source = source::build_source(cfg.base_url.as_deref(), cfg.timeout)?;

  // Phase 3: run the requested aggregation
  let classifier = classify::Classifier::new(&cfg.vocabulary);
  let aggregator = aggregate::Aggregator::new(&cfg.vocabulary);

  match &cfg.action {
    Action::Summary { filter } => {
      let records = paginate::fetch_all(source.as_ref(), filter, cfg.page_size, source::SUMMARY_FIELDS)?;
      let counters = aggregator.aggregate(records.into_iter().map(|r| classifier.classify(r)));
      render::write_json(&model::BoardSummary::from(counters), &cfg.out)
    }
    Action::Scan {
      projects,
      filter_template,
    } => {
      let keys = if projects.is_empty() {
        source.list_project_keys()?
      } else {
        projects.clone()
      };

      if keys.is_empty() {
        eprintln!("[scan] no projects given or discovered; emitting an empty summary");
      }

      let scanner =
        scan::ProjectScanner::new(source.as_ref(), &classifier, &aggregator, cfg.page_size, cfg.workers);
      let counters = scanner.scan_all(&keys, filter_template)?;
      render::write_json(&model::BoardSummary::from(counters), &cfg.out)
    }
    Action::Trend {
      project,
      filter,
      window_days,
      window_start,
    } => {
      let now = window::parse_now_override(cfg.now_override.as_deref());
      let start = window::resolve_window_start(*window_start, *window_days, now);
      let query = filter
        .clone()
        .unwrap_or_else(|| trend_filter(project.as_deref(), start));

      let records = paginate::fetch_all(source.as_ref(), &query, cfg.page_size, source::TREND_FIELDS)?;
      let series = trend::build_trend(&records, start, *window_days)?;
      render::write_json(&series, &cfg.out)
    }
  }
}

/// Default trend query: project scope plus a resolution-date floor, ordered
/// so pages arrive in resolution order.
fn trend_filter(project: Option<&str>, window_start: chrono::NaiveDate) -> String {
  let mut clauses = Vec::new();

  if let Some(key) = project {
    clauses.push(format!("project = \"{key}\""));
  }
  clauses.push(format!("resolutiondate >= \"{window_start}\""));

  format!("{} ORDER BY resolutiondate ASC", clauses.join(" AND "))
}
