// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Bucket resolution latency by resolved day and emit a contiguous, gap-filled daily series
// role: core/trend-builder
// inputs: Records carrying created/resolved timestamps; window start date and length in days
// outputs: TrendSeries with exactly one point per window day
// invariants:
// - Series length equals the requested window length regardless of activity
// - Day boundaries are UTC for both timestamps; zone-less data is rejected, never assumed local
// - Negative latencies are kept visible, not clamped
// errors: InvalidWindow for non-positive lengths; Protocol for malformed timestamps
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::model::{DailyTrendPoint, Record, TrendSeries};
use crate::util::{latency_days, round2, utc_date};

/// Build the daily resolution-latency trend for `[window_start,
/// window_start + window_days)`.
///
/// Unresolved records (missing either timestamp) are skipped; they are open,
/// not anomalous. Days with no resolutions still get a point with zeros, since
/// a plain group-by would drop them and break fixed-length charts downstream.
pub fn build_trend(records: &[Record], window_start: NaiveDate, window_days: i64) -> Result<TrendSeries> {
  if window_days <= 0 {
    return Err(Error::InvalidWindow(format!(
      "window length must be positive, got {window_days}"
    )));
  }

  let mut buckets: BTreeMap<NaiveDate, Vec<i64>> = BTreeMap::new();

  for record in records {
    let (Some(created), Some(resolved)) = (&record.created, &record.resolved) else {
      continue;
    };

    let latency = latency_days(created, resolved)?;
    let resolved_day = utc_date(resolved)?;

    buckets.entry(resolved_day).or_default().push(latency);
  }

  let mut series: TrendSeries = Vec::with_capacity(window_days as usize);

  for n in 0..window_days {
    let date = window_start + Duration::days(n);

    let point = match buckets.get(&date) {
      Some(latencies) => {
        let sum: i64 = latencies.iter().sum();
        DailyTrendPoint {
          date,
          resolved_count: latencies.len() as u64,
          avg_resolution_days: round2(sum as f64 / latencies.len() as f64),
        }
      }
      None => DailyTrendPoint {
        date,
        resolved_count: 0,
        avg_resolution_days: 0.0,
      },
    };

    series.push(point);
  }

  Ok(series)
}
