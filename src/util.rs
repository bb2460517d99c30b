// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Timestamp canonicalization to UTC, day arithmetic, rounding, and man page rendering
// role: utilities/helpers
// inputs: Tracker timestamp strings (RFC3339 or offset without colon); clap CommandFactory
// outputs: UTC instants and dates; two-decimal averages; troff man page text
// invariants:
// - parse_utc rejects zone-less timestamps instead of assuming local time
// - latency is calendar-day truncation of both UTC date components, never fractional
// errors: Malformed timestamps surface as Error::Protocol
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, NaiveDate, Utc};
use clap::CommandFactory;

use crate::error::{Error, Result};

/// Parse a tracker timestamp into a UTC instant.
///
/// Accepts RFC3339 (`2025-01-05T10:30:00Z`, `...+05:30`) and the common
/// tracker variant with a colon-less offset (`2025-01-05T10:30:00.000+0530`).
/// Timestamps without zone information are rejected: assuming local time
/// would shift day boundaries and skew every bucket downstream.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }

  if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
    return Ok(dt.with_timezone(&Utc));
  }

  Err(Error::Protocol(format!(
    "timestamp {raw:?} is not zone-aware ISO-8601"
  )))
}

/// UTC calendar date of a tracker timestamp.
pub fn utc_date(raw: &str) -> Result<NaiveDate> {
  Ok(parse_utc(raw)?.date_naive())
}

/// Whole-day latency between two timestamps: the difference of their UTC date
/// components. Negative when resolved precedes created; anomalies stay
/// visible rather than being clamped.
pub fn latency_days(created: &str, resolved: &str) -> Result<i64> {
  let c = utc_date(created)?;
  let r = utc_date(resolved)?;
  Ok((r - c).num_days())
}

/// Round to two decimal places for reported averages.
pub fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
