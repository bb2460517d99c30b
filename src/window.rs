use chrono::{DateTime, Duration, NaiveDate, Utc};

// Trend-window helpers live here to keep the CLI focused.

/// Parse a `--now-override` string into a UTC instant.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`, interpreted as UTC.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    chrono::DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .map(|ndt| ndt.and_utc())
      })
  })
}

/// Resolve the first day of a trend window.
///
/// An explicit start wins; otherwise the window is the trailing `window_days`
/// ending today (UTC), matching a rolling-dashboard default.
pub fn resolve_window_start(
  explicit: Option<NaiveDate>,
  window_days: i64,
  now: Option<DateTime<Utc>>,
) -> NaiveDate {
  if let Some(start) = explicit {
    return start;
  }

  let today = now.unwrap_or_else(Utc::now).date_naive();
  today - Duration::days(window_days.saturating_sub(1).max(0))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_start_wins() {
    let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let now = parse_now_override(Some("2025-08-15T12:00:00Z"));
    assert_eq!(resolve_window_start(Some(start), 30, now), start);
  }

  #[test]
  fn default_is_trailing_window_ending_today() {
    let now = parse_now_override(Some("2025-08-15T12:00:00Z"));
    let start = resolve_window_start(None, 30, now);
    assert_eq!(start, NaiveDate::from_ymd_opt(2025, 7, 17).unwrap());

    // start + 29 days == today, so today is the window's last day
    assert_eq!(start + Duration::days(29), NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
  }

  #[test]
  fn now_override_accepts_naive_utc() {
    let now = parse_now_override(Some("2025-08-15T00:00:00")).unwrap();
    assert_eq!(now.date_naive(), NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
  }

  #[test]
  fn unparseable_now_override_is_none() {
    assert_eq!(parse_now_override(Some("nope")), None);
    assert_eq!(parse_now_override(None), None);
  }
}
