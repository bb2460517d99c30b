use thiserror::Error;

/// Failure taxonomy for the aggregation core.
///
/// `SourceUnavailable` is surfaced immediately and never retried here; callers
/// own retry/backoff policy. `Protocol` marks a malformed or semantically
/// inconsistent response and is fatal to the current scan. `InvalidWindow` is
/// a caller bug.
#[derive(Debug, Error)]
pub enum Error {
  #[error("source unavailable: {0}")]
  SourceUnavailable(String),
  #[error("protocol error: {0}")]
  Protocol(String),
  #[error("invalid window: {0}")]
  InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, Error>;
