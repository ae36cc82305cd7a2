use std::time::Duration;
use thiserror::Error;

/// Classified failure modes for a translation request.
///
/// Segment-level upstream failures (`Transient`, `Fatal`) are absorbed by the
/// engine into a degraded result; only `EmptyInput` and `Throttled` surface to
/// callers as non-200 responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("No text provided")]
    EmptyInput,

    #[error("rate limit exceeded, retry in {} seconds", retry_after.as_secs())]
    Throttled { retry_after: Duration },

    #[error("transient upstream failure: {0}")]
    Transient(String),

    #[error("fatal upstream failure: {0}")]
    Fatal(String),
}

impl TranslateError {
    /// Whether the retry policy may attempt this call again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
