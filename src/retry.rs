use std::time::Duration;

use tracing::warn;

use crate::providers::Translator;
use crate::segmenter::Segment;

/// Result of translating one segment, in original order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Translated { text: String },
    Failed { original: String, reason: String },
}

/// Bounded retry with linear, attempt-indexed backoff
///
/// Only transient upstream failures are retried. A throttle signal is
/// propagated immediately as a failure rather than burning retry budget
/// against a window the upstream has already declared closed, and fatal
/// failures are never retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Run one segment through the translator, retrying transient failures
    /// with a delay of `base_delay * attempt` between attempts.
    pub async fn run(&self, translator: &dyn Translator, segment: &Segment) -> SegmentOutcome {
        let mut attempt: u32 = 1;
        loop {
            match translator.translate_segment(&segment.text).await {
                Ok(text) => return SegmentOutcome::Translated { text },
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.base_delay * attempt;
                    warn!(
                        segment = segment.index,
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_retryable() => {
                    return SegmentOutcome::Failed {
                        original: segment.text.clone(),
                        reason: format!(
                            "max attempts exceeded after {} tries: {err}",
                            self.max_attempts
                        ),
                    };
                }
                Err(err) => {
                    return SegmentOutcome::Failed {
                        original: segment.text.clone(),
                        reason: err.to_string(),
                    };
                }
            }
        }
    }
}
