use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{ApiConfig, PacingConfig, RetryConfig};
use crate::error::TranslateError;
use crate::throttle::{PacingGate, ThrottleGate};

pub mod config;
pub mod groq;
pub mod mock;

/// Trait defining the interface to an upstream translation backend
///
/// One call translates one segment. Implementations classify every outcome
/// into the [`TranslateError`] taxonomy so the retry policy and engine can
/// decide what is retryable, what closes the global throttle gate, and what
/// must be absorbed as a segment-level failure.
#[async_trait]
pub trait Translator: std::fmt::Debug + Send + Sync {
    /// Translate a single segment of English text to Hindi
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The upstream signalled throttling (`Throttled`, gate recorded)
    /// - The call failed at the network level or with a 5xx (`Transient`)
    /// - Authentication failed or the response body was malformed (`Fatal`)
    async fn translate_segment(&self, text: &str) -> Result<String, TranslateError>;
}

/// Create a new translator based on the configuration
///
/// # Errors
///
/// Returns an error if:
/// - The API key is missing for a provider that requires one
/// - The underlying HTTP client cannot be constructed
pub fn create_translator(
    api: &ApiConfig,
    pacing_config: &PacingConfig,
    retry_config: &RetryConfig,
    throttle: Arc<ThrottleGate>,
    pacing: Arc<PacingGate>,
) -> Result<Box<dyn Translator>> {
    match &api.provider_config {
        config::ProviderConfig::Groq(groq_config) => Ok(Box::new(groq::GroqTranslator::new(
            api,
            groq_config,
            pacing_config,
            retry_config,
            throttle,
            pacing,
        )?)),
        config::ProviderConfig::Mock(mock_config) => {
            Ok(Box::new(mock::MockTranslator::new(mock_config)))
        }
    }
}
