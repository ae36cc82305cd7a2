use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::TranslateError;
use crate::providers::{create_translator, Translator};
use crate::retry::{RetryPolicy, SegmentOutcome};
use crate::segmenter::segment;
use crate::throttle::{PacingGate, ThrottleGate};

/// Warning attached to any result containing at least one failed segment
pub const PARTIAL_WARNING: &str = "Partial translation: Some parts could not be translated";

/// How many characters of the original text a failure placeholder shows
const PLACEHOLDER_PREVIEW_CHARS: usize = 50;

/// A completed translation, possibly degraded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    pub warning: Option<String>,
}

impl Translation {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            translated_text: String::new(),
            warning: None,
        }
    }
}

/// Drives one translate request end to end: throttle admission, cache
/// lookup, segmentation, per-segment retries, and reassembly.
///
/// Segment calls are strictly sequential; segment N+1 is not dispatched
/// until segment N's retry policy has resolved. Failed segments become
/// visible placeholders rather than failing the whole request, so even
/// total upstream failure yields a degraded response.
#[derive(Debug)]
pub struct TranslationEngine {
    translator: Box<dyn Translator>,
    throttle: Arc<ThrottleGate>,
    cache: ResponseCache,
    retry: RetryPolicy,
    max_segment_length: usize,
}

impl TranslationEngine {
    #[must_use]
    pub fn new(
        translator: Box<dyn Translator>,
        throttle: Arc<ThrottleGate>,
        retry: RetryPolicy,
        max_segment_length: usize,
        cache_capacity: usize,
    ) -> Self {
        Self {
            translator,
            throttle,
            cache: ResponseCache::new(cache_capacity),
            retry,
            max_segment_length,
        }
    }

    /// Assemble an engine from configuration, wiring the shared throttle and
    /// pacing gates into the upstream client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured provider cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let throttle = Arc::new(ThrottleGate::new());
        let pacing = Arc::new(PacingGate::new(config.pacing.min_interval()));
        let translator = create_translator(
            &config.api,
            &config.pacing,
            &config.retry,
            Arc::clone(&throttle),
            pacing,
        )?;

        Ok(Self::new(
            translator,
            throttle,
            RetryPolicy::new(config.retry.max_attempts, config.retry.base_delay()),
            config.segmenter.max_segment_length,
            config.cache.capacity,
        ))
    }

    /// Translate a block of English text to Hindi
    ///
    /// Empty input yields an empty result without touching the upstream.
    /// A degraded result (some segments failed) still returns `Ok`, carrying
    /// a warning and placeholders for the failed parts.
    ///
    /// # Errors
    ///
    /// Returns an error only if the global throttle gate is closed
    /// (`Throttled`, with the remaining wait) before any segment work begins.
    pub async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        if text.trim().is_empty() {
            return Ok(Translation::empty());
        }

        if let Some(hit) = self.cache.get(text) {
            debug!("cache hit, skipping upstream");
            return Ok(hit);
        }

        if let Some(retry_after) = self.throttle.check(Instant::now()) {
            return Err(TranslateError::Throttled { retry_after });
        }

        let segments = segment(text, self.max_segment_length);
        let mut parts: Vec<String> = Vec::with_capacity(segments.len());
        let mut warning: Option<String> = None;

        for seg in &segments {
            match self.retry.run(self.translator.as_ref(), seg).await {
                SegmentOutcome::Translated { text } => parts.push(text),
                SegmentOutcome::Failed { original, reason } => {
                    error!(segment = seg.index, %reason, "segment translation failed");
                    parts.push(placeholder(&original));
                    warning.get_or_insert_with(|| PARTIAL_WARNING.to_string());
                }
            }
        }

        let translation = Translation {
            translated_text: parts.join(" "),
            warning,
        };

        if translation.warning.is_none() {
            self.cache.put(text.to_string(), translation.clone());
        } else {
            info!("degraded result not cached");
        }

        Ok(translation)
    }
}

/// Visible stand-in for a segment that could not be translated
fn placeholder(original: &str) -> String {
    let preview: String = original.chars().take(PLACEHOLDER_PREVIEW_CHARS).collect();
    format!("[TRANSLATION FAILED: {preview}...]")
}
