use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{ApiConfig, PacingConfig, RetryConfig};
use crate::error::TranslateError;
use crate::providers::config::GroqConfig;
use crate::providers::Translator;
use crate::throttle::{PacingGate, ThrottleGate};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const SYSTEM_PROMPT: &str = "You are a professional translator. Translate English to Hindi \
     accurately. Maintain original meaning, context and tone. Only return the Hindi translation.";

/// Upstream client for the Groq chat-completions API
///
/// One HTTPS POST per segment. Every call waits on the shared pacing gate
/// first, and a 429 response records its `Retry-After` deadline on the shared
/// throttle gate before surfacing as [`TranslateError::Throttled`].
#[derive(Debug)]
pub struct GroqTranslator {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    default_retry_after: Duration,
    throttle: Arc<ThrottleGate>,
    pacing: Arc<PacingGate>,
}

impl GroqTranslator {
    /// Create a new Groq translator with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Missing API key in configuration
    /// - The HTTP client cannot be constructed
    pub fn new(
        api: &ApiConfig,
        config: &GroqConfig,
        pacing_config: &PacingConfig,
        retry_config: &RetryConfig,
        throttle: Arc<ThrottleGate>,
        pacing: Arc<PacingGate>,
    ) -> Result<Self> {
        let api_key = api
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("API key is required for Groq"))?;
        let base_url = api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(pacing_config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            default_retry_after: retry_config.base_delay(),
            throttle,
            pacing,
        })
    }

    fn retry_after_from(&self, response: &reqwest::Response) -> Duration {
        response
            .headers()
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(self.default_retry_after, Duration::from_secs)
    }
}

#[async_trait]
impl Translator for GroqTranslator {
    async fn translate_segment(&self, text: &str) -> Result<String, TranslateError> {
        self.pacing.pace().await;

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT,
                },
                {
                    "role": "user",
                    "content": format!("Translate this to Hindi without any additional text:\n{text}"),
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("User-Agent", "anuvaad/0.1")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::Transient(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = self.retry_after_from(&response);
            self.throttle.record(retry_after, Instant::now());
            warn!(
                retry_after_secs = retry_after.as_secs(),
                "upstream rate limit hit, closing throttle gate"
            );
            return Err(TranslateError::Throttled { retry_after });
        }

        if status.is_server_error() {
            return Err(TranslateError::Transient(format!(
                "upstream returned {status}"
            )));
        }

        if !status.is_success() {
            // 401/403 and other client errors are not worth retrying
            return Err(TranslateError::Fatal(format!(
                "upstream returned {status}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| TranslateError::Fatal(format!("malformed upstream response: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| TranslateError::Fatal("upstream response had no choices".to_string()))?;

        debug!(chars = content.len(), "segment translated");
        Ok(trim_completion(content))
    }
}

/// Strip surrounding whitespace and one layer of enclosing double quotes;
/// models occasionally quote the whole translation.
fn trim_completion(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_completion_strips_whitespace() {
        assert_eq!(trim_completion("  नमस्ते दुनिया \n"), "नमस्ते दुनिया");
    }

    #[test]
    fn test_trim_completion_strips_one_quote_layer() {
        assert_eq!(trim_completion("\"नमस्ते\""), "नमस्ते");
        assert_eq!(trim_completion("\"\"नमस्ते\"\""), "\"नमस्ते\"");
    }

    #[test]
    fn test_trim_completion_keeps_unpaired_quotes() {
        assert_eq!(trim_completion("\"नमस्ते"), "\"नमस्ते");
        assert_eq!(trim_completion("नमस्ते\""), "नमस्ते\"");
    }

    #[test]
    fn test_completion_body_parses() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"नमस्ते"}}]}"#;
        let parsed: ChatCompletion = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "नमस्ते");
    }
}
