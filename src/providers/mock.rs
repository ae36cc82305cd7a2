use async_trait::async_trait;

use crate::error::TranslateError;
use crate::providers::config::MockConfig;
use crate::providers::Translator;

/// Mock translator for testing and local runs without upstream credentials
///
/// Echoes the input prefixed with a marker so responses are recognizable.
#[derive(Debug)]
pub struct MockTranslator {
    prefix: String,
}

impl MockTranslator {
    #[must_use]
    pub fn new(config: &MockConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate_segment(&self, text: &str) -> Result<String, TranslateError> {
        if self.prefix.is_empty() {
            Ok(text.to_string())
        } else {
            Ok(format!("{} {}", self.prefix, text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_with_prefix() {
        let translator = MockTranslator::new(&MockConfig::default());
        let translated = translator.translate_segment("Hello world").await.unwrap();
        assert_eq!(translated, "[hi] Hello world");
    }

    #[tokio::test]
    async fn test_mock_without_prefix_echoes_verbatim() {
        let translator = MockTranslator::new(&MockConfig {
            prefix: String::new(),
        });
        let translated = translator.translate_segment("Hello").await.unwrap();
        assert_eq!(translated, "Hello");
    }
}
