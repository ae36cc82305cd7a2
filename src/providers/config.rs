use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid provider type: {0}")]
    InvalidProvider(String),
}

/// Provider-specific configuration types
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Groq(GroqConfig),
    Mock(MockConfig),
}

impl Display for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Groq(_) => write!(f, "groq"),
            Self::Mock(_) => write!(f, "mock"),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Groq(GroqConfig::default())
    }
}

/// Configuration for the Groq chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// The model to use
    #[serde(default = "default_groq_model")]
    pub model: String,
    /// Maximum tokens to generate per segment
    #[serde(default = "default_groq_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_groq_temperature")]
    pub temperature: f32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            model: default_groq_model(),
            max_tokens: default_groq_max_tokens(),
            temperature: default_groq_temperature(),
        }
    }
}

fn default_groq_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

const fn default_groq_max_tokens() -> u32 {
    1024
}

const fn default_groq_temperature() -> f32 {
    0.3
}

/// Configuration for the Mock provider (used in testing and local runs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Prefix prepended to echoed text
    #[serde(default = "default_mock_prefix")]
    pub prefix: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            prefix: default_mock_prefix(),
        }
    }
}

fn default_mock_prefix() -> String {
    "[hi]".to_string()
}

impl ProviderConfig {
    /// Validates the provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model name is empty
    /// - The max tokens value is zero
    /// - The temperature is outside the sampling range
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Self::Groq(config) => {
                if config.max_tokens == 0 {
                    return Err(anyhow::anyhow!("max_tokens must be greater than 0"));
                }
                if config.model.is_empty() {
                    return Err(anyhow::anyhow!("model must not be empty"));
                }
                if !(0.0..=2.0).contains(&config.temperature) {
                    return Err(anyhow::anyhow!("temperature must be between 0.0 and 2.0"));
                }
                Ok(())
            }
            Self::Mock(_) => Ok(()),
        }
    }
}

impl serde::Serialize for ProviderConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Groq(cfg) => {
                map.serialize_entry("type", "groq")?;
                map.serialize_entry("model", &cfg.model)?;
                map.serialize_entry("max_tokens", &cfg.max_tokens)?;
                map.serialize_entry("temperature", &cfg.temperature)?;
            }
            Self::Mock(cfg) => {
                map.serialize_entry("type", "mock")?;
                if !cfg.prefix.is_empty() {
                    map.serialize_entry("prefix", &cfg.prefix)?;
                }
            }
        }
        map.end()
    }
}

impl<'de> serde::Deserialize<'de> for ProviderConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ProviderConfigVisitor;

        impl<'de> Visitor<'de> for ProviderConfigVisitor {
            type Value = ProviderConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a flat map representing a provider configuration")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                use serde::de::Error;
                let mut values = serde_json::Map::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    values.insert(key, value);
                }
                let type_value = values
                    .remove("type")
                    .ok_or_else(|| M::Error::missing_field("type"))?;
                let provider_type = type_value
                    .as_str()
                    .ok_or_else(|| M::Error::custom("type field is not a string"))?;
                let obj = serde_json::Value::Object(values);
                match provider_type {
                    "groq" => {
                        let cfg: GroqConfig =
                            serde_json::from_value(obj).map_err(M::Error::custom)?;
                        Ok(ProviderConfig::Groq(cfg))
                    }
                    "mock" => {
                        let cfg: MockConfig =
                            serde_json::from_value(obj).map_err(M::Error::custom)?;
                        Ok(ProviderConfig::Mock(cfg))
                    }
                    other => Err(M::Error::custom(ProviderError::InvalidProvider(
                        other.to_string(),
                    ))),
                }
            }
        }

        deserializer.deserialize_map(ProviderConfigVisitor)
    }
}
