use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, path::PathBuf};

use crate::providers::config::ProviderConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(rename = "provider", default)]
    pub provider_config: ProviderConfig,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider_config: ProviderConfig::default(),
            api_key: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Longest segment, in characters, sent upstream in one call
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: usize,
}

const fn default_max_segment_length() -> usize {
    350
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_segment_length: default_max_segment_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_seconds")]
    pub base_delay_seconds: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_seconds() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_seconds: default_base_delay_seconds(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum spacing between upstream calls, shared across all requests
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Per-call network timeout for upstream requests
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

const fn default_min_interval_ms() -> u64 {
    200
}

const fn default_request_timeout_seconds() -> u64 {
    20
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl PacingConfig {
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

const fn default_cache_capacity() -> usize {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file at the specified path
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The file cannot be read
    /// - The file contents are not valid UTF-8
    /// - The TOML content cannot be parsed into the Config structure
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Environment variables contain invalid values
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(provider) = env::var("ANUVAAD_PROVIDER") {
            config.api.provider_config = match provider.as_str() {
                "mock" => ProviderConfig::Mock(crate::providers::config::MockConfig::default()),
                "groq" => ProviderConfig::Groq(crate::providers::config::GroqConfig::default()),
                other => return Err(anyhow!("unknown provider: {other}")),
            };
        }

        // ANUVAAD_API_KEY wins over the upstream's conventional variable
        if let Ok(api_key) = env::var("ANUVAAD_API_KEY") {
            config.api.api_key = Some(api_key);
        } else if let Ok(api_key) = env::var("GROQ_API_KEY") {
            config.api.api_key = Some(api_key);
        }

        if let Ok(base_url) = env::var("ANUVAAD_BASE_URL") {
            config.api.base_url = Some(base_url);
        }

        if let Ok(max_len) = env::var("ANUVAAD_MAX_SEGMENT_LENGTH") {
            config.segmenter.max_segment_length = max_len.parse()?;
        }

        if let Ok(attempts) = env::var("ANUVAAD_MAX_ATTEMPTS") {
            config.retry.max_attempts = attempts.parse()?;
        }

        if let Ok(delay) = env::var("ANUVAAD_BASE_DELAY") {
            config.retry.base_delay_seconds = delay.parse()?;
        }

        if let Ok(interval) = env::var("ANUVAAD_MIN_INTERVAL_MS") {
            config.pacing.min_interval_ms = interval.parse()?;
        }

        if let Ok(timeout) = env::var("ANUVAAD_REQUEST_TIMEOUT") {
            config.pacing.request_timeout_seconds = timeout.parse()?;
        }

        if let Ok(capacity) = env::var("ANUVAAD_CACHE_CAPACITY") {
            config.cache.capacity = capacity.parse()?;
        }

        if let Ok(bind_addr) = env::var("ANUVAAD_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }

        if let Ok(port) = env::var("ANUVAAD_PORT") {
            config.server.port = port.parse()?;
        }

        if let Ok(log_level) = env::var("ANUVAAD_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        if let Ok(log_format) = env::var("ANUVAAD_LOG_FORMAT") {
            config.logging.format = log_format;
        }

        Ok(config)
    }

    /// Load configuration from default locations and environment variables
    ///
    /// The first existing file among `anuvaad.toml` (current directory),
    /// `~/.config/anuvaad/config.toml` and `/etc/anuvaad/config.toml` is
    /// used as the base; environment variables take precedence over it.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - A found configuration file cannot be parsed
    /// - Environment variables contain invalid values
    pub fn load() -> Result<Self> {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let current_dir = env::current_dir()?;

        let config_paths = [
            PathBuf::from("anuvaad.toml"),
            current_dir.join("anuvaad.toml"),
            home_dir.join(".config/anuvaad/config.toml"),
            PathBuf::from("/etc/anuvaad/config.toml"),
        ];

        let mut config = None;
        for path in &config_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                config = Some(Self::from_file(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_default();
        config.merge(Self::from_env()?);
        Ok(config)
    }

    /// Merge another configuration into this one, with the other
    /// configuration taking precedence for every field it explicitly sets
    /// (detected as a deviation from the default value).
    pub fn merge(&mut self, other: Self) {
        if other.api.api_key.is_some() {
            self.api.api_key = other.api.api_key;
        }
        if other.api.base_url.is_some() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.provider_config.to_string() != ProviderConfig::default().to_string() {
            self.api.provider_config = other.api.provider_config;
        }

        if other.segmenter.max_segment_length != default_max_segment_length() {
            self.segmenter.max_segment_length = other.segmenter.max_segment_length;
        }

        if other.retry.max_attempts != default_max_attempts() {
            self.retry.max_attempts = other.retry.max_attempts;
        }
        if other.retry.base_delay_seconds != default_base_delay_seconds() {
            self.retry.base_delay_seconds = other.retry.base_delay_seconds;
        }

        if other.pacing.min_interval_ms != default_min_interval_ms() {
            self.pacing.min_interval_ms = other.pacing.min_interval_ms;
        }
        if other.pacing.request_timeout_seconds != default_request_timeout_seconds() {
            self.pacing.request_timeout_seconds = other.pacing.request_timeout_seconds;
        }

        if other.cache.capacity != default_cache_capacity() {
            self.cache.capacity = other.cache.capacity;
        }

        if other.server.bind_addr != default_bind_addr() {
            self.server.bind_addr = other.server.bind_addr;
        }
        if other.server.port != default_port() {
            self.server.port = other.server.port;
        }

        if other.logging.level != default_log_level() {
            self.logging.level = other.logging.level;
        }
        if other.logging.format != default_log_format() {
            self.logging.format = other.logging.format;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Required fields are missing
    /// - Field values are invalid
    pub fn validate(&self) -> Result<()> {
        // API key validation - not required for mock provider
        if !matches!(self.api.provider_config, ProviderConfig::Mock(_))
            && self.api.api_key.is_none()
        {
            return Err(anyhow!("API key is required"));
        }

        self.api.provider_config.validate()?;

        if self.segmenter.max_segment_length == 0 {
            return Err(anyhow!("max_segment_length must be greater than 0"));
        }

        if self.retry.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be greater than 0"));
        }

        if self.cache.capacity == 0 {
            return Err(anyhow!("cache capacity must be greater than 0"));
        }

        Ok(())
    }
}
