pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod providers;
pub mod retry;
pub mod segmenter;
pub mod server;
pub mod throttle;

// Re-export key types for convenience
pub use config::Config;
pub use engine::{Translation, TranslationEngine};
pub use error::TranslateError;
pub use init::{initialize_config, InitOptions};
pub use providers::Translator;

// Test utilities module - only compiled with test or testing feature
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
