use std::sync::Mutex;
use std::{env, fs, path::PathBuf};

use anyhow::Result;
use tempfile::tempdir;

use anuvaad::config::Config;
use anuvaad::providers::config::ProviderConfig;

// Environment and working directory are process-global; tests touching them
// serialize on this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

struct EnvGuard {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new(vars: Vec<&'static str>) -> Self {
        let vars = vars
            .into_iter()
            .map(|var| {
                let original = env::var(var).ok();
                env::remove_var(var);
                (var, original)
            })
            .collect();
        Self { vars }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore original environment state
        for (var, original_value) in &self.vars {
            match original_value {
                Some(value) => env::set_var(var, value),
                None => env::remove_var(var),
            }
        }
    }
}

struct DirGuard {
    original_dir: PathBuf,
}

impl DirGuard {
    fn new() -> Result<Self> {
        let original_dir = env::current_dir()?;
        Ok(Self { original_dir })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original_dir) {
            eprintln!("Error restoring original directory: {e}");
        }
    }
}

const ALL_VARS: [&str; 6] = [
    "ANUVAAD_API_KEY",
    "ANUVAAD_PROVIDER",
    "ANUVAAD_BASE_URL",
    "ANUVAAD_MAX_SEGMENT_LENGTH",
    "ANUVAAD_PORT",
    "GROQ_API_KEY",
];

#[test]
fn test_config_from_file() -> Result<()> {
    let dir = tempdir()?;
    let config_path = dir.path().join("config.toml");

    let config_content = r#"
        [api]
        api_key = "test-key"
        base_url = "https://custom.api.com"

        [api.provider]
        type = "groq"
        model = "llama-test"
        max_tokens = 512

        [segmenter]
        max_segment_length = 200

        [retry]
        max_attempts = 5

        [server]
        port = 9000
    "#;

    fs::write(&config_path, config_content)?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.api.api_key, Some("test-key".to_string()));
    assert_eq!(
        config.api.base_url,
        Some("https://custom.api.com".to_string())
    );
    assert_eq!(config.segmenter.max_segment_length, 200);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.server.port, 9000);
    match config.api.provider_config {
        ProviderConfig::Groq(ref groq) => {
            assert_eq!(groq.model, "llama-test");
            assert_eq!(groq.max_tokens, 512);
        }
        ProviderConfig::Mock(_) => panic!("expected groq provider"),
    }

    Ok(())
}

#[test]
fn test_config_from_env() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap();
    let _env_guard = EnvGuard::new(ALL_VARS.to_vec());

    env::set_var("ANUVAAD_API_KEY", "env-key");
    env::set_var("ANUVAAD_PROVIDER", "mock");
    env::set_var("ANUVAAD_BASE_URL", "https://env.api.com");
    env::set_var("ANUVAAD_MAX_SEGMENT_LENGTH", "120");
    env::set_var("ANUVAAD_PORT", "8080");

    let config = Config::from_env()?;

    assert_eq!(config.api.api_key, Some("env-key".to_string()));
    assert!(matches!(config.api.provider_config, ProviderConfig::Mock(_)));
    assert_eq!(config.api.base_url, Some("https://env.api.com".to_string()));
    assert_eq!(config.segmenter.max_segment_length, 120);
    assert_eq!(config.server.port, 8080);

    Ok(())
}

#[test]
fn test_groq_api_key_fallback() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap();
    let _env_guard = EnvGuard::new(ALL_VARS.to_vec());

    env::set_var("GROQ_API_KEY", "groq-key");

    let config = Config::from_env()?;
    assert_eq!(config.api.api_key, Some("groq-key".to_string()));

    // the project's own variable wins when both are set
    env::set_var("ANUVAAD_API_KEY", "anuvaad-key");
    let config = Config::from_env()?;
    assert_eq!(config.api.api_key, Some("anuvaad-key".to_string()));

    Ok(())
}

#[test]
fn test_env_var_with_invalid_number_is_rejected() {
    let _lock = ENV_LOCK.lock().unwrap();
    let _env_guard = EnvGuard::new(ALL_VARS.to_vec());

    env::set_var("ANUVAAD_PORT", "not-a-port");
    assert!(Config::from_env().is_err());
}

#[test]
fn test_load_with_env_override() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap();
    let _dir_guard = DirGuard::new()?;
    let _env_guard = EnvGuard::new(ALL_VARS.to_vec());

    // Create an isolated directory for the test
    let dir = tempdir()?;
    env::set_current_dir(dir.path())?;

    let config_content = r#"
        [api]
        api_key = "file-key"
        base_url = "https://file.api.com"

        [server]
        port = 7000
    "#;
    fs::write("anuvaad.toml", config_content)?;

    env::set_var("ANUVAAD_API_KEY", "env-key");
    env::set_var("ANUVAAD_BASE_URL", "https://env.api.com");

    let config = Config::load()?;

    // Environment should override file
    assert_eq!(config.api.api_key, Some("env-key".to_string()));
    assert_eq!(config.api.base_url, Some("https://env.api.com".to_string()));
    // File values without an environment override survive
    assert_eq!(config.server.port, 7000);

    Ok(())
}
