use anyhow::{anyhow, Result};
use dialoguer::{Input, Select};
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::providers::config::{GroqConfig, MockConfig, ProviderConfig};

const GROQ_TEST_PROMPT: &str = "Say hello";

pub struct InitOptions {
    pub config_path: Option<PathBuf>,
    pub no_prompt: bool,
    pub force: bool,
}

async fn test_groq_api(api_key: &str, base_url: &str, model: &str) -> Result<()> {
    let client = Client::new();

    let response = client
        .post(format!("{base_url}/chat/completions"))
        .bearer_auth(api_key)
        .json(&json!({
            "model": model,
            "max_tokens": 10,
            "messages": [{
                "role": "user",
                "content": GROQ_TEST_PROMPT
            }]
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        return Err(anyhow!("API test failed: {}", error));
    }

    Ok(())
}

/// Create a configuration file, interactively unless `no_prompt` is set
///
/// # Errors
///
/// Returns an error if the file already exists without `--force`, if a
/// prompt fails, if a provided API key fails the live check, or if the
/// file cannot be written.
pub async fn initialize_config(opts: InitOptions) -> Result<()> {
    // Default path if none specified
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anuvaad");
    let config_path = opts
        .config_path
        .unwrap_or_else(|| config_dir.join("config.toml"));

    // Check if config exists
    if config_path.exists() && !opts.force {
        return Err(anyhow!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        ));
    }

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut config = Config::default();

    if !opts.no_prompt {
        println!("Initializing anuvaad configuration...\n");

        // Provider selection
        let providers = vec!["groq", "mock"];
        let provider = Select::new()
            .with_prompt("Select API provider")
            .items(&providers)
            .default(0)
            .interact()?;

        if providers[provider] == "mock" {
            config.api.provider_config = ProviderConfig::Mock(MockConfig::default());
        } else {
            let mut groq = GroqConfig::default();

            // API key
            let api_key: String = Input::new()
                .with_prompt("Enter API key (or environment variable name)")
                .with_initial_text("${GROQ_API_KEY}")
                .interact_text()?;

            let api_key_value = if api_key.starts_with("${") && api_key.ends_with('}') {
                std::env::var(&api_key[2..api_key.len() - 1]).ok()
            } else {
                Some(api_key.clone())
            };

            let model: String = Input::new()
                .with_prompt("Enter model name")
                .with_initial_text(groq.model.as_str())
                .interact_text()?;
            groq.model = model;

            // Test API key if available
            if let Some(key) = api_key_value {
                print!("Testing API key... ");
                let base_url = config
                    .api
                    .base_url
                    .clone()
                    .unwrap_or_else(|| crate::providers::groq::DEFAULT_BASE_URL.to_string());
                match test_groq_api(&key, &base_url, &groq.model).await {
                    Ok(()) => println!("✓ Success"),
                    Err(e) => {
                        println!("✗ Failed");
                        return Err(anyhow!("API key validation failed: {}", e));
                    }
                }
            }

            config.api.api_key = Some(api_key);
            config.api.provider_config = ProviderConfig::Groq(groq);
        }

        // Server settings
        let port: String = Input::new()
            .with_prompt("Port to listen on")
            .with_initial_text(config.server.port.to_string())
            .interact_text()?;
        config.server.port = port.parse()?;

        let max_len: String = Input::new()
            .with_prompt("Maximum segment length in characters")
            .with_initial_text(config.segmenter.max_segment_length.to_string())
            .interact_text()?;
        config.segmenter.max_segment_length = max_len.parse()?;
    }

    // Write the config file
    let toml = toml::to_string_pretty(&config)?;
    std::fs::write(&config_path, toml)?;

    println!("\nConfiguration created at: {}", config_path.display());
    Ok(())
}
