use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use anuvaad::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use anuvaad::config::{Config, LoggingConfig};
use anuvaad::engine::TranslationEngine;
use anuvaad::providers::config::{GroqConfig, MockConfig, ProviderConfig};
use anuvaad::{initialize_config, server, InitOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle init command early as it doesn't need config loading
    if let Commands::Init {
        config,
        no_prompt,
        force,
    } = cli.command
    {
        let level = if cli.verbose { "debug" } else { &cli.log_level };
        init_logging(level, &cli.log_format);
        return initialize_config(InitOptions {
            config_path: config,
            no_prompt,
            force,
        })
        .await;
    }

    // Load configuration from file and environment, then overlay CLI args.
    // An explicit --config file must exist and parse; the default value
    // runs the regular path search instead.
    let cli_config = create_cli_config(&cli.command);
    let mut config = if cli.config.as_os_str() == DEFAULT_CONFIG_PATH {
        match Config::load() {
            Ok(c) => c,
            Err(e) => {
                // Allow load to fail if using CLI args
                if cli_config.api.api_key.is_none() {
                    return Err(e);
                }
                Config::default()
            }
        }
    } else {
        let mut base = Config::from_file(&cli.config)
            .with_context(|| format!("failed to load config file {}", cli.config.display()))?;
        base.merge(Config::from_env()?);
        base
    };
    config.merge(cli_config);
    config.validate()?;

    let (level, format) = effective_logging(&cli, &config.logging);
    init_logging(&level, &format);

    let result = match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Init { .. } => unreachable!(), // Already handled above
    };

    if let Err(ref e) = result {
        eprintln!("{e}");
    }
    result
}

// Setup logging, but only if not already driven by RUST_LOG
fn init_logging(level: &str, format: &str) {
    if std::env::var("RUST_LOG").is_ok() {
        return;
    }

    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if format == "json" {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

/// CLI logging flags win when set; flags left at their defaults fall back
/// to the `[logging]` config section.
fn effective_logging(cli: &Cli, logging: &LoggingConfig) -> (String, String) {
    let level = if cli.verbose {
        "debug".to_string()
    } else if cli.log_level == "info" {
        logging.level.clone()
    } else {
        cli.log_level.clone()
    };
    let format = if cli.log_format == "text" {
        logging.format.clone()
    } else {
        cli.log_format.clone()
    };
    (level, format)
}

fn create_cli_config(cli: &Commands) -> Config {
    let mut config = Config::default();
    let Commands::Serve {
        port,
        bind_addr,
        api,
        api_key,
        api_base_url,
        max_segment_length,
        max_attempts,
        base_delay,
        min_interval_ms,
        cache_capacity,
    } = cli
    else {
        return config;
    };

    if let Some(api) = api {
        config.api.provider_config = match api.as_str() {
            "mock" => ProviderConfig::Mock(MockConfig::default()),
            _ => ProviderConfig::Groq(GroqConfig::default()),
        };
    }
    config.api.api_key = api_key.clone();
    config.api.base_url = api_base_url.clone();

    if let Some(port) = port {
        config.server.port = *port;
    }
    if let Some(bind_addr) = bind_addr {
        config.server.bind_addr = bind_addr.clone();
    }
    if let Some(max_segment_length) = max_segment_length {
        config.segmenter.max_segment_length = *max_segment_length;
    }
    if let Some(max_attempts) = max_attempts {
        config.retry.max_attempts = *max_attempts;
    }
    if let Some(base_delay) = base_delay {
        config.retry.base_delay_seconds = *base_delay;
    }
    if let Some(min_interval_ms) = min_interval_ms {
        config.pacing.min_interval_ms = *min_interval_ms;
    }
    if let Some(cache_capacity) = cache_capacity {
        config.cache.capacity = *cache_capacity;
    }

    config
}

async fn serve(config: Config) -> Result<()> {
    let engine = TranslationEngine::from_config(&config)?;
    info!(
        provider = %config.api.provider_config,
        port = config.server.port,
        "starting translation relay"
    );
    server::serve(&config.server, engine).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_overrides_only_given_flags() {
        let cli = Cli::parse_from([
            "anuvaad",
            "serve",
            "--api",
            "mock",
            "--port",
            "8080",
            "--max-attempts",
            "5",
        ]);
        let config = create_cli_config(&cli.command);

        assert!(matches!(config.api.provider_config, ProviderConfig::Mock(_)));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retry.max_attempts, 5);
        // untouched flags keep their defaults
        assert_eq!(config.segmenter.max_segment_length, 350);
        assert_eq!(config.api.api_key, None);
    }

    #[test]
    fn test_init_command_parses() {
        let cli = Cli::parse_from(["anuvaad", "init", "--no-prompt", "--force"]);
        match cli.command {
            Commands::Init {
                no_prompt, force, ..
            } => {
                assert!(no_prompt);
                assert!(force);
            }
            Commands::Serve { .. } => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_default_config_flag_keeps_path_search() {
        let cli = Cli::parse_from(["anuvaad", "serve"]);
        assert_eq!(cli.config.as_os_str(), DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_config_logging_applies_when_cli_flags_are_default() {
        let cli = Cli::parse_from(["anuvaad", "serve"]);
        let logging = LoggingConfig {
            level: "warn".to_string(),
            format: "json".to_string(),
        };

        let (level, format) = effective_logging(&cli, &logging);
        assert_eq!(level, "warn");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_cli_logging_flags_override_config() {
        let cli = Cli::parse_from(["anuvaad", "--log-level", "trace", "--log-format", "json", "serve"]);
        let logging = LoggingConfig::default();

        let (level, format) = effective_logging(&cli, &logging);
        assert_eq!(level, "trace");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_verbose_forces_debug_level() {
        let cli = Cli::parse_from(["anuvaad", "--verbose", "serve"]);
        let logging = LoggingConfig {
            level: "error".to_string(),
            format: "text".to_string(),
        };

        let (level, _) = effective_logging(&cli, &logging);
        assert_eq!(level, "debug");
    }
}
