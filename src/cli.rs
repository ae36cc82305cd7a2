use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Placeholder default for `--config`; while the flag is unchanged the
/// binary runs the full `Config::load` path search instead.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/anuvaad/config.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Set log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Set log format
    #[arg(long, default_value = "text")]
    pub log_format: String,

    /// Increase verbosity
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Path to create the config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Don't prompt for input, use defaults
        #[arg(long)]
        no_prompt: bool,

        /// Force overwrite if config file exists
        #[arg(long)]
        force: bool,
    },

    /// Run the translation relay server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to
        #[arg(long)]
        bind_addr: Option<String>,

        /// API provider
        #[arg(long)]
        api: Option<String>,

        /// API key
        #[arg(long)]
        api_key: Option<String>,

        /// API base URL
        #[arg(long)]
        api_base_url: Option<String>,

        /// Longest segment, in characters, sent upstream in one call
        #[arg(long)]
        max_segment_length: Option<usize>,

        /// Attempts per segment before giving up
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Base retry delay in seconds
        #[arg(long)]
        base_delay: Option<u64>,

        /// Minimum spacing between upstream calls in milliseconds
        #[arg(long)]
        min_interval_ms: Option<u64>,

        /// Number of translations kept in the response cache
        #[arg(long)]
        cache_capacity: Option<usize>,
    },
}
