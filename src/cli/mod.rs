//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Comunica - court notification collector
#[derive(Parser, Debug)]
#[command(name = "comunica")]
#[command(version, about, long_about = None)]
#[command(author = "Comunica Contributors")]
pub struct Cli {
    /// Path to configuration file (built-in defaults are used if it is missing)
    #[arg(short, long, default_value = "comunica.toml", env = "COMUNICA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COMUNICA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect communications for the configured date range
    Collect(commands::collect::CollectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show what the checkpoint file holds
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
