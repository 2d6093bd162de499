//! CLI module for the symptom checker
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `analyze` - Run one analysis from the command line
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! symcheck serve
//!
//! # Ask for possible conditions
//! GROQ_API_KEY=... symcheck analyze --symptoms "fever,cough"
//!
//! # Generate shell completions
//! symcheck completions bash > ~/.bash_completion.d/symcheck
//! ```

pub mod analyze;
pub mod completions;
pub mod config;
pub mod serve;

pub use analyze::handle_analyze;
pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, optional for every command.
pub const DEFAULT_CONFIG: &str = "symcheck.toml";

/// symcheck - AI-assisted symptom checker
#[derive(Parser, Debug)]
#[command(
    name = "symcheck",
    version,
    about = "AI-assisted symptom analysis service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Run one analysis and print the JSON result
    Analyze(AnalyzeArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["symptoms", "disease", "trending"])
))]
pub struct AnalyzeArgs {
    /// Comma-separated symptoms (e.g., "fever,cough")
    #[arg(short, long, value_delimiter = ',')]
    pub symptoms: Vec<String>,

    /// Condition to list treatments for
    #[arg(short, long)]
    pub disease: Option<String>,

    /// List currently trending symptoms
    #[arg(long)]
    pub trending: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
