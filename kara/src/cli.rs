//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// KARA - Guided UI/UX ideation
#[derive(Parser)]
#[command(
    name = "kara",
    about = "Guided UI/UX ideation: branching AI recommendations, deep research, and planning workshops",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `explore`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the topic catalogue
    Topics,

    /// Print one recommendation for a catalogue topic
    Ask {
        /// Topic number from `kara topics`
        #[arg(value_name = "TOPIC")]
        ordinal: u32,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Interactive session: follow choices, save threads, run deep research and workshops
    Explore {
        /// Start immediately with this topic number
        #[arg(value_name = "TOPIC")]
        ordinal: Option<u32>,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kara")
        .join("logs")
        .join("kara.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with the credential status and log location
pub fn generate_after_help(api_key_env: &str, has_credentials: bool) -> String {
    debug!(%api_key_env, %has_credentials, "generate_after_help: called");
    let mut help = String::new();

    help.push_str("Advisor:\n");
    if has_credentials {
        help.push_str(&format!("  \u{2705} {} is set\n", api_key_env));
    } else {
        help.push_str(&format!("  \u{274C} {} not set, canned responses will be used\n", api_key_env));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for `ask`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
