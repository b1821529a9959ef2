//! KARA - Guided UI/UX ideation
//!
//! CLI entry point: list topics, ask for one recommendation, or explore
//! interactively.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use kara::catalogue;
use kara::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use kara::config::Config;
use kara::repl;
use kara::{Topic, create_advisor};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Help text reports credentials for the default config chain (before --config is parsed)
    let help_config = Config::load(None).unwrap_or_default();
    let cmd = Cli::command().after_help(generate_after_help(
        &help_config.llm.api_key_env,
        help_config.llm.has_credentials(),
    ));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "KARA loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Topics) => cmd_topics(),
        Some(Command::Ask { ordinal, format }) => cmd_ask(&config, ordinal, format).await,
        Some(Command::Explore { ordinal }) => cmd_explore(&config, ordinal).await,
        None => cmd_explore(&config, None).await,
    }
}

fn lookup_topic(ordinal: u32) -> Result<Topic> {
    catalogue::by_ordinal(ordinal).ok_or_else(|| {
        eyre::eyre!(
            "No topic {}. Run `kara topics` to see the {} available topics.",
            ordinal,
            catalogue::topics().len()
        )
    })
}

fn cmd_topics() -> Result<()> {
    debug!("cmd_topics: called");
    for topic in catalogue::topics() {
        if let Some(ordinal) = topic.ordinal() {
            println!("{:>2}. {}", ordinal, topic.title().bold());
            println!("    {}", topic.description().dimmed());
        }
    }
    Ok(())
}

async fn cmd_ask(config: &Config, ordinal: u32, format: OutputFormat) -> Result<()> {
    debug!(%ordinal, %format, "cmd_ask: called");
    let topic = lookup_topic(ordinal)?;
    let advisor = create_advisor(config).context("Failed to create advisor")?;

    let recommendation = advisor
        .fetch_recommendation(&topic, &[])
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        }
        OutputFormat::Text => {
            println!("{}", topic.title().bright_cyan().bold());
            println!();
            println!("{}", recommendation.text);
            println!();
            for (i, choice) in recommendation.choices.iter().enumerate() {
                println!("  {}. {}", i + 1, choice.title.bold());
                println!("     {}", choice.description.dimmed());
            }
        }
    }
    Ok(())
}

async fn cmd_explore(config: &Config, ordinal: Option<u32>) -> Result<()> {
    debug!(?ordinal, "cmd_explore: called");
    let initial_topic = ordinal.map(lookup_topic).transpose()?;
    repl::run_interactive(config, initial_topic).await
}
