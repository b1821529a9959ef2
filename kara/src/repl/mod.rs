//! Interactive shell for KARA
//!
//! A thin line-based front end over the conversation engine, thread store and
//! workshop session. Slash commands drive everything; bare numbers follow a
//! choice of the latest recommendation.

mod command;
mod session;

pub use command::{GenTarget, ReplCommand, parse};
pub use session::ReplSession;

use eyre::{Context, Result};
use tracing::info;

use crate::advisor::create_advisor;
use crate::config::Config;
use crate::domain::Topic;

/// Run the interactive shell
///
/// This is the main entry point for `kara explore`.
pub async fn run_interactive(config: &Config, initial_topic: Option<Topic>) -> Result<()> {
    let canned = !config.llm.has_credentials();
    let advisor = create_advisor(config).context("Failed to create advisor")?;
    info!(canned, "Starting interactive session");

    let mut session = ReplSession::new(advisor, canned);
    session.run(initial_topic).await
}
