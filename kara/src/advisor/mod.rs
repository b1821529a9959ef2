//! Remote recommendation service
//!
//! The three calls KARA makes to its AI backend. [`LlmAdvisor`] renders the
//! prompt templates, sends them through an [`LlmClient`](crate::llm::LlmClient)
//! and validates the JSON that comes back. [`CannedAdvisor`] answers with fixed
//! data when no credentials are configured.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{Recommendation, Synthesis, Topic, Turn, WorkshopField};
use crate::error::KaraError;
use crate::llm::{LlmError, create_client};
use crate::prompts::PromptLoader;

mod canned;
#[cfg(test)]
pub(crate) mod mock;
mod remote;

pub use canned::CannedAdvisor;
pub use remote::LlmAdvisor;

/// The AI backend as seen by the engine, store and workshop
///
/// Implementations are stateless: every call carries all the context it needs.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Recommendation text plus exactly three follow-up choices for `topic`
    ///
    /// `prior_titles` are the topic titles already covered, oldest first.
    async fn fetch_recommendation(&self, topic: &Topic, prior_titles: &[String]) -> Result<Recommendation, KaraError>;

    /// Summary plus 3-5 ranked nuances over a whole thread
    ///
    /// Nuances are returned in the order the backend produced them.
    async fn fetch_synthesis(&self, original_topic_title: &str, turns: &[Turn]) -> Result<Synthesis, KaraError>;

    /// Replacement text for one workshop field
    async fn fetch_field_enhancement(
        &self,
        nuance_title: &str,
        field: WorkshopField,
        existing_content: &str,
    ) -> Result<String, KaraError>;
}

/// Create the advisor for this configuration
///
/// Falls back to [`CannedAdvisor`] when the configured API key variable is
/// unset or empty. Prompt overrides are looked up under the current directory.
pub fn create_advisor(config: &Config) -> Result<Arc<dyn Advisor>, LlmError> {
    debug!(provider = %config.llm.provider, "create_advisor: called");
    if !config.llm.has_credentials() {
        warn!(
            api_key_env = %config.llm.api_key_env,
            "{} not set, using canned responses", config.llm.api_key_env
        );
        return Ok(Arc::new(CannedAdvisor::new()));
    }

    let client = create_client(&config.llm)?;
    let prompts = match std::env::current_dir() {
        Ok(dir) => PromptLoader::new(dir),
        Err(e) => {
            debug!(error = %e, "create_advisor: no current dir, using embedded prompts");
            PromptLoader::embedded_only()
        }
    };
    Ok(Arc::new(LlmAdvisor::new(client, prompts, config.llm.max_tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_create_advisor_falls_back_without_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "KARA_TEST_ADVISOR_MISSING_KEY".to_string();
        unsafe { std::env::remove_var("KARA_TEST_ADVISOR_MISSING_KEY") };

        let advisor = create_advisor(&config).unwrap();
        let rec = advisor
            .fetch_recommendation(&crate::domain::catalogue::topics()[0], &[])
            .await
            .unwrap();
        assert_eq!(rec, CannedAdvisor::new().recommendation());
    }

    #[test]
    #[serial]
    fn test_create_advisor_empty_key_falls_back() {
        let mut config = Config::default();
        config.llm.provider = "not-a-provider".to_string();
        config.llm.api_key_env = "KARA_TEST_ADVISOR_EMPTY_KEY".to_string();
        unsafe { std::env::set_var("KARA_TEST_ADVISOR_EMPTY_KEY", "") };

        // The provider is never consulted without credentials
        assert!(create_advisor(&config).is_ok());
        unsafe { std::env::remove_var("KARA_TEST_ADVISOR_EMPTY_KEY") };
    }

    #[test]
    #[serial]
    fn test_create_advisor_unknown_provider_with_key() {
        let mut config = Config::default();
        config.llm.provider = "not-a-provider".to_string();
        config.llm.api_key_env = "KARA_TEST_ADVISOR_KEY".to_string();
        unsafe { std::env::set_var("KARA_TEST_ADVISOR_KEY", "sk-test") };

        let err = create_advisor(&config).err().unwrap();
        assert!(matches!(err, LlmError::Configuration(_)));
        unsafe { std::env::remove_var("KARA_TEST_ADVISOR_KEY") };
    }
}
