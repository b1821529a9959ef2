//! LLM Client module for KARA
//!
//! Provides the provider-agnostic completion trait and its HTTP implementations.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "anthropic" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Configuration(format!(
                "Unknown LLM provider: '{}'. Supported: anthropic, openai",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "gemini".to_string(),
            ..Default::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Configuration(_)));
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    #[serial]
    fn test_create_client_missing_key() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            api_key_env: "KARA_TEST_MISSING_KEY".to_string(),
            ..Default::default()
        };
        unsafe { std::env::remove_var("KARA_TEST_MISSING_KEY") };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Configuration(_)));
    }

    #[test]
    #[serial]
    fn test_create_client_with_key() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            api_key_env: "KARA_TEST_PRESENT_KEY".to_string(),
            ..Default::default()
        };
        unsafe { std::env::set_var("KARA_TEST_PRESENT_KEY", "sk-test") };
        assert!(create_client(&config).is_ok());
        unsafe { std::env::remove_var("KARA_TEST_PRESENT_KEY") };
    }
}
