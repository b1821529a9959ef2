//! Error taxonomy for KARA operations
//!
//! Every engine, store and workshop operation returns `KaraError` on failure
//! and leaves its state as it was before the call.

use std::fmt;

use thiserror::Error;

use crate::domain::{ThreadId, WorkshopField};
use crate::llm::LlmError;

/// The remote call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    Recommendation,
    Synthesis,
    Enhancement,
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteCall::Recommendation => "recommendation",
            RemoteCall::Synthesis => "deep research",
            RemoteCall::Enhancement => "workshop enhancement",
        };
        write!(f, "{}", name)
    }
}

/// An operation was invoked in a state that does not allow it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(ThreadId),

    #[error("Thread {0} has no deep research yet")]
    NoSynthesis(ThreadId),

    #[error("Nuance index {index} out of range (thread has {len})")]
    NuanceOutOfRange { index: usize, len: usize },

    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Choice index {index} out of range (last turn has {len})")]
    ChoiceOutOfRange { index: usize, len: usize },

    #[error("Field {0} is already generating")]
    AlreadyGenerating(WorkshopField),

    #[error("No nuance loaded in the workshop")]
    NoWorkshopTarget,
}

/// Errors surfaced by KARA operations
#[derive(Debug, Error)]
pub enum KaraError {
    /// The remote call could not be completed
    #[error("{call} request failed: {source}")]
    Transport {
        call: RemoteCall,
        #[source]
        source: LlmError,
    },

    /// A response arrived but did not have the required shape
    #[error("Unexpected {call} response shape: {reason}")]
    Schema { call: RemoteCall, reason: String },

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

impl KaraError {
    pub fn transport(call: RemoteCall, source: LlmError) -> Self {
        KaraError::Transport { call, source }
    }

    pub fn schema(call: RemoteCall, reason: impl Into<String>) -> Self {
        KaraError::Schema {
            call,
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, KaraError::Transport { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, KaraError::Schema { .. })
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, KaraError::Precondition(_))
    }

    /// Whether retrying the same operation later could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            KaraError::Transport { source, .. } => source.is_retryable(),
            KaraError::Schema { .. } => true,
            KaraError::Precondition(_) => false,
        }
    }

    /// Message suitable for showing inline to the user
    pub fn user_message(&self) -> String {
        match self {
            KaraError::Transport { call, source } => match call {
                RemoteCall::Recommendation => format!(
                    "Sorry, I encountered an error while generating the recommendation: {}.",
                    source
                ),
                RemoteCall::Synthesis => format!("Sorry, an error occurred during deep research analysis: {}.", source),
                RemoteCall::Enhancement => {
                    format!("Sorry, an error occurred while generating content: {}.", source)
                }
            },
            KaraError::Schema { call, .. } => match call {
                RemoteCall::Recommendation => {
                    "Failed to interpret KARA's response. The data structure was unexpected. Please try again."
                        .to_string()
                }
                RemoteCall::Synthesis => {
                    "Failed to interpret KARA's deep research. The data structure was unexpected.".to_string()
                }
                RemoteCall::Enhancement => "Failed to interpret KARA's suggestion.".to_string(),
            },
            KaraError::Precondition(e) => e.to_string(),
        }
    }
}
