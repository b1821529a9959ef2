//! KARA - Guided UI/UX ideation engine
//!
//! KARA walks a user through a catalogue of UI/UX topics. Each topic yields an
//! AI recommendation with three follow-up choices; following a choice extends
//! the conversation. Conversations can be bookmarked as threads, distilled into
//! ranked action items ("deep research"), and each action item refined in a
//! workshop of three planning fields.
//!
//! # Core Concepts
//!
//! - **Session Memory Only**: threads live for the lifetime of the process
//! - **Explicit Failure**: every remote call returns a `KaraError` and leaves
//!   state as it was before the call
//! - **Offline Fallback**: without an API key the canned advisor answers
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait with Anthropic and OpenAI implementations
//! - [`advisor`] - The three remote calls (recommendation, synthesis, enhancement)
//! - [`engine`] - In-progress conversation state machine
//! - [`store`] - Bookmarked threads and deep research
//! - [`workshop`] - Per-nuance planning fields
//! - [`document`] - Markdown rendering of threads and nuances
//! - [`config`] - Configuration types and loading
//! - [`cli`] / [`repl`] - Command-line interface and interactive shell

pub mod advisor;
pub mod cli;
pub mod config;
pub mod document;
pub mod domain;
pub mod engine;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod store;
pub mod workshop;

// Re-export commonly used types
pub use advisor::{Advisor, CannedAdvisor, LlmAdvisor, create_advisor};
pub use config::{Config, LlmConfig};
pub use domain::{
    Choice, Nuance, Recommendation, Synthesis, Thread, ThreadId, Topic, Turn, WorkshopContent, WorkshopField, catalogue,
};
pub use engine::ConversationEngine;
pub use error::{KaraError, PreconditionError, RemoteCall};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use store::ThreadStore;
pub use workshop::{FieldStatus, FieldView, WorkshopSession, WorkshopTarget};
