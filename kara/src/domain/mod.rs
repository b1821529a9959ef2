//! Domain types for KARA
//!
//! Plain data: topics, turns, threads, synthesis and workshop content. The
//! state machines that mutate them live in `engine`, `store` and `workshop`.

pub mod catalogue;
mod conversation;
mod thread;
mod topic;
mod workshop;

pub use conversation::{Choice, Recommendation, Turn};
pub use thread::{Nuance, Synthesis, Thread, ThreadId};
pub use topic::Topic;
pub use workshop::{WorkshopContent, WorkshopField};
pub(crate) use workshop::FieldMap;
