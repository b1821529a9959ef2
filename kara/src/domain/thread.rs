//! Bookmarked threads and their deep-research synthesis

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Turn, WorkshopContent};

/// Unique thread identifier (UUIDv7, so ids sort by creation time)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing id string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for compact display
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ranked action item of a synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nuance {
    pub title: String,
    pub detail: String,
    /// Rank, 1 = most critical
    pub importance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop: Option<WorkshopContent>,
}

impl Nuance {
    pub fn new(title: impl Into<String>, detail: impl Into<String>, importance: i64) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            importance,
            workshop: None,
        }
    }
}

/// Deep-research result for a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub summary: String,
    /// Ascending by importance
    pub nuances: Vec<Nuance>,
}

impl Synthesis {
    /// Build a synthesis with nuances sorted ascending by importance
    ///
    /// The sort is stable: equal ranks keep the order the advisor gave them.
    pub fn ranked(summary: impl Into<String>, mut nuances: Vec<Nuance>) -> Self {
        nuances.sort_by_key(|n| n.importance);
        Self {
            summary: summary.into(),
            nuances,
        }
    }
}

/// A bookmarked conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub original_topic_title: String,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub synthesis: Option<Synthesis>,
    pub synthesis_in_progress: bool,
}

impl Thread {
    /// Snapshot a conversation into a new thread with a fresh id
    pub fn new(original_topic_title: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            id: ThreadId::generate(),
            original_topic_title: original_topic_title.into(),
            turns,
            created_at: Utc::now(),
            synthesis: None,
            synthesis_in_progress: false,
        }
    }

    /// Title of the most recent turn
    pub fn latest_topic_title(&self) -> Option<&str> {
        self.turns.last().map(|t| t.topic_title.as_str())
    }
}
