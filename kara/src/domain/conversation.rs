//! Recommendations and conversation turns

use serde::{Deserialize, Serialize};

/// A candidate next topic proposed by the advisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub title: String,
    pub description: String,
}

impl Choice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Guidance text plus follow-up choices for one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub choices: Vec<Choice>,
}

/// One completed topic + recommendation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub topic_title: String,
    pub topic_description: String,
    pub recommendation: Recommendation,
}
