//! Topics a conversation can focus on

use serde::{Deserialize, Serialize};

use super::Choice;

/// A subject for one conversation step
///
/// Catalogue entries carry their display ordinal. Topics built from a followed
/// choice have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topic {
    Catalogued {
        ordinal: u32,
        title: String,
        description: String,
    },
    Derived {
        title: String,
        description: String,
    },
}

impl Topic {
    pub fn catalogued(ordinal: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Topic::Catalogued {
            ordinal,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Next topic built from a followed choice
    pub fn from_choice(choice: &Choice) -> Self {
        Topic::Derived {
            title: choice.title.clone(),
            description: choice.description.clone(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Topic::Catalogued { title, .. } | Topic::Derived { title, .. } => title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Topic::Catalogued { description, .. } | Topic::Derived { description, .. } => description,
        }
    }

    pub fn ordinal(&self) -> Option<u32> {
        match self {
            Topic::Catalogued { ordinal, .. } => Some(*ordinal),
            Topic::Derived { .. } => None,
        }
    }
}
