//! Workshop planning fields

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three planning fields attached to a nuance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkshopField {
    KeyObjectives,
    ActionSteps,
    SuccessMetrics,
}

impl WorkshopField {
    pub const ALL: [WorkshopField; 3] = [
        WorkshopField::KeyObjectives,
        WorkshopField::ActionSteps,
        WorkshopField::SuccessMetrics,
    ];

    /// Name sent to the advisor
    pub fn name(&self) -> &'static str {
        match self {
            WorkshopField::KeyObjectives => "keyObjectives",
            WorkshopField::ActionSteps => "actionSteps",
            WorkshopField::SuccessMetrics => "successMetrics",
        }
    }

    /// Human-readable heading
    pub fn label(&self) -> &'static str {
        match self {
            WorkshopField::KeyObjectives => "Key Objectives",
            WorkshopField::ActionSteps => "Action Steps",
            WorkshopField::SuccessMetrics => "Success Metrics",
        }
    }

    fn index(&self) -> usize {
        match self {
            WorkshopField::KeyObjectives => 0,
            WorkshopField::ActionSteps => 1,
            WorkshopField::SuccessMetrics => 2,
        }
    }
}

impl fmt::Display for WorkshopField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for WorkshopField {
    type Err = String;

    /// Accepts the wire name, a kebab/snake spelling, or a short alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "keyobjectives" | "objectives" | "ko" => Ok(WorkshopField::KeyObjectives),
            "actionsteps" | "steps" | "as" => Ok(WorkshopField::ActionSteps),
            "successmetrics" | "metrics" | "sm" => Ok(WorkshopField::SuccessMetrics),
            _ => Err(format!(
                "Unknown workshop field '{}'. Expected one of: keyObjectives, actionSteps, successMetrics",
                s
            )),
        }
    }
}

/// Saved text of the three planning fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopContent {
    pub key_objectives: String,
    pub action_steps: String,
    pub success_metrics: String,
}

impl WorkshopContent {
    pub fn get(&self, field: WorkshopField) -> &str {
        match field {
            WorkshopField::KeyObjectives => &self.key_objectives,
            WorkshopField::ActionSteps => &self.action_steps,
            WorkshopField::SuccessMetrics => &self.success_metrics,
        }
    }

    pub fn set(&mut self, field: WorkshopField, text: impl Into<String>) {
        let slot = match field {
            WorkshopField::KeyObjectives => &mut self.key_objectives,
            WorkshopField::ActionSteps => &mut self.action_steps,
            WorkshopField::SuccessMetrics => &mut self.success_metrics,
        };
        *slot = text.into();
    }

    pub fn is_empty(&self) -> bool {
        WorkshopField::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }
}

/// Per-field storage indexed by `WorkshopField`
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldMap<T>([T; 3]);

impl<T> FieldMap<T> {
    pub(crate) fn get(&self, field: WorkshopField) -> &T {
        &self.0[field.index()]
    }

    pub(crate) fn get_mut(&mut self, field: WorkshopField) -> &mut T {
        &mut self.0[field.index()]
    }
}
