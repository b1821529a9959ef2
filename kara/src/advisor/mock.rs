//! Scripted advisor for unit tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::Advisor;
use crate::domain::{Choice, Nuance, Recommendation, Synthesis, Topic, Turn, WorkshopField};
use crate::error::{KaraError, RemoteCall};
use crate::llm::LlmError;

/// One scripted answer, optionally held until its gate is notified
pub struct Step<T> {
    result: Result<T, KaraError>,
    gate: Option<Arc<Notify>>,
}

impl<T> Step<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            gate: None,
        }
    }

    pub fn err(error: KaraError) -> Self {
        Self {
            result: Err(error),
            gate: None,
        }
    }

    /// Hold the answer until `gate.notify_one()` is called
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Recorded arguments of one advisor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Recommendation { topic: String, history: Vec<String> },
    Synthesis { original_topic_title: String, turns: usize },
    Enhancement { nuance_title: String, field: WorkshopField, existing: String },
}

/// Advisor answering from per-call queues, in call order
#[derive(Default)]
pub struct ScriptedAdvisor {
    recommendations: Mutex<VecDeque<Step<Recommendation>>>,
    syntheses: Mutex<VecDeque<Step<Synthesis>>>,
    suggestions: Mutex<VecDeque<Step<String>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommendation(self, step: Step<Recommendation>) -> Self {
        self.recommendations.lock().unwrap().push_back(step);
        self
    }

    pub fn synthesis(self, step: Step<Synthesis>) -> Self {
        self.syntheses.lock().unwrap().push_back(step);
        self
    }

    pub fn suggestion(self, step: Step<String>) -> Self {
        self.suggestions.lock().unwrap().push_back(step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(queue: &Mutex<VecDeque<Step<T>>>, call: RemoteCall) -> Result<T, KaraError> {
        let step = queue.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Err(KaraError::transport(
                call,
                LlmError::InvalidResponse("No more scripted responses".to_string()),
            ));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        step.result
    }
}

#[async_trait]
impl Advisor for ScriptedAdvisor {
    async fn fetch_recommendation(&self, topic: &Topic, prior_titles: &[String]) -> Result<Recommendation, KaraError> {
        self.calls.lock().unwrap().push(Call::Recommendation {
            topic: topic.title().to_string(),
            history: prior_titles.to_vec(),
        });
        Self::answer(&self.recommendations, RemoteCall::Recommendation).await
    }

    async fn fetch_synthesis(&self, original_topic_title: &str, turns: &[Turn]) -> Result<Synthesis, KaraError> {
        self.calls.lock().unwrap().push(Call::Synthesis {
            original_topic_title: original_topic_title.to_string(),
            turns: turns.len(),
        });
        Self::answer(&self.syntheses, RemoteCall::Synthesis).await
    }

    async fn fetch_field_enhancement(
        &self,
        nuance_title: &str,
        field: WorkshopField,
        existing_content: &str,
    ) -> Result<String, KaraError> {
        self.calls.lock().unwrap().push(Call::Enhancement {
            nuance_title: nuance_title.to_string(),
            field,
            existing: existing_content.to_string(),
        });
        Self::answer(&self.suggestions, RemoteCall::Enhancement).await
    }
}

/// Recommendation whose three choices are `{label} 1..3`
pub fn recommendation(label: &str) -> Recommendation {
    Recommendation {
        text: format!("Guidance for {}", label),
        choices: (1..=3)
            .map(|i| Choice::new(format!("{} {}", label, i), format!("Option {} of {}", i, label)))
            .collect(),
    }
}

/// Synthesis with one nuance per rank, in the given order
pub fn synthesis(ranks: &[i64]) -> Synthesis {
    Synthesis {
        summary: "Summary".to_string(),
        nuances: ranks
            .iter()
            .map(|r| Nuance::new(format!("Nuance {}", r), format!("Detail {}", r), *r))
            .collect(),
    }
}

pub fn transport_error(call: RemoteCall) -> KaraError {
    KaraError::transport(
        call,
        LlmError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        },
    )
}
