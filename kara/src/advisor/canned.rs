//! Fixed responses used when no API key is configured

use async_trait::async_trait;
use tracing::debug;

use super::Advisor;
use crate::domain::{Choice, Nuance, Recommendation, Synthesis, Topic, Turn, WorkshopField};
use crate::error::KaraError;

const RECOMMENDATION_TEXT: &str = "This is a mock response for the main recommendation. In a real scenario, KARA would provide a detailed guide on user research. For example, we would explore how to conduct effective user interviews, synthesize findings into actionable insights, and create data-driven personas that genuinely inform the design process. The goal is to build empathy and ensure every design decision is rooted in user needs.";

const CHOICES: [(&str, &str); 3] = [
    (
        "Contextual Inquiry",
        "Observe users in their natural environment to gain deep insights into their behaviors, needs, and the context of their work.",
    ),
    (
        "User Surveys & Questionnaires",
        "Gather quantitative and qualitative data from a large user base to identify broad patterns, preferences, and pain points.",
    ),
    (
        "Competitive Analysis",
        "Evaluate competitor products to understand industry standards, identify opportunities for differentiation, and avoid common pitfalls.",
    ),
];

const SYNTHESIS_SUMMARY: &str = "This is a mock deep research summary. Based on the conversation about User Research, the primary goal is to establish a user-centric foundation. This involves moving from abstract ideas to concrete, data-driven personas and user stories. The following nuanced action items are critical for success.";

const NUANCES: [(&str, &str, i64); 3] = [
    (
        "Establish a Recruitment Pipeline",
        "Before conducting research, establish a clear and ethical pipeline for recruiting participants. Define criteria, create screeners, and manage consent forms. This ensures a consistent flow of relevant users for ongoing research.",
        1,
    ),
    (
        "Synthesize Findings with Affinity Mapping",
        "Don't just collect data; synthesize it. Use techniques like affinity mapping to group observations and identify recurring themes and patterns. This is how raw data becomes actionable insight.",
        2,
    ),
    (
        "Create Actionable 'Job Stories,' Not Just Personas",
        "While personas are useful, frame user needs as 'Job Stories' (When [situation], I want to [motivation], so I can [expected outcome]). This format is more actionable for designers and developers.",
        3,
    ),
];

const SUGGESTION: &str = "This is a mock AI suggestion. Based on the goal, here are some actionable steps:\n1. Define clear, measurable outcomes for this phase.\n2. Break down the process into smaller, manageable tasks for the team.\n3. Assign owners and establish timelines to ensure accountability and progress.";

/// Deterministic advisor that ignores its inputs
#[derive(Debug, Clone, Default)]
pub struct CannedAdvisor;

impl CannedAdvisor {
    pub fn new() -> Self {
        Self
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation {
            text: RECOMMENDATION_TEXT.to_string(),
            choices: CHOICES.iter().map(|(t, d)| Choice::new(*t, *d)).collect(),
        }
    }

    pub fn synthesis(&self) -> Synthesis {
        Synthesis {
            summary: SYNTHESIS_SUMMARY.to_string(),
            nuances: NUANCES.iter().map(|(t, d, i)| Nuance::new(*t, *d, *i)).collect(),
        }
    }

    pub fn suggestion(&self) -> String {
        SUGGESTION.to_string()
    }
}

#[async_trait]
impl Advisor for CannedAdvisor {
    async fn fetch_recommendation(&self, topic: &Topic, _prior_titles: &[String]) -> Result<Recommendation, KaraError> {
        debug!(topic = %topic.title(), "CannedAdvisor::fetch_recommendation: called");
        Ok(self.recommendation())
    }

    async fn fetch_synthesis(&self, original_topic_title: &str, _turns: &[Turn]) -> Result<Synthesis, KaraError> {
        debug!(%original_topic_title, "CannedAdvisor::fetch_synthesis: called");
        Ok(self.synthesis())
    }

    async fn fetch_field_enhancement(
        &self,
        nuance_title: &str,
        field: WorkshopField,
        _existing_content: &str,
    ) -> Result<String, KaraError> {
        debug!(%nuance_title, %field, "CannedAdvisor::fetch_field_enhancement: called");
        Ok(self.suggestion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue;

    #[tokio::test]
    async fn test_same_payload_every_call() {
        let advisor = CannedAdvisor::new();
        let topics = catalogue::topics();

        let first = advisor.fetch_recommendation(&topics[0], &[]).await.unwrap();
        let second = advisor
            .fetch_recommendation(&topics[3], &["Earlier".to_string()])
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.choices.len(), 3);
        assert_eq!(first.choices[0].title, "Contextual Inquiry");
    }

    #[tokio::test]
    async fn test_canned_synthesis_is_ranked() {
        let synthesis = CannedAdvisor::new().fetch_synthesis("Anything", &[]).await.unwrap();
        let ranks: Vec<i64> = synthesis.nuances.iter().map(|n| n.importance).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(synthesis.nuances.iter().all(|n| n.workshop.is_none()));
    }

    #[tokio::test]
    async fn test_canned_suggestion_ignores_field() {
        let advisor = CannedAdvisor::new();
        let a = advisor
            .fetch_field_enhancement("Goal", WorkshopField::KeyObjectives, "")
            .await
            .unwrap();
        let b = advisor
            .fetch_field_enhancement("Goal", WorkshopField::SuccessMetrics, "draft")
            .await
            .unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("This is a mock AI suggestion."));
    }
}
