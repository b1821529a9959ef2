//! Advisor backed by an LLM client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Advisor;
use crate::domain::{Choice, Nuance, Recommendation, Synthesis, Topic, Turn, WorkshopField};
use crate::error::{KaraError, RemoteCall};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::{EnhancementContext, PromptLoader, RecommendationContext, SynthesisContext};

const CHOICE_COUNT: usize = 3;
const MIN_NUANCES: usize = 3;
const MAX_NUANCES: usize = 5;

#[derive(Debug, Deserialize)]
struct RecommendationPayload {
    recommendation: String,
    choices: Vec<ChoicePayload>,
}

#[derive(Debug, Deserialize)]
struct ChoicePayload {
    title: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct SynthesisPayload {
    summary: String,
    nuances: Vec<NuancePayload>,
}

#[derive(Debug, Deserialize)]
struct NuancePayload {
    title: String,
    detail: String,
    importance: f64,
}

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    suggestion: String,
}

/// Advisor that renders prompt templates and validates the model's JSON
pub struct LlmAdvisor {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl LlmAdvisor {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        Self {
            client,
            prompts,
            max_tokens,
        }
    }

    /// Render `template`, send it, and return the raw response text
    async fn complete<C: serde::Serialize + Sync>(
        &self,
        call: RemoteCall,
        template: &str,
        context: &C,
    ) -> Result<String, KaraError> {
        debug!(%call, %template, "LlmAdvisor::complete: called");
        let prompt_error = |e: eyre::Report| KaraError::transport(call, LlmError::Configuration(e.to_string()));
        let system_prompt = self.prompts.system_prompt().map_err(prompt_error)?;
        let prompt = self.prompts.render(template, context).map_err(prompt_error)?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self.client.complete(request).await.map_err(|e| {
            warn!(%call, error = %e, "LlmAdvisor::complete: request failed");
            KaraError::transport(call, e)
        })?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "LlmAdvisor::complete: response received"
        );

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(KaraError::schema(call, "empty response")),
        }
    }
}

/// Strip an optional Markdown code fence around a JSON object
pub(crate) fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the info string (e.g. "json") on the opening fence line; a
        // single-line fence has none to split off, so start at the object
        let body = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest.find('{').map(|start| &rest[start..]).unwrap_or(rest),
        };
        let body = body.trim_end();
        return body.strip_suffix("```").unwrap_or(body).trim();
    }
    if !trimmed.starts_with('{')
        && let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        return &trimmed[start..=end];
    }
    trimmed
}

fn parse_payload<T: DeserializeOwned>(call: RemoteCall, text: &str) -> Result<T, KaraError> {
    serde_json::from_str(extract_json(text)).map_err(|e| {
        warn!(%call, error = %e, raw = %text, "parse_payload: invalid JSON");
        KaraError::schema(call, e.to_string())
    })
}

fn validate_recommendation(payload: RecommendationPayload) -> Result<Recommendation, KaraError> {
    let call = RemoteCall::Recommendation;
    if payload.recommendation.trim().is_empty() {
        return Err(KaraError::schema(call, "empty recommendation text"));
    }
    if payload.choices.len() != CHOICE_COUNT {
        return Err(KaraError::schema(
            call,
            format!("expected {} choices, got {}", CHOICE_COUNT, payload.choices.len()),
        ));
    }
    if payload
        .choices
        .iter()
        .any(|c| c.title.trim().is_empty() || c.description.trim().is_empty())
    {
        return Err(KaraError::schema(call, "choice with empty title or description"));
    }

    Ok(Recommendation {
        text: payload.recommendation,
        choices: payload
            .choices
            .into_iter()
            .map(|c| Choice::new(c.title, c.description))
            .collect(),
    })
}

fn validate_synthesis(payload: SynthesisPayload) -> Result<Synthesis, KaraError> {
    let call = RemoteCall::Synthesis;
    if payload.summary.trim().is_empty() {
        return Err(KaraError::schema(call, "empty summary"));
    }
    let count = payload.nuances.len();
    if !(MIN_NUANCES..=MAX_NUANCES).contains(&count) {
        return Err(KaraError::schema(
            call,
            format!("expected {}-{} nuances, got {}", MIN_NUANCES, MAX_NUANCES, count),
        ));
    }

    let mut nuances = Vec::with_capacity(count);
    for n in payload.nuances {
        if !n.importance.is_finite() || n.importance.fract() != 0.0 {
            return Err(KaraError::schema(
                call,
                format!("importance of '{}' is not an integer: {}", n.title, n.importance),
            ));
        }
        if n.title.trim().is_empty() {
            return Err(KaraError::schema(call, "nuance with empty title"));
        }
        nuances.push(Nuance::new(n.title, n.detail, n.importance as i64));
    }

    Ok(Synthesis {
        summary: payload.summary,
        nuances,
    })
}

fn validate_suggestion(payload: SuggestionPayload) -> Result<String, KaraError> {
    if payload.suggestion.trim().is_empty() {
        return Err(KaraError::schema(RemoteCall::Enhancement, "empty suggestion"));
    }
    Ok(payload.suggestion)
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn fetch_recommendation(&self, topic: &Topic, prior_titles: &[String]) -> Result<Recommendation, KaraError> {
        debug!(topic = %topic.title(), history_len = prior_titles.len(), "LlmAdvisor::fetch_recommendation: called");
        let call = RemoteCall::Recommendation;
        let context = RecommendationContext::new(topic, prior_titles);
        let text = self.complete(call, "recommendation", &context).await?;
        validate_recommendation(parse_payload(call, &text)?)
    }

    async fn fetch_synthesis(&self, original_topic_title: &str, turns: &[Turn]) -> Result<Synthesis, KaraError> {
        debug!(%original_topic_title, turn_count = turns.len(), "LlmAdvisor::fetch_synthesis: called");
        let call = RemoteCall::Synthesis;
        let context = SynthesisContext::new(original_topic_title, turns);
        let text = self.complete(call, "synthesis", &context).await?;
        validate_synthesis(parse_payload(call, &text)?)
    }

    async fn fetch_field_enhancement(
        &self,
        nuance_title: &str,
        field: WorkshopField,
        existing_content: &str,
    ) -> Result<String, KaraError> {
        debug!(%nuance_title, %field, "LlmAdvisor::fetch_field_enhancement: called");
        let call = RemoteCall::Enhancement;
        let context = EnhancementContext::new(nuance_title, field, existing_content);
        let text = self.complete(call, "enhancement", &context).await?;
        validate_suggestion(parse_payload(call, &text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;

    fn advisor(responses: Vec<Result<CompletionResponse, String>>) -> (LlmAdvisor, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::scripted(responses));
        let advisor = LlmAdvisor::new(mock.clone(), PromptLoader::embedded_only(), 4096);
        (advisor, mock)
    }

    fn reply(text: &str) -> Result<CompletionResponse, String> {
        Ok(CompletionResponse::text(text))
    }

    const GOOD_RECOMMENDATION: &str = r#"{
        "recommendation": "Interview five users.",
        "choices": [
            {"title": "Contextual Inquiry", "description": "Observe"},
            {"title": "Surveys", "description": "Ask many"},
            {"title": "Competitive Analysis", "description": "Compare"}
        ]
    }"#;

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(extract_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(extract_json("Here you go: {\"a\":1} thanks"), "{\"a\":1}");
        assert_eq!(
            extract_json("```json {\"suggestion\": \"x\"} ```"),
            "{\"suggestion\": \"x\"}"
        );
        assert_eq!(extract_json("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_suggestion_in_single_line_fence() {
        let (advisor, _) = advisor(vec![reply("```json {\"suggestion\": \"1. Ship it\"} ```")]);
        let suggestion = advisor
            .fetch_field_enhancement("Goal", WorkshopField::ActionSteps, "")
            .await
            .unwrap();
        assert_eq!(suggestion, "1. Ship it");
    }

    #[tokio::test]
    async fn test_recommendation_parses_and_sends_history() {
        let (advisor, mock) = advisor(vec![reply(GOOD_RECOMMENDATION)]);
        let topic = catalogue::topics()[0].clone();
        let history = vec!["User Research & Persona Definition".to_string()];

        let rec = advisor.fetch_recommendation(&topic, &history).await.unwrap();
        assert_eq!(rec.text, "Interview five users.");
        assert_eq!(rec.choices.len(), 3);
        assert_eq!(rec.choices[2].title, "Competitive Analysis");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 4096);
        assert!(requests[0].system_prompt.contains("KARA"));
        assert!(requests[0].messages[0].content.contains("User Research & Persona Definition"));
    }

    #[tokio::test]
    async fn test_recommendation_in_code_fence() {
        let fenced = format!("```json\n{}\n```", GOOD_RECOMMENDATION);
        let (advisor, _) = advisor(vec![reply(&fenced)]);
        let rec = advisor
            .fetch_recommendation(&catalogue::topics()[1], &[])
            .await
            .unwrap();
        assert_eq!(rec.choices.len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_choice_count_is_schema_failure() {
        let two = r#"{"recommendation": "x", "choices": [
            {"title": "a", "description": "b"},
            {"title": "c", "description": "d"}
        ]}"#;
        let (advisor, _) = advisor(vec![reply(two)]);
        let err = advisor
            .fetch_recommendation(&catalogue::topics()[0], &[])
            .await
            .unwrap_err();
        assert!(err.is_schema());
    }

    #[tokio::test]
    async fn test_missing_key_is_schema_failure() {
        let (advisor, _) = advisor(vec![reply(r#"{"choices": []}"#)]);
        let err = advisor
            .fetch_recommendation(&catalogue::topics()[0], &[])
            .await
            .unwrap_err();
        assert!(err.is_schema());
        assert!(matches!(err, KaraError::Schema { call: RemoteCall::Recommendation, .. }));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let (advisor, _) = advisor(vec![Err("overloaded".to_string())]);
        let err = advisor
            .fetch_recommendation(&catalogue::topics()[0], &[])
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(err.user_message().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_empty_content_is_schema_failure() {
        let (advisor, _) = advisor(vec![reply("   ")]);
        let err = advisor.fetch_synthesis("Topic", &[]).await.unwrap_err();
        assert!(err.is_schema());
    }

    #[tokio::test]
    async fn test_synthesis_keeps_backend_order() {
        let body = r#"{"summary": "s", "nuances": [
            {"title": "c", "detail": "", "importance": 3},
            {"title": "a", "detail": "", "importance": 1.0},
            {"title": "b", "detail": "", "importance": 2}
        ]}"#;
        let (advisor, _) = advisor(vec![reply(body)]);
        let synthesis = advisor.fetch_synthesis("Topic", &[]).await.unwrap();
        let ranks: Vec<i64> = synthesis.nuances.iter().map(|n| n.importance).collect();
        assert_eq!(ranks, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_synthesis_rejects_fractional_importance() {
        let body = r#"{"summary": "s", "nuances": [
            {"title": "a", "detail": "", "importance": 1},
            {"title": "b", "detail": "", "importance": 1.5},
            {"title": "c", "detail": "", "importance": 3}
        ]}"#;
        let (advisor, _) = advisor(vec![reply(body)]);
        assert!(advisor.fetch_synthesis("Topic", &[]).await.unwrap_err().is_schema());
    }

    #[tokio::test]
    async fn test_synthesis_rejects_too_few_nuances() {
        let body = r#"{"summary": "s", "nuances": [
            {"title": "a", "detail": "", "importance": 1}
        ]}"#;
        let (advisor, _) = advisor(vec![reply(body)]);
        assert!(advisor.fetch_synthesis("Topic", &[]).await.unwrap_err().is_schema());
    }

    #[tokio::test]
    async fn test_enhancement_sends_field_and_existing_text() {
        let (advisor, mock) = advisor(vec![reply(r#"{"suggestion": "1. Recruit\n2. Screen"}"#)]);
        let text = advisor
            .fetch_field_enhancement("Recruitment Pipeline", WorkshopField::SuccessMetrics, "draft")
            .await
            .unwrap();
        assert_eq!(text, "1. Recruit\n2. Screen");

        let prompt = &mock.requests()[0].messages[0].content;
        assert!(prompt.contains("successMetrics"));
        assert!(prompt.contains("\"draft\""));
    }

    #[tokio::test]
    async fn test_empty_suggestion_is_schema_failure() {
        let (advisor, _) = advisor(vec![reply(r#"{"suggestion": ""}"#)]);
        let err = advisor
            .fetch_field_enhancement("Goal", WorkshopField::KeyObjectives, "")
            .await
            .unwrap_err();
        assert!(matches!(err, KaraError::Schema { call: RemoteCall::Enhancement, .. }));
    }
}
