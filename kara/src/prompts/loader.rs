//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::domain::{Topic, Turn, WorkshopField};

/// Context for the recommendation template
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationContext {
    pub topic_title: String,
    pub topic_description: String,
    /// Prior topic titles joined with " -> "
    pub history: String,
    pub has_history: bool,
}

impl RecommendationContext {
    pub fn new(topic: &Topic, prior_titles: &[String]) -> Self {
        debug!(topic = %topic.title(), history_len = prior_titles.len(), "RecommendationContext::new: called");
        Self {
            topic_title: topic.title().to_string(),
            topic_description: topic.description().to_string(),
            history: prior_titles.join(" -> "),
            has_history: !prior_titles.is_empty(),
        }
    }
}

/// Context for the deep research template
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisContext {
    pub original_topic_title: String,
    /// Rendered transcript: one "Step / Recommendation" block per turn
    pub conversation: String,
}

impl SynthesisContext {
    pub fn new(original_topic_title: &str, turns: &[Turn]) -> Self {
        debug!(%original_topic_title, turn_count = turns.len(), "SynthesisContext::new: called");
        let conversation = turns
            .iter()
            .map(|turn| {
                format!(
                    "Step: {}\nKARA's Recommendation: {}",
                    turn.topic_title, turn.recommendation.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        Self {
            original_topic_title: original_topic_title.to_string(),
            conversation,
        }
    }
}

/// Context for the workshop enhancement template
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementContext {
    pub nuance_title: String,
    pub field_name: String,
    pub existing_content: String,
}

impl EnhancementContext {
    pub fn new(nuance_title: &str, field: WorkshopField, existing_content: &str) -> Self {
        Self {
            nuance_title: nuance_title.to_string(),
            field_name: field.name().to_string(),
            existing_content: existing_content.to_string(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.kara/prompts/`)
    user_dir: Option<PathBuf>,
    /// Project default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// Looks for `.kara/prompts/` and `prompts/` under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".kara/prompts");
        let repo_dir = root.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
            repo_dir: if repo_dir_exists { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Prompts are plain text, not HTML, so nothing is escaped
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.kara/prompts/{name}.pmt`
    /// 2. Project default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        debug!("PromptLoader::load_template: trying embedded fallback");
        if let Some(content) = embedded::get_embedded(name) {
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// The shared system prompt
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::system_prompt: called");
        self.load_template("system")
    }
}
