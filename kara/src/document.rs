//! Markdown documents for nuances and threads

use crate::domain::{Nuance, Thread, WorkshopField};

const EMPTY_SECTION: &str = "_Not yet defined._";

/// Planning document for one nuance
pub fn render_nuance_document(nuance: &Nuance) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", nuance.title));
    md.push_str(&format!("**Importance:** {}\n\n", nuance.importance));
    md.push_str(&format!("{}\n", nuance.detail.trim()));

    let content = nuance.workshop.clone().unwrap_or_default();
    for field in WorkshopField::ALL {
        let text = content.get(field).trim();
        md.push_str(&format!("\n## {}\n\n", field.label()));
        md.push_str(if text.is_empty() { EMPTY_SECTION } else { text });
        md.push('\n');
    }

    md
}

/// Transcript of a thread followed by its deep research, if any
pub fn render_thread_document(thread: &Thread) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", thread.original_topic_title));
    md.push_str(&format!("_Saved {}_\n", thread.created_at.format("%Y-%m-%d %H:%M UTC")));

    for (idx, turn) in thread.turns.iter().enumerate() {
        md.push_str(&format!("\n## {}. {}\n\n", idx + 1, turn.topic_title));
        if !turn.topic_description.is_empty() {
            md.push_str(&format!("> {}\n\n", turn.topic_description));
        }
        md.push_str(&format!("{}\n\n", turn.recommendation.text.trim()));
        md.push_str("**Options:**\n\n");
        for choice in &turn.recommendation.choices {
            md.push_str(&format!("- **{}**: {}\n", choice.title, choice.description));
        }
    }

    if let Some(synthesis) = &thread.synthesis {
        md.push_str("\n## Deep Research\n\n");
        md.push_str(&format!("{}\n", synthesis.summary.trim()));
        for (idx, nuance) in synthesis.nuances.iter().enumerate() {
            md.push_str(&format!(
                "\n### {}. {} (importance {})\n\n",
                idx + 1,
                nuance.title,
                nuance.importance
            ));
            md.push_str(&format!("{}\n", nuance.detail.trim()));
        }
    }

    md
}
