//! Grounding-prompt construction.

use newsqa_core::types::{ConversationTurn, Role, ScoredResult};

/// System instruction constraining tone, domain, and length.
pub const SYSTEM_PROMPT: &str = "You are a news analyst for green shipping and marine environment topics. Answer only from the provided evidence, concisely and factually, in at most four sentences. If the evidence does not cover the question, say so plainly.";

const EXCERPT_CHARS: usize = 400;

/// Build the user prompt: one structured block per retrieved result, the
/// most recent conversation turns, then the question.
pub fn build_grounding_prompt(
    query: &str,
    results: &[ScoredResult],
    history: &[ConversationTurn],
    history_turns: usize,
) -> String {
    let mut prompt = String::from("Evidence from the news corpus:\n");
    for (i, result) in results.iter().enumerate() {
        let doc = &result.document;
        prompt.push_str(&format!("\n[{}] {}\n", i + 1, doc.title));
        if !doc.theme.is_empty() {
            prompt.push_str(&format!("Theme: {}\n", doc.theme));
        }
        if !doc.executor.is_empty() {
            prompt.push_str(&format!("Executor: {}\n", doc.executor));
        }
        if !doc.locations.is_empty() {
            prompt.push_str(&format!("Locations: {}\n", doc.locations.join(", ")));
        }
        if let Some(published) = doc.publish_time {
            prompt.push_str(&format!("Published: {}\n", published.format("%Y-%m-%d")));
        }
        if !doc.keywords.is_empty() {
            let keywords: Vec<&str> = doc.keywords.iter().map(String::as_str).collect();
            prompt.push_str(&format!("Keywords: {}\n", keywords.join(", ")));
        }
        if !doc.measure.is_empty() {
            prompt.push_str(&format!("Measures: {}\n", doc.measure));
        }
        if !doc.effect_data.is_empty() {
            prompt.push_str(&format!("Effect: {}\n", doc.effect_data));
        }
        if !doc.content.is_empty() {
            prompt.push_str(&format!("Excerpt: {}\n", excerpt(&doc.content)));
        }
    }

    let recent: Vec<&ConversationTurn> = history
        .iter()
        .rev()
        .take(history_turns)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if !recent.is_empty() {
        prompt.push_str("\nRecent conversation:\n");
        for turn in recent {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content));
        }
    }

    prompt.push_str(&format!(
        "\nQuestion: {query}\nAnswer from the evidence above, citing facts rather than speculation."
    ));
    prompt
}

fn excerpt(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}…")
}
