use super::artifact::{count_words, Citation};
use crate::gateway::AgentPayload;
use crate::shared::payload::{first_coerced_array, first_text, resolve_result, FieldPath};
use serde_json::Value;
use std::collections::BTreeSet;

const CONTENT_PATHS: &[FieldPath] = &[
    &["content"],
    &["post"],
    &["text"],
    &["data", "content"],
    &[],
];
const CITATION_PATHS: &[FieldPath] = &[&["citations"], &["sources"], &["data", "citations"]];
const POST_URL_PATHS: &[FieldPath] = &[&["post_url"], &["url"], &["postUrl"]];

/// Writer output after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftContent {
    pub content: String,
    pub citations: Vec<Citation>,
    pub hashtags: Option<BTreeSet<String>>,
    pub word_count: u32,
}

/// `None` when the payload carries no post text, from the result or the
/// response message.
pub fn normalize_draft(payload: &AgentPayload<'_>) -> Option<DraftContent> {
    let root = resolve_result(payload);
    let content = root
        .as_deref()
        .and_then(|root| first_text(root, CONTENT_PATHS))
        .or_else(|| {
            payload
                .message
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })?;

    let citations = root
        .as_deref()
        .and_then(|root| first_coerced_array(root, CITATION_PATHS, Citation::from_value))
        .unwrap_or_default();
    let hashtags = root.as_deref().and_then(normalize_hashtags);
    let word_count = root
        .as_deref()
        .and_then(|root| root.get("word_count").or_else(|| root.get("wordCount")))
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or_else(|| count_words(&content));

    Some(DraftContent {
        content,
        citations,
        hashtags,
        word_count,
    })
}

pub fn normalize_post_url(payload: &AgentPayload<'_>) -> Option<String> {
    let root = resolve_result(payload)?;
    first_text(&root, POST_URL_PATHS)
}

fn normalize_hashtags(root: &Value) -> Option<BTreeSet<String>> {
    let tags = root
        .get("hashtags")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(|tag| tag.trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{tag}"))
        .collect::<BTreeSet<_>>();
    (!tags.is_empty()).then_some(tags)
}
