use crate::gateway::AgentPayload;
use serde_json::Value;
use std::borrow::Cow;

/// Ordered keys into a JSON value. The empty path is the value itself.
pub type FieldPath = &'static [&'static str];

/// Resolves the `result` of an accepted payload. String results carrying JSON,
/// bare or inside a ``` fence, are decoded; any other string stays a string.
pub fn resolve_result<'a>(payload: &AgentPayload<'a>) -> Option<Cow<'a, Value>> {
    match payload.result? {
        Value::Null => None,
        Value::String(raw) => Some(
            parse_embedded_json(raw)
                .map(Cow::Owned)
                .unwrap_or_else(|| Cow::Owned(Value::String(raw.clone()))),
        ),
        other => Some(Cow::Borrowed(other)),
    }
}

pub fn parse_embedded_json(raw: &str) -> Option<Value> {
    let body = strip_code_fence(raw.trim());
    if !(body.starts_with('{') || body.starts_with('[')) {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn strip_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    let rest = rest.trim_start_matches(|ch: char| ch.is_ascii_alphanumeric());
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}

pub fn lookup<'v>(root: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

/// Tries each candidate path in order and coerces array elements independently.
/// The first path producing at least one coerced element wins.
pub fn first_coerced_array<T>(
    root: &Value,
    paths: &[FieldPath],
    coerce: impl Fn(&Value) -> Option<T>,
) -> Option<Vec<T>> {
    paths
        .iter()
        .filter_map(|path| lookup(root, path))
        .filter_map(Value::as_array)
        .map(|items| items.iter().filter_map(&coerce).collect::<Vec<_>>())
        .find(|coerced| !coerced.is_empty())
}

pub fn non_empty_text(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

pub fn first_text(root: &Value, paths: &[FieldPath]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| lookup(root, path))
        .find_map(non_empty_text)
}

/// First non-empty string among `keys` of an object.
pub fn text_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find_map(non_empty_text)
}

/// Coerces a list of points. Elements may be strings or objects with a
/// `text`/`point`/`description` field; anything else is dropped.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                non_empty_text(item).or_else(|| text_field(item, &["text", "point", "description"]))
            })
            .collect(),
        other => non_empty_text(other).into_iter().collect(),
    }
}
