use super::{
    Bias, DecisionCanvas, DecisionOption, Importance, Priority, Question, Stage, StageRecord,
};
use crate::gateway::AgentPayload;
use crate::shared::payload::{
    first_coerced_array, first_text, non_empty_text, resolve_result, string_list, text_field,
    FieldPath,
};
use serde_json::Value;

const QUESTION_PATHS: &[FieldPath] = &[
    &["questions"],
    &["data", "questions"],
    &["clarifying_questions"],
    &[],
];
const DECISION_PATHS: &[FieldPath] = &[
    &["decision_statement"],
    &["clarified_decision"],
    &["decision"],
    &["data", "decision_statement"],
];
const OPTION_PATHS: &[FieldPath] = &[
    &["options"],
    &["data", "options"],
    &["decision_canvas", "options"],
];
const PRIORITY_PATHS: &[FieldPath] = &[
    &["user_priorities"],
    &["priorities"],
    &["data", "priorities"],
    &["decision_canvas", "priorities"],
];
const BIAS_PATHS: &[FieldPath] = &[&["biases"], &["data", "biases"], &["cognitive_biases"]];
const RECOMMENDATION_PATHS: &[FieldPath] = &[
    &["framing"],
    &["neutral_framing"],
    &["recommendation"],
    &["summary"],
    &["text"],
    &[],
];

/// Converts one accepted payload into the record shown at `stage`. `None`
/// (or an empty record) is the signal to fall back; this never fails.
pub fn normalize_record(stage: Stage, payload: &AgentPayload<'_>) -> Option<StageRecord> {
    match stage {
        Stage::Clarify => normalize_decision_statement(payload).map(StageRecord::Decision),
        Stage::Explore => normalize_questions(payload).map(StageRecord::Questions),
        Stage::Compare => normalize_canvas(payload).map(StageRecord::Canvas),
        Stage::Reflect => normalize_biases(payload).map(StageRecord::Biases),
        Stage::Decide => normalize_recommendation(payload).map(StageRecord::Recommendation),
    }
}

pub fn normalize_decision_statement(payload: &AgentPayload<'_>) -> Option<String> {
    let root = resolve_result(payload)?;
    first_text(&root, DECISION_PATHS)
}

pub fn normalize_questions(payload: &AgentPayload<'_>) -> Option<Vec<Question>> {
    let root = resolve_result(payload)?;
    first_coerced_array(&root, QUESTION_PATHS, coerce_question)
}

pub fn normalize_canvas(payload: &AgentPayload<'_>) -> Option<DecisionCanvas> {
    let root = resolve_result(payload)?;
    let canvas = DecisionCanvas {
        options: first_coerced_array(&root, OPTION_PATHS, coerce_option).unwrap_or_default(),
        priorities: first_coerced_array(&root, PRIORITY_PATHS, coerce_priority)
            .unwrap_or_default(),
    };
    if canvas.options.is_empty() && canvas.priorities.is_empty() {
        return None;
    }
    Some(canvas)
}

pub fn normalize_biases(payload: &AgentPayload<'_>) -> Option<Vec<Bias>> {
    let root = resolve_result(payload)?;
    first_coerced_array(&root, BIAS_PATHS, coerce_bias)
}

/// Recommendation text from the result, then the response message.
pub fn normalize_recommendation(payload: &AgentPayload<'_>) -> Option<String> {
    resolve_result(payload)
        .and_then(|root| first_text(&root, RECOMMENDATION_PATHS))
        .or_else(|| {
            payload
                .message
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
}

fn coerce_question(item: &Value) -> Option<Question> {
    if let Some(text) = non_empty_text(item) {
        return Some(Question::new(text));
    }
    let text = text_field(item, &["question", "text", "prompt"])?;
    let choices = ["options", "choices"]
        .iter()
        .map(|key| string_list(item.get(*key)))
        .find(|choices| !choices.is_empty())
        .unwrap_or_default();
    Some(Question::new(text).with_choices(choices))
}

fn coerce_option(item: &Value) -> Option<DecisionOption> {
    if let Some(name) = non_empty_text(item) {
        return Some(DecisionOption {
            name,
            pros: Vec::new(),
            cons: Vec::new(),
        });
    }
    let name = text_field(item, &["name", "option", "title"])?;
    Some(DecisionOption {
        name,
        pros: string_list(item.get("pros")),
        cons: string_list(item.get("cons")),
    })
}

fn coerce_priority(item: &Value) -> Option<Priority> {
    if let Some(name) = non_empty_text(item) {
        return Some(Priority {
            name,
            importance: Importance::Low,
        });
    }
    let name = text_field(item, &["name", "priority", "label"])?;
    let importance = ["importance", "weight", "level"]
        .iter()
        .find_map(|key| item.get(*key));
    Some(Priority {
        name,
        importance: Importance::from_value(importance),
    })
}

fn coerce_bias(item: &Value) -> Option<Bias> {
    if !item.is_object() {
        return non_empty_text(item).map(|name| Bias::new(name, ""));
    }
    let name = text_field(item, &["name", "bias"]).unwrap_or_else(|| "Cognitive Bias".to_string());
    let explanation =
        text_field(item, &["explanation", "description", "applies_to"]).unwrap_or_default();
    Some(Bias { name, explanation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bias_objects_without_fields_get_generic_name() {
        let result = json!({"biases": [{}, {"bias": "Anchoring", "applies_to": "salary"}]});
        let biases = normalize_biases(&AgentPayload::from_result(&result)).expect("biases");
        assert_eq!(biases[0], Bias::new("Cognitive Bias", ""));
        assert_eq!(biases[1], Bias::new("Anchoring", "salary"));
    }

    #[test]
    fn priority_weight_synonyms_are_read() {
        let result = json!({"priorities": [{"label": "Pay", "weight": "high"}]});
        let canvas = normalize_canvas(&AgentPayload::from_result(&result)).expect("canvas");
        assert!(canvas.options.is_empty());
        assert_eq!(canvas.priorities[0].importance, Importance::High);
    }
}
