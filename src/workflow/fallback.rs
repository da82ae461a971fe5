use super::{Bias, DecisionCanvas, DecisionOption, Priority, Question, Stage, StageRecord};

pub const FALLBACK_QUESTIONS: [&str; 2] = [
    "What matters most to you here?",
    "What worries you most about the other option?",
];

const VALUE_CHOICES: [&str; 5] = ["Rest", "Money", "Growth", "Stability", "Peace of mind"];
const WORRY_CHOICES: [&str; 5] = [
    "I might fail",
    "I might miss out",
    "I might regret it",
    "I might lose time",
    "I might lose money",
];

/// Prior canonical state the defaults may refer to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackContext<'a> {
    pub raw_decision: &'a str,
    pub options: &'a [DecisionOption],
    pub priorities: &'a [Priority],
}

pub fn fallback_questions() -> Vec<Question> {
    vec![
        Question::new(FALLBACK_QUESTIONS[0]).with_choices(VALUE_CHOICES),
        Question::new(FALLBACK_QUESTIONS[1]).with_choices(WORRY_CHOICES),
    ]
}

pub fn fallback_options() -> Vec<DecisionOption> {
    vec![
        DecisionOption::new(
            "Option A",
            [
                "Potential for growth",
                "New opportunities",
                "Fresh perspective",
            ],
            ["Uncertainty", "Risk of change", "Learning curve"],
        ),
        DecisionOption::new(
            "Option B",
            ["Familiarity", "Stability", "Proven track record"],
            ["Limited growth", "Potential stagnation", "Comfort zone"],
        ),
    ]
}

pub fn fallback_priorities() -> Vec<Priority> {
    vec![
        Priority::new("Long-term success", 3),
        Priority::new("Risk management", 2),
        Priority::new("Personal satisfaction", 3),
    ]
}

pub fn fallback_biases() -> Vec<Bias> {
    vec![
        Bias::new(
            "Status Quo Bias",
            "You might be favoring the current situation simply because it's familiar, even if change could be beneficial.",
        ),
        Bias::new(
            "Loss Aversion",
            "You may be overweighting potential losses compared to equivalent gains, making risky options seem worse than they are.",
        ),
    ]
}

/// Templated recommendation naming the first option and the highest
/// priorities, whichever are available.
pub fn fallback_recommendation(options: &[DecisionOption], priorities: &[Priority]) -> String {
    let choice = options
        .first()
        .map(|option| option.name.as_str())
        .unwrap_or("the option that best fits your priorities");

    let top = priorities
        .iter()
        .map(|priority| priority.importance)
        .max()
        .map(|highest| {
            priorities
                .iter()
                .filter(|priority| priority.importance == highest)
                .map(|priority| priority.name.to_lowercase())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let focus = if top.is_empty() {
        "what matters most to you".to_string()
    } else {
        top.join(" and ")
    };

    format!(
        "RECOMMENDATION: {choice}\n\nBased on your priorities, especially {focus}, {choice} aligns better with where you want to be in the next 6 to 12 months, even though it involves short-term uncertainty.\n\n\
Next step: Take one small concrete action toward {choice} within the next 48 hours."
    )
}

/// Default record for the stage being entered. `Clarify` yields the raw
/// decision text as the statement.
pub fn fallback_record(stage: Stage, context: FallbackContext<'_>) -> StageRecord {
    match stage {
        Stage::Clarify => StageRecord::Decision(context.raw_decision.trim().to_string()),
        Stage::Explore => StageRecord::Questions(fallback_questions()),
        Stage::Compare => StageRecord::Canvas(DecisionCanvas {
            options: fallback_options(),
            priorities: fallback_priorities(),
        }),
        Stage::Reflect => StageRecord::Biases(fallback_biases()),
        Stage::Decide => StageRecord::Recommendation(fallback_recommendation(
            context.options,
            context.priorities,
        )),
    }
}

/// Fills the parts of a normalized record that came back empty. A canvas
/// falls back per half, so agent options can sit next to default priorities.
pub fn complete_record(
    stage: Stage,
    record: Option<StageRecord>,
    context: FallbackContext<'_>,
) -> (StageRecord, bool) {
    match record {
        Some(StageRecord::Canvas(mut canvas))
            if !canvas.options.is_empty() || !canvas.priorities.is_empty() =>
        {
            let mut used_fallback = false;
            if canvas.options.is_empty() {
                canvas.options = fallback_options();
                used_fallback = true;
            }
            if canvas.priorities.is_empty() {
                canvas.priorities = fallback_priorities();
                used_fallback = true;
            }
            (StageRecord::Canvas(canvas), used_fallback)
        }
        Some(record) if !record.is_empty() => (record, false),
        _ => (fallback_record(stage, context), true),
    }
}
