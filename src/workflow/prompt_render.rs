use super::{DecisionOption, Priority, Question};

pub fn render_clarify_prompt(decision_input: &str) -> String {
    format!("Help me clarify this decision: {}", decision_input.trim())
}

pub fn render_canvas_prompt(decision: &str, questions: &[Question]) -> String {
    format!(
        "Based on the decision: \"{decision}\"\n\nUser's answers:\n{}\n\nPlease build a decision canvas with options, pros, cons, and priorities.",
        render_answers(questions)
    )
}

pub fn render_bias_prompt(
    decision: &str,
    questions: &[Question],
    options: &[DecisionOption],
) -> String {
    let options = options
        .iter()
        .map(|option| format!("- {}", option.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Decision: \"{decision}\"\n\nUser's answers:\n{}\n\nOptions being considered:\n{options}\n\nPlease identify cognitive biases that might be affecting this decision.",
        render_answers(questions)
    )
}

pub fn render_recommendation_prompt(
    decision: &str,
    options: &[DecisionOption],
    priorities: &[Priority],
) -> String {
    let priorities = priorities
        .iter()
        .map(|priority| {
            format!(
                "{} (Importance: {})",
                priority.name,
                priority.importance.level()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let options = options
        .iter()
        .map(|option| {
            format!(
                "{}: Pros - {}; Cons - {}",
                option.name,
                option.pros.join(", "),
                option.cons.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Decision: \"{decision}\"\n\nUser priorities: {priorities}\n\nOptions:\n{options}\n\n\
Based on the user's stated priorities and the pros/cons of each option, provide a clear, context-aware recommendation. \
Which option is more beneficial given their priorities? What specific actions should they take from here? \
Be direct and actionable."
    )
}

/// `Qn: text` / `An: answer` pairs, one blank line apart, numbered from 1.
pub fn render_answers(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            format!(
                "Q{n}: {}\nA{n}: {}",
                question.text,
                question.answer.trim(),
                n = index + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
