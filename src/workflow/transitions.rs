use super::fallback::{complete_record, FallbackContext};
use super::normalize::normalize_record;
use super::prompt_render::{
    render_bias_prompt, render_canvas_prompt, render_clarify_prompt, render_recommendation_prompt,
};
use super::{PendingCall, QuestionNavigator, Stage, StageRecord, WorkflowError, WorkflowState};
use crate::config::AgentRole;
use crate::gateway::{AgentEnvelope, AgentPayload, GatewayError};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowAction {
    EditDecision(String),
    /// Completes the current stage: validates, then requests its agent call.
    Submit { now: Instant },
    SetAnswer { index: usize, value: String },
    SelectChoice { value: String, now: Instant },
    NextQuestion,
    PreviousQuestion,
    /// Fires a due auto-advance.
    Tick { now: Instant },
    Resolve {
        ticket: u64,
        outcome: Result<AgentEnvelope, GatewayError>,
    },
    Restart,
}

impl WorkflowAction {
    fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::EditDecision(_) => "edit_decision",
            WorkflowAction::Submit { .. } => "submit",
            WorkflowAction::SetAnswer { .. } => "set_answer",
            WorkflowAction::SelectChoice { .. } => "select_choice",
            WorkflowAction::NextQuestion => "next_question",
            WorkflowAction::PreviousQuestion => "previous_question",
            WorkflowAction::Tick { .. } => "tick",
            WorkflowAction::Resolve { .. } => "resolve",
            WorkflowAction::Restart => "restart",
        }
    }
}

/// A request for the driver to call an agent and feed the result back as
/// [`WorkflowAction::Resolve`] with the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCall {
    pub ticket: u64,
    pub stage: Stage,
    pub role: AgentRole,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Updated,
    Unchanged,
    CallRequested(AgentCall),
    Advanced { to: Stage, used_fallback: bool },
    Rejected(WorkflowError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTransition {
    pub state: WorkflowState,
    pub outcome: TransitionOutcome,
}

impl WorkflowTransition {
    fn new(state: WorkflowState, outcome: TransitionOutcome) -> Self {
        Self { state, outcome }
    }

    fn unchanged(state: WorkflowState) -> Self {
        Self::new(state, TransitionOutcome::Unchanged)
    }

    /// Rejection. Reported errors are written to the state's error text.
    fn rejected(mut state: WorkflowState, error: WorkflowError) -> Self {
        if error.is_reported() {
            state.error = Some(error.user_message());
        }
        Self::new(state, TransitionOutcome::Rejected(error))
    }
}

pub fn transition(state: WorkflowState, action: WorkflowAction) -> WorkflowTransition {
    if let WorkflowAction::Restart = action {
        return WorkflowTransition::new(state.reset(), TransitionOutcome::Updated);
    }
    if let WorkflowAction::Resolve { ticket, outcome } = action {
        return resolve(state, ticket, outcome);
    }
    if state.is_busy() {
        if let WorkflowAction::Tick { .. } = action {
            return WorkflowTransition::unchanged(state);
        }
        let stage = state.stage;
        return WorkflowTransition::new(
            state,
            TransitionOutcome::Rejected(WorkflowError::Busy { stage }),
        );
    }

    let name = action.as_str();
    match (state.stage, action) {
        (Stage::Clarify, WorkflowAction::EditDecision(text)) => {
            let mut state = state;
            state.decision_input = text;
            WorkflowTransition::new(state, TransitionOutcome::Updated)
        }
        (_, WorkflowAction::Submit { now }) => submit(state, now),
        (Stage::Explore, WorkflowAction::SetAnswer { index, value }) => {
            let mut state = state;
            match state.navigator.set_answer(index, value) {
                Ok(()) => WorkflowTransition::new(state, TransitionOutcome::Updated),
                Err(err) => WorkflowTransition::rejected(state, err),
            }
        }
        (Stage::Explore, WorkflowAction::SelectChoice { value, now }) => {
            let mut state = state;
            let delay = state.auto_advance_delay;
            match state.navigator.select_choice(value, now, delay) {
                Ok(_) => WorkflowTransition::new(state, TransitionOutcome::Updated),
                Err(err) => WorkflowTransition::rejected(state, err),
            }
        }
        (Stage::Explore, WorkflowAction::NextQuestion) => {
            let mut state = state;
            if state.navigator.is_last() {
                return WorkflowTransition::unchanged(state);
            }
            if !state.navigator.can_advance() {
                return WorkflowTransition::rejected(
                    state,
                    WorkflowError::CurrentQuestionUnanswered,
                );
            }
            state.navigator.advance();
            state.error = None;
            WorkflowTransition::new(state, TransitionOutcome::Updated)
        }
        (Stage::Explore, WorkflowAction::PreviousQuestion) => {
            let mut state = state;
            if state.navigator.retreat() {
                WorkflowTransition::new(state, TransitionOutcome::Updated)
            } else {
                WorkflowTransition::unchanged(state)
            }
        }
        (Stage::Explore, WorkflowAction::Tick { now }) => {
            let mut state = state;
            if state.navigator.poll(now) {
                WorkflowTransition::new(state, TransitionOutcome::Updated)
            } else {
                WorkflowTransition::unchanged(state)
            }
        }
        (_, WorkflowAction::Tick { .. }) => WorkflowTransition::unchanged(state),
        (stage, _) => WorkflowTransition::new(
            state,
            TransitionOutcome::Rejected(WorkflowError::InvalidAction {
                stage,
                action: name,
            }),
        ),
    }
}

fn submit(mut state: WorkflowState, now: Instant) -> WorkflowTransition {
    let stage = state.stage;
    let prompt = match stage {
        Stage::Clarify => {
            if state.decision_input.trim().is_empty() {
                return WorkflowTransition::rejected(state, WorkflowError::EmptyDecision);
            }
            render_clarify_prompt(&state.decision_input)
        }
        Stage::Explore => {
            if !state.navigator.is_complete() {
                let unanswered = state.navigator.unanswered_indices();
                return WorkflowTransition::rejected(
                    state,
                    WorkflowError::UnansweredQuestions { unanswered },
                );
            }
            state.navigator.cancel_pending();
            render_canvas_prompt(&state.decision_statement, state.navigator.questions())
        }
        Stage::Compare => render_bias_prompt(
            &state.decision_statement,
            state.navigator.questions(),
            &state.options,
        ),
        Stage::Reflect => render_recommendation_prompt(
            &state.decision_statement,
            &state.options,
            &state.priorities,
        ),
        Stage::Decide => {
            return WorkflowTransition::new(
                state,
                TransitionOutcome::Rejected(WorkflowError::InvalidAction {
                    stage,
                    action: "submit",
                }),
            );
        }
    };
    let Some(role) = stage.agent_role() else {
        return WorkflowTransition::unchanged(state);
    };

    let ticket = state.next_ticket;
    state.next_ticket += 1;
    state.error = None;
    state.pending = Some(PendingCall {
        ticket,
        stage,
        role,
        prompt: prompt.clone(),
        started_at: now,
    });
    WorkflowTransition::new(
        state,
        TransitionOutcome::CallRequested(AgentCall {
            ticket,
            stage,
            role,
            prompt,
        }),
    )
}

fn resolve(
    mut state: WorkflowState,
    ticket: u64,
    outcome: Result<AgentEnvelope, GatewayError>,
) -> WorkflowTransition {
    if state.pending.as_ref().map(|pending| pending.ticket) != Some(ticket) {
        return WorkflowTransition::unchanged(state);
    }
    let Some(pending) = state.pending.take() else {
        return WorkflowTransition::unchanged(state);
    };
    let envelope = match outcome {
        Ok(envelope) => envelope,
        Err(err) => return WorkflowTransition::rejected(state, WorkflowError::Gateway(err)),
    };
    let Some(target) = pending.stage.next() else {
        return WorkflowTransition::unchanged(state);
    };

    // Rejected envelopes carry nothing usable and take the fallback path.
    let payload = envelope
        .accepted(pending.role.as_str())
        .unwrap_or_else(|_| AgentPayload::empty());

    // Leaving Clarify also commits the decision statement.
    if pending.stage == Stage::Clarify {
        let (statement, _) = complete_record(
            Stage::Clarify,
            normalize_record(Stage::Clarify, &payload),
            fallback_context(&state),
        );
        commit(&mut state, statement);
    }
    let (record, used_fallback) = complete_record(
        target,
        normalize_record(target, &payload),
        fallback_context(&state),
    );
    commit(&mut state, record);
    state.stage = target;
    state.error = None;
    WorkflowTransition::new(
        state,
        TransitionOutcome::Advanced {
            to: target,
            used_fallback,
        },
    )
}

fn fallback_context(state: &WorkflowState) -> FallbackContext<'_> {
    FallbackContext {
        raw_decision: &state.decision_input,
        options: &state.options,
        priorities: &state.priorities,
    }
}

fn commit(state: &mut WorkflowState, record: StageRecord) {
    match record {
        StageRecord::Decision(statement) => state.decision_statement = statement,
        StageRecord::Questions(questions) => {
            state.navigator = QuestionNavigator::new(questions);
        }
        StageRecord::Canvas(canvas) => {
            state.options = canvas.options;
            state.priorities = canvas.priorities;
        }
        StageRecord::Biases(biases) => state.biases = biases,
        StageRecord::Recommendation(text) => state.recommendation = text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_state_rejects_mutations_but_accepts_restart() {
        let mut state = WorkflowState::default();
        state.decision_input = "Move cities?".to_string();
        let now = Instant::now();
        let submitted = transition(state, WorkflowAction::Submit { now });
        assert!(matches!(
            submitted.outcome,
            TransitionOutcome::CallRequested(_)
        ));

        let edited = transition(
            submitted.state,
            WorkflowAction::EditDecision("changed".to_string()),
        );
        assert_eq!(
            edited.outcome,
            TransitionOutcome::Rejected(WorkflowError::Busy {
                stage: Stage::Clarify
            })
        );
        assert_eq!(edited.state.decision_input(), "Move cities?");

        let restarted = transition(edited.state, WorkflowAction::Restart);
        assert!(!restarted.state.is_busy());
        assert_eq!(restarted.state.next_ticket, 2);
    }

    #[test]
    fn tick_while_busy_is_unchanged() {
        let mut state = WorkflowState::default();
        state.decision_input = "Move cities?".to_string();
        let now = Instant::now();
        let submitted = transition(state, WorkflowAction::Submit { now });

        let ticked = transition(submitted.state, WorkflowAction::Tick { now });
        assert_eq!(ticked.outcome, TransitionOutcome::Unchanged);
        assert!(ticked.state.is_busy());
        assert_eq!(ticked.state.error(), None);
    }
}
