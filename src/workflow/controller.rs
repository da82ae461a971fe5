use super::transitions::{transition, AgentCall, TransitionOutcome, WorkflowAction};
use super::{Stage, WorkflowError, WorkflowState};
use crate::config::{AgentDirectory, Settings};
use crate::gateway::AgentGateway;
use crate::shared::logging::EventLog;
use std::time::Instant;

/// Drives [`transition`] against a gateway. Agent calls run inline, so a
/// call requested by one action is resolved before the next action lands.
pub struct WorkflowController<G> {
    gateway: G,
    agents: AgentDirectory,
    state: WorkflowState,
    log: EventLog,
}

impl<G: AgentGateway> WorkflowController<G> {
    pub fn new(gateway: G, settings: &Settings) -> Self {
        Self {
            gateway,
            agents: settings.agents.clone(),
            state: WorkflowState::new(&settings.workflow),
            log: EventLog::disabled(),
        }
    }

    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Applies `action` and performs any agent call it requests.
    pub fn dispatch(&mut self, action: WorkflowAction) -> TransitionOutcome {
        match self.apply(action) {
            TransitionOutcome::CallRequested(call) => self.perform(call),
            outcome => outcome,
        }
    }

    /// Applies `action` without performing a requested call. The caller
    /// owns the returned [`AgentCall`] and must hand it to [`Self::perform`]
    /// or restart.
    pub fn apply(&mut self, action: WorkflowAction) -> TransitionOutcome {
        let restart = matches!(action, WorkflowAction::Restart);
        let current = std::mem::take(&mut self.state);
        let next = transition(current, action);
        self.state = next.state;

        match &next.outcome {
            TransitionOutcome::Rejected(WorkflowError::Busy { stage }) => {
                self.log.warn(
                    "workflow.busy_rejected",
                    &format!("stage={} reason=agent call in flight", stage.number()),
                );
            }
            TransitionOutcome::CallRequested(call) => {
                self.log.info(
                    "workflow.submit",
                    &format!(
                        "stage={} agent={} ticket={}",
                        call.stage.number(),
                        self.agents.agent_id(call.role),
                        call.ticket
                    ),
                );
            }
            _ if restart => self.log.info("workflow.restart", "stage=1"),
            _ => {}
        }
        next.outcome
    }

    pub fn perform(&mut self, call: AgentCall) -> TransitionOutcome {
        let agent_id = self.agents.agent_id(call.role).to_string();
        let result = self.gateway.call(&call.prompt, &agent_id);
        match &result {
            Err(err) => self.log.warn(
                "workflow.gateway_failed",
                &format!(
                    "stage={} ticket={} error={err}",
                    call.stage.number(),
                    call.ticket
                ),
            ),
            Ok(envelope) => {
                if let Err(err) = envelope.accepted(&agent_id) {
                    self.log.warn(
                        "workflow.gateway_failed",
                        &format!(
                            "stage={} ticket={} error={err} action=fallback",
                            call.stage.number(),
                            call.ticket
                        ),
                    );
                }
            }
        }

        let outcome = self.apply(WorkflowAction::Resolve {
            ticket: call.ticket,
            outcome: result,
        });
        if let TransitionOutcome::Advanced { to, used_fallback } = &outcome {
            if *used_fallback {
                self.log
                    .info("workflow.fallback", &format!("stage={}", to.number()));
            }
            self.log.info(
                "workflow.advance",
                &format!("from={} to={}", call.stage.number(), to.number()),
            );
        }
        outcome
    }

    pub fn edit_decision(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        let outcome = self.dispatch(WorkflowAction::EditDecision(text.into()));
        into_result(outcome, ())
    }

    /// Stage 1: records the decision text and asks the clarifier for questions.
    pub fn submit_decision(
        &mut self,
        text: impl Into<String>,
        now: Instant,
    ) -> Result<Stage, WorkflowError> {
        self.edit_decision(text)?;
        self.complete_stage(now)
    }

    /// Leaves the current stage through its agent call.
    pub fn complete_stage(&mut self, now: Instant) -> Result<Stage, WorkflowError> {
        match self.dispatch(WorkflowAction::Submit { now }) {
            TransitionOutcome::Advanced { to, .. } => Ok(to),
            TransitionOutcome::Rejected(err) => Err(err),
            _ => Ok(self.state.stage()),
        }
    }

    pub fn complete_questions(&mut self, now: Instant) -> Result<Stage, WorkflowError> {
        self.expect_stage(Stage::Explore, "complete_questions")?;
        self.complete_stage(now)
    }

    pub fn proceed_to_bias_check(&mut self, now: Instant) -> Result<Stage, WorkflowError> {
        self.expect_stage(Stage::Compare, "proceed_to_bias_check")?;
        self.complete_stage(now)
    }

    pub fn proceed_to_recommendation(&mut self, now: Instant) -> Result<Stage, WorkflowError> {
        self.expect_stage(Stage::Reflect, "proceed_to_recommendation")?;
        self.complete_stage(now)
    }

    pub fn set_answer(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let outcome = self.dispatch(WorkflowAction::SetAnswer {
            index,
            value: value.into(),
        });
        into_result(outcome, ())
    }

    pub fn select_choice(
        &mut self,
        value: impl Into<String>,
        now: Instant,
    ) -> Result<(), WorkflowError> {
        let outcome = self.dispatch(WorkflowAction::SelectChoice {
            value: value.into(),
            now,
        });
        into_result(outcome, ())
    }

    /// Returns whether the question index moved.
    pub fn next_question(&mut self) -> Result<bool, WorkflowError> {
        let outcome = self.dispatch(WorkflowAction::NextQuestion);
        let moved = outcome == TransitionOutcome::Updated;
        into_result(outcome, moved)
    }

    pub fn previous_question(&mut self) -> Result<bool, WorkflowError> {
        let outcome = self.dispatch(WorkflowAction::PreviousQuestion);
        let moved = outcome == TransitionOutcome::Updated;
        into_result(outcome, moved)
    }

    /// Fires a due auto-advance. Returns whether the question index moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.dispatch(WorkflowAction::Tick { now }) == TransitionOutcome::Updated
    }

    pub fn restart(&mut self) {
        self.dispatch(WorkflowAction::Restart);
    }

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), WorkflowError> {
        let stage = self.state.stage();
        if stage != expected {
            return Err(WorkflowError::InvalidAction { stage, action });
        }
        Ok(())
    }
}

fn into_result<T>(outcome: TransitionOutcome, value: T) -> Result<T, WorkflowError> {
    match outcome {
        TransitionOutcome::Rejected(err) => Err(err),
        _ => Ok(value),
    }
}
