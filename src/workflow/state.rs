use super::{
    stage_indicators, Bias, DecisionOption, Priority, QuestionNavigator, Stage, StageIndicator,
};
use crate::config::{AgentRole, WorkflowSettings};
use std::time::{Duration, Instant};

/// The agent call a stage is waiting on. Only one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub ticket: u64,
    pub stage: Stage,
    pub role: AgentRole,
    pub prompt: String,
    pub started_at: Instant,
}

/// Everything one workflow run owns. Mutated only through
/// [`super::transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub(crate) stage: Stage,
    pub(crate) decision_input: String,
    pub(crate) decision_statement: String,
    pub(crate) navigator: QuestionNavigator,
    pub(crate) options: Vec<DecisionOption>,
    pub(crate) priorities: Vec<Priority>,
    pub(crate) biases: Vec<Bias>,
    pub(crate) recommendation: String,
    pub(crate) error: Option<String>,
    pub(crate) pending: Option<PendingCall>,
    pub(crate) next_ticket: u64,
    pub(crate) auto_advance_delay: Duration,
    pub(crate) still_working_after: Duration,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(&WorkflowSettings::default())
    }
}

impl WorkflowState {
    pub fn new(settings: &WorkflowSettings) -> Self {
        Self {
            stage: Stage::Clarify,
            decision_input: String::new(),
            decision_statement: String::new(),
            navigator: QuestionNavigator::default(),
            options: Vec::new(),
            priorities: Vec::new(),
            biases: Vec::new(),
            recommendation: String::new(),
            error: None,
            pending: None,
            next_ticket: 1,
            auto_advance_delay: settings.auto_advance_delay(),
            still_working_after: settings.still_working_after(),
        }
    }

    /// Fresh run that keeps timing settings and the ticket counter, so a
    /// resolution for a call issued before the reset is recognised as stale.
    pub(crate) fn reset(&self) -> Self {
        Self {
            next_ticket: self.next_ticket,
            auto_advance_delay: self.auto_advance_delay,
            still_working_after: self.still_working_after,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn decision_input(&self) -> &str {
        &self.decision_input
    }

    pub fn decision_statement(&self) -> &str {
        &self.decision_statement
    }

    pub fn navigator(&self) -> &QuestionNavigator {
        &self.navigator
    }

    pub fn options(&self) -> &[DecisionOption] {
        &self.options
    }

    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    pub fn biases(&self) -> &[Bias] {
        &self.biases
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_call(&self) -> Option<&PendingCall> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// True once the pending call has been outstanding longer than the
    /// configured threshold.
    pub fn is_still_working(&self, now: Instant) -> bool {
        self.pending.as_ref().is_some_and(|pending| {
            now.saturating_duration_since(pending.started_at) >= self.still_working_after
        })
    }

    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }

    pub fn stage_indicators(&self) -> Vec<StageIndicator> {
        stage_indicators(self.stage)
    }
}
