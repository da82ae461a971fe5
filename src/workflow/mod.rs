//! The five-stage decision workflow: records, normalization, fallback
//! defaults, question navigation and the transition function that ties them
//! together.

pub mod controller;
pub mod error;
pub mod fallback;
pub mod navigation;
pub mod normalize;
pub mod prompt_render;
pub mod records;
pub mod stage;
pub mod state;
pub mod transitions;

pub use controller::WorkflowController;
pub use error::{WorkflowError, GATEWAY_RETRY_MESSAGE};
pub use fallback::{fallback_record, FallbackContext, FALLBACK_QUESTIONS};
pub use navigation::{DeferredAdvance, ProgressMark, QuestionNavigator};
pub use normalize::normalize_record;
pub use records::{
    Bias, DecisionCanvas, DecisionOption, Importance, Priority, Question, StageRecord,
};
pub use stage::{stage_indicators, Stage, StageIndicator, StageStatus, ALL_STAGES};
pub use state::{PendingCall, WorkflowState};
pub use transitions::{
    transition, AgentCall, TransitionOutcome, WorkflowAction, WorkflowTransition,
};
