use crate::gateway::GatewayError;
use crate::workflow::Stage;

pub const GATEWAY_RETRY_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("decision text must be non-empty")]
    EmptyDecision,
    #[error("questions {unanswered:?} are unanswered")]
    UnansweredQuestions { unanswered: Vec<usize> },
    #[error("current question is unanswered")]
    CurrentQuestionUnanswered,
    #[error("answer index {index} is out of range for {len} questions")]
    AnswerIndexOutOfRange { index: usize, len: usize },
    #[error("stage {stage} is waiting on an agent call")]
    Busy { stage: Stage },
    #[error("action `{action}` is not available in stage {stage}")]
    InvalidAction { stage: Stage, action: &'static str },
    #[error("agent call failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl WorkflowError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyDecision
                | Self::UnansweredQuestions { .. }
                | Self::CurrentQuestionUnanswered
                | Self::AnswerIndexOutOfRange { .. }
        )
    }

    /// Whether the error is shown inline. Busy and invalid actions are ignored.
    pub fn is_reported(&self) -> bool {
        self.is_validation() || matches!(self, Self::Gateway(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyDecision => "Please enter your decision or dilemma".to_string(),
            Self::UnansweredQuestions { .. } => {
                "Please answer all questions before continuing".to_string()
            }
            Self::CurrentQuestionUnanswered => {
                "Please answer this question before moving on".to_string()
            }
            Self::Gateway(_) => GATEWAY_RETRY_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
