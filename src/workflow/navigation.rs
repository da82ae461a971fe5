use super::{Question, WorkflowError};
use std::time::{Duration, Instant};

/// An auto-advance scheduled by a choice selection. It only fires while the
/// navigator still sits on `from_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAdvance {
    pub from_index: usize,
    pub due_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMark {
    Current,
    Answered,
    Pending,
}

/// Cursor over the clarifying questions. `index` stays inside
/// `[0, len - 1]` (and at 0 for an empty list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionNavigator {
    questions: Vec<Question>,
    index: usize,
    pending: Option<DeferredAdvance>,
}

impl QuestionNavigator {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            index: 0,
            pending: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn pending(&self) -> Option<DeferredAdvance> {
        self.pending
    }

    pub fn set_answer(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(WorkflowError::AnswerIndexOutOfRange { index, len })?;
        question.answer = value.into();
        if index != self.index {
            self.pending = None;
        }
        Ok(())
    }

    /// Answers the current question with `value` and, unless it is the last
    /// one, schedules an advance due at `now + delay`. Replaces any earlier
    /// pending advance.
    pub fn select_choice(
        &mut self,
        value: impl Into<String>,
        now: Instant,
        delay: Duration,
    ) -> Result<Option<DeferredAdvance>, WorkflowError> {
        self.pending = None;
        self.set_answer(self.index, value)?;
        if self.is_last() {
            return Ok(None);
        }
        let scheduled = DeferredAdvance {
            from_index: self.index,
            due_at: now + delay,
        };
        self.pending = Some(scheduled);
        Ok(Some(scheduled))
    }

    /// Moves forward one question. No-op at the last index.
    pub fn advance(&mut self) -> bool {
        self.pending = None;
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Moves back one question. No-op at index 0.
    pub fn retreat(&mut self) -> bool {
        self.pending = None;
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn can_advance(&self) -> bool {
        !self.is_last() && self.current().is_some_and(Question::is_answered)
    }

    pub fn can_retreat(&self) -> bool {
        self.index > 0
    }

    /// Fires the pending advance when due. Returns whether the index moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due_at {
            return false;
        }
        self.pending = None;
        if pending.from_index != self.index {
            return false;
        }
        self.advance()
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// True iff every question carries a non-blank answer.
    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(Question::is_answered)
    }

    pub fn unanswered_indices(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, question)| !question.is_answered())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn progress(&self) -> Vec<ProgressMark> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                if index == self.index {
                    ProgressMark::Current
                } else if question.is_answered() {
                    ProgressMark::Answered
                } else {
                    ProgressMark::Pending
                }
            })
            .collect()
    }

    pub fn position_label(&self) -> Option<String> {
        if self.questions.is_empty() {
            return None;
        }
        Some(format!(
            "Question {} of {}",
            self.index + 1,
            self.questions.len()
        ))
    }
}
