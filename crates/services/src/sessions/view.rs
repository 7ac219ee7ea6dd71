use serde::Serialize;

use interview_core::model::{AnswerMap, EndReason, Question, SessionStatus};

use super::progress::SessionProgress;

/// Read-only copy of the engine state handed to the presentation layer.
///
/// Holds no references into the engine, so it can be sent across tasks
/// and kept after the engine moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub bank_key: String,
    pub status: SessionStatus,
    pub current_index: usize,
    pub total: usize,
    pub remaining_secs: u32,
    pub question: Question,
    pub answers: AnswerMap,
    /// Remaining time is at or below the configured warning threshold.
    pub time_warning: bool,
    pub end_reason: Option<EndReason>,
    /// Which question indices have an answer, in question order.
    pub answered: Vec<bool>,
}

impl SessionSnapshot {
    /// Answer recorded for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.answers.get(self.question.id())
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.answered.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.total
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total,
            answered: self.answered.iter().filter(|a| **a).count(),
            position: self.current_index + 1,
            is_complete: self.status.is_terminal(),
        }
    }
}
