use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::answers::AnswerMap;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("answered questions ({answered}) exceed total ({total})")]
    CountMismatch { total: usize, answered: usize },
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle state of an interview session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    Complete,
}

impl SessionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Complete)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session reached `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The user moved past the last question.
    Finished,
    /// The countdown ran out on the last question.
    TimeExpired,
    /// The user ended the interview explicitly.
    EndedEarly,
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Handoff record for the results view, produced once a session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    bank_key: String,
    total_questions: usize,
    answered_questions: usize,
    answers: AnswerMap,
    end_reason: EndReason,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    time_spent_secs: u64,
}

impl SessionSummary {
    /// Build a summary for a finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::CountMismatch` if `answered_questions > total_questions`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bank_key: impl Into<String>,
        total_questions: usize,
        answered_questions: usize,
        answers: AnswerMap,
        end_reason: EndReason,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        time_spent_secs: u64,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if answered_questions > total_questions {
            return Err(SessionSummaryError::CountMismatch {
                total: total_questions,
                answered: answered_questions,
            });
        }

        Ok(Self {
            bank_key: bank_key.into(),
            total_questions,
            answered_questions,
            answers,
            end_reason,
            started_at,
            completed_at,
            time_spent_secs,
        })
    }

    #[must_use]
    pub fn bank_key(&self) -> &str {
        &self.bank_key
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn answered_questions(&self) -> usize {
        self.answered_questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn end_reason(&self) -> EndReason {
        self.end_reason
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Seconds of countdown actually consumed while running.
    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::time::fixed_now;

    #[test]
    fn summary_keeps_counts_and_answers() {
        let now = fixed_now();
        let mut answers = AnswerMap::new();
        answers.record(QuestionId::new(3), "x");

        let summary = SessionSummary::new(
            "general",
            3,
            1,
            answers,
            EndReason::EndedEarly,
            now,
            now + chrono::Duration::seconds(121),
            121,
        )
        .unwrap();

        assert_eq!(summary.bank_key(), "general");
        assert_eq!(summary.total_questions(), 3);
        assert_eq!(summary.answered_questions(), 1);
        assert_eq!(summary.answers().get(QuestionId::new(3)), Some("x"));
        assert_eq!(summary.end_reason(), EndReason::EndedEarly);
    }

    #[test]
    fn summary_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = SessionSummary::new(
            "general",
            1,
            0,
            AnswerMap::new(),
            EndReason::Finished,
            now,
            now - chrono::Duration::seconds(1),
            0,
        )
        .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }

    #[test]
    fn summary_rejects_more_answers_than_questions() {
        let now = fixed_now();
        let err = SessionSummary::new(
            "general",
            1,
            2,
            AnswerMap::new(),
            EndReason::Finished,
            now,
            now,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SessionSummaryError::CountMismatch { .. }));
    }

    #[test]
    fn end_reason_serializes_snake_case() {
        let json = serde_json::to_string(&EndReason::TimeExpired).unwrap();
        assert_eq!(json, r#""time_expired""#);
    }
}
