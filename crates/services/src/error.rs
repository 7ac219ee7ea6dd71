//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::SessionSummaryError;

/// Errors emitted by the session engine and session loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("session ended without a summary")]
    MissingSummary,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
