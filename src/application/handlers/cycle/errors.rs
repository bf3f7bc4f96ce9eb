//! Cycle handler errors.

use thiserror::Error;

use crate::application::handlers::feedback::FeedbackError;
use crate::domain::foundation::{CycleId, DomainError, SkillId, ValidationError};

/// Errors raised by cycle commands and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing, or owned by someone else.
    #[error("Learning cycle not found: {0}")]
    NotFound(CycleId),

    /// The referenced skill is missing or owned by someone else.
    #[error("Skill not found: {0}")]
    SkillNotFound(SkillId),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error("{0}")]
    Infrastructure(String),
}

impl CycleError {
    pub fn not_found(id: CycleId) -> Self {
        CycleError::NotFound(id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CycleError::Infrastructure(message.into())
    }
}

impl From<DomainError> for CycleError {
    fn from(err: DomainError) -> Self {
        CycleError::Infrastructure(err.to_string())
    }
}
