//! Skill handler errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Infrastructure(String),
}

impl From<DomainError> for SkillError {
    fn from(err: DomainError) -> Self {
        SkillError::Infrastructure(err.to_string())
    }
}
