//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the learning-cycle domain.

mod auth;
mod command;
mod errors;
mod ids;
mod rating;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CycleId, SkillId, UserId};
pub use rating::{Rating, StarBreakdown};
pub use timestamp::Timestamp;
