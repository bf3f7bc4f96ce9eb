//! Feedback generation errors.

use thiserror::Error;

use crate::domain::feedback::FeedbackParseError;
use crate::domain::foundation::ValidationError;
use crate::ports::AIError;

/// Why feedback could not be produced.
///
/// `Clone` so one outcome can be handed to every coalesced caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedbackError {
    /// A required cycle field is missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// AI feedback is turned off in configuration.
    #[error("AI feedback is disabled")]
    Disabled,

    /// The model call failed.
    #[error("model call failed: {0}")]
    Upstream(#[from] AIError),

    /// The model replied with something that is not a feedback object.
    #[error("model reply could not be parsed: {0}")]
    Parse(#[from] FeedbackParseError),
}

impl FeedbackError {
    /// True for failures the caller cannot fix by changing the request.
    pub fn is_server_side(&self) -> bool {
        matches!(self, FeedbackError::Upstream(_) | FeedbackError::Parse(_))
    }
}
