//! Feedback generation handler.

mod errors;
mod generate_feedback;
mod in_flight;

pub use errors::FeedbackError;
pub use generate_feedback::{GenerateFeedbackCommand, GenerateFeedbackHandler};
pub use in_flight::InFlightRequests;
