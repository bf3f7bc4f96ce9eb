//! HTTP adapter for AI feedback on draft learning cycles.

mod dto;
mod handlers;
mod routes;

pub use dto::{FeedbackRequestBody, FeedbackResponse, SkillRef};
pub use handlers::FeedbackHandlers;
pub use routes::feedback_routes;
