//! HTTP routes for the feedback endpoint.

use axum::{routing::post, Router};

use super::handlers::{generate_feedback, FeedbackHandlers};

/// Creates the feedback router, mounted at `/api/feedback`.
pub fn feedback_routes(handlers: FeedbackHandlers) -> Router {
    Router::new()
        .route("/", post(generate_feedback))
        .with_state(handlers)
}
