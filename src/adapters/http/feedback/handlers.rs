//! HTTP handler for draft feedback.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{RequestId, RequireUser};
use crate::application::handlers::{GenerateFeedbackCommand, GenerateFeedbackHandler};

use super::dto::{FeedbackRequestBody, FeedbackResponse};

#[derive(Clone)]
pub struct FeedbackHandlers {
    generate_handler: Arc<GenerateFeedbackHandler>,
}

impl FeedbackHandlers {
    pub fn new(generate_handler: Arc<GenerateFeedbackHandler>) -> Self {
        Self { generate_handler }
    }
}

/// POST /api/feedback - Generate feedback for an unsaved cycle
pub async fn generate_feedback(
    State(handlers): State<FeedbackHandlers>,
    RequireUser(user): RequireUser,
    request_id: RequestId,
    body: Result<Json<FeedbackRequestBody>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(body) = body?;
    let cmd = GenerateFeedbackCommand {
        skill_name: body.skill_name(),
        draft: body.draft,
    };
    let metadata = request_id.metadata(user.id().clone());

    let feedback = handlers.generate_handler.handle(cmd, metadata).await?;
    Ok(Json(FeedbackResponse { feedback }))
}
