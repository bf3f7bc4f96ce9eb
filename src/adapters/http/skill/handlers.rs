//! HTTP handlers for skill endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{RequestId, RequireUser};
use crate::application::handlers::{
    CreateSkillCommand, CreateSkillHandler, ListSkillsHandler, ListSkillsQuery,
};

use super::dto::{CreateSkillRequest, SkillResponse};

#[derive(Clone)]
pub struct SkillHandlers {
    create_handler: Arc<CreateSkillHandler>,
    list_handler: Arc<ListSkillsHandler>,
}

impl SkillHandlers {
    pub fn new(create_handler: Arc<CreateSkillHandler>, list_handler: Arc<ListSkillsHandler>) -> Self {
        Self {
            create_handler,
            list_handler,
        }
    }
}

/// GET /api/skills - List the caller's skills, by name
pub async fn list_skills(
    State(handlers): State<SkillHandlers>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<SkillResponse>>, ApiError> {
    let query = ListSkillsQuery {
        user_id: user.id().clone(),
    };
    let skills = handlers.list_handler.handle(query).await?;
    Ok(Json(skills.iter().map(SkillResponse::from).collect()))
}

/// POST /api/skills - Create a skill
pub async fn create_skill(
    State(handlers): State<SkillHandlers>,
    RequireUser(user): RequireUser,
    request_id: RequestId,
    body: Result<Json<CreateSkillRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let cmd = CreateSkillCommand {
        name: req.name.unwrap_or_default(),
        description: req.description,
    };
    let metadata = request_id.metadata(user.id().clone());

    let skill = handlers.create_handler.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(SkillResponse::from(&skill))).into_response())
}
