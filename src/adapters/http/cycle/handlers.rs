//! HTTP handlers for learning cycle endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::feedback::FeedbackResponse;
use crate::adapters::http::middleware::{RequestId, RequireUser};
use crate::application::handlers::{
    AnalyzeCycleCommand, AnalyzeCycleHandler, CreateCycleCommand, CreateCycleHandler,
    GetCycleHandler, GetCycleQuery, ListCyclesHandler, ListCyclesQuery, UpdateCycleCommand,
    UpdateCycleHandler,
};
use crate::domain::foundation::CycleId;

use super::dto::{CycleRequest, CycleResponse, ListCyclesParams};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CycleHandlers {
    create_handler: Arc<CreateCycleHandler>,
    update_handler: Arc<UpdateCycleHandler>,
    get_handler: Arc<GetCycleHandler>,
    list_handler: Arc<ListCyclesHandler>,
    analyze_handler: Arc<AnalyzeCycleHandler>,
}

impl CycleHandlers {
    pub fn new(
        create_handler: Arc<CreateCycleHandler>,
        update_handler: Arc<UpdateCycleHandler>,
        get_handler: Arc<GetCycleHandler>,
        list_handler: Arc<ListCyclesHandler>,
        analyze_handler: Arc<AnalyzeCycleHandler>,
    ) -> Self {
        Self {
            create_handler,
            update_handler,
            get_handler,
            list_handler,
            analyze_handler,
        }
    }
}

fn parse_cycle_id(raw: &str) -> Result<CycleId, ApiError> {
    raw.parse::<CycleId>()
        .map_err(|_| ApiError::bad_request("Invalid cycle ID"))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/cycles - List the caller's cycles, newest first
pub async fn list_cycles(
    State(handlers): State<CycleHandlers>,
    RequireUser(user): RequireUser,
    Query(params): Query<ListCyclesParams>,
) -> Result<Json<Vec<CycleResponse>>, ApiError> {
    let query = ListCyclesQuery {
        skill_id: params.skill_id()?,
        ..ListCyclesQuery::for_user(user.id().clone())
    };

    let cycles = handlers.list_handler.handle(query).await?;
    Ok(Json(cycles.iter().map(CycleResponse::from).collect()))
}

/// POST /api/cycles - Create a learning cycle
pub async fn create_cycle(
    State(handlers): State<CycleHandlers>,
    RequireUser(user): RequireUser,
    request_id: RequestId,
    body: Result<Json<CycleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let cmd = CreateCycleCommand {
        skill_id: req.skill_id()?,
        draft: req.draft,
    };

    let view = handlers
        .create_handler
        .handle(cmd, request_id.metadata(user.id().clone()))
        .await?;
    Ok((StatusCode::CREATED, Json(CycleResponse::from(&view))).into_response())
}

/// GET /api/cycles/:id - Get one of the caller's cycles
pub async fn get_cycle(
    State(handlers): State<CycleHandlers>,
    RequireUser(user): RequireUser,
    Path(cycle_id): Path<String>,
) -> Result<Json<CycleResponse>, ApiError> {
    let query = GetCycleQuery {
        cycle_id: parse_cycle_id(&cycle_id)?,
        user_id: user.id().clone(),
    };

    let view = handlers.get_handler.handle(query).await?;
    Ok(Json(CycleResponse::from(&view)))
}

/// PUT /api/cycles/:id - Replace a cycle's content
pub async fn update_cycle(
    State(handlers): State<CycleHandlers>,
    RequireUser(user): RequireUser,
    request_id: RequestId,
    Path(cycle_id): Path<String>,
    body: Result<Json<CycleRequest>, JsonRejection>,
) -> Result<Json<CycleResponse>, ApiError> {
    let cycle_id = parse_cycle_id(&cycle_id)?;
    let Json(req) = body?;
    let cmd = UpdateCycleCommand {
        cycle_id,
        skill_id: req.skill_id()?,
        draft: req.draft,
    };

    let view = handlers
        .update_handler
        .handle(cmd, request_id.metadata(user.id().clone()))
        .await?;
    Ok(Json(CycleResponse::from(&view)))
}

/// POST /api/cycles/:id/feedback - Generate and cache feedback for a stored cycle
pub async fn analyze_cycle(
    State(handlers): State<CycleHandlers>,
    RequireUser(user): RequireUser,
    request_id: RequestId,
    Path(cycle_id): Path<String>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let cmd = AnalyzeCycleCommand {
        cycle_id: parse_cycle_id(&cycle_id)?,
    };

    let feedback = handlers
        .analyze_handler
        .handle(cmd, request_id.metadata(user.id().clone()))
        .await?;
    Ok(Json(FeedbackResponse { feedback }))
}
