//! HTTP handler for the dashboard endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::GetDashboardHandler;

use super::dto::DashboardResponse;

#[derive(Clone)]
pub struct DashboardHandlers {
    get_handler: Arc<GetDashboardHandler>,
}

impl DashboardHandlers {
    pub fn new(get_handler: Arc<GetDashboardHandler>) -> Self {
        Self { get_handler }
    }
}

/// GET /api/dashboard - Recent cycles and counts; provisions the local user if missing
pub async fn get_dashboard(
    State(handlers): State<DashboardHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DashboardResponse>, ApiError> {
    let view = handlers.get_handler.handle(&user).await?;
    Ok(Json(DashboardResponse::from(&view)))
}
