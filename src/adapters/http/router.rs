//! Top-level API router.
//!
//! Assembles every endpoint module behind the shared middleware stack:
//! request ids, tracing, CORS and a request timeout. Bearer-token auth wraps
//! the `/api` resources; health and webhooks sit outside it.

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use http::{header, HeaderValue, Method};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::webhook::SvixVerifier;
use crate::application::handlers::{
    AnalyzeCycleHandler, CreateCycleHandler, CreateSkillHandler, GenerateFeedbackHandler,
    GetCycleHandler, GetDashboardHandler, ListCyclesHandler, ListSkillsHandler,
    SyncIdentityHandler, UpdateCycleHandler,
};
use crate::config::ServerConfig;
use crate::ports::{CycleRepository, SessionValidator, SkillRepository, UserRepository};

use super::cycle::{cycle_routes, CycleHandlers};
use super::dashboard::{dashboard_routes, DashboardHandlers};
use super::feedback::{feedback_routes, FeedbackHandlers};
use super::middleware::{auth_middleware, AuthState};
use super::skill::{skill_routes, SkillHandlers};
use super::webhook::{webhook_routes, WebhookHandlers};

/// Service handles the API is built from, constructed once at startup.
#[derive(Clone)]
pub struct ApiDependencies {
    pub users: Arc<dyn UserRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub cycles: Arc<dyn CycleRepository>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub feedback: Arc<GenerateFeedbackHandler>,
    pub webhook_verifier: Option<Arc<SvixVerifier>>,
}

/// Per-module handler state.
#[derive(Clone)]
pub struct ApiState {
    pub auth: AuthState,
    pub feedback: FeedbackHandlers,
    pub cycles: CycleHandlers,
    pub skills: SkillHandlers,
    pub dashboard: DashboardHandlers,
    pub webhooks: WebhookHandlers,
}

impl ApiState {
    pub fn new(deps: ApiDependencies) -> Self {
        let ApiDependencies {
            users,
            skills,
            cycles,
            session_validator,
            feedback,
            webhook_verifier,
        } = deps;

        let cycle_handlers = CycleHandlers::new(
            Arc::new(CreateCycleHandler::new(cycles.clone(), skills.clone())),
            Arc::new(UpdateCycleHandler::new(cycles.clone(), skills.clone())),
            Arc::new(GetCycleHandler::new(cycles.clone(), skills.clone())),
            Arc::new(ListCyclesHandler::new(cycles.clone(), skills.clone())),
            Arc::new(AnalyzeCycleHandler::new(
                cycles.clone(),
                skills.clone(),
                feedback.clone(),
            )),
        );

        Self {
            auth: AuthState::new(session_validator, users.clone()),
            feedback: FeedbackHandlers::new(feedback),
            cycles: cycle_handlers,
            skills: SkillHandlers::new(
                Arc::new(CreateSkillHandler::new(skills.clone())),
                Arc::new(ListSkillsHandler::new(skills.clone())),
            ),
            dashboard: DashboardHandlers::new(Arc::new(GetDashboardHandler::new(
                users.clone(),
                skills,
                cycles,
            ))),
            webhooks: WebhookHandlers::new(
                webhook_verifier,
                Arc::new(SyncIdentityHandler::new(users)),
            ),
        }
    }
}

/// GET /health - Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Builds the full application router.
pub fn api_router(state: ApiState, server: &ServerConfig) -> Router {
    let protected = Router::new()
        .nest("/api/feedback", feedback_routes(state.feedback))
        .nest("/api/cycles", cycle_routes(state.cycles))
        .nest("/api/skills", skill_routes(state.skills))
        .nest("/api/dashboard", dashboard_routes(state.dashboard))
        .layer(middleware::from_fn_with_state(state.auth, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .nest("/api/webhooks", webhook_routes(state.webhooks))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(server))
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
}
