//! HTTP routes for learning cycle endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    analyze_cycle, create_cycle, get_cycle, list_cycles, update_cycle, CycleHandlers,
};

/// Creates the cycle router, mounted at `/api/cycles`.
pub fn cycle_routes(handlers: CycleHandlers) -> Router {
    Router::new()
        .route("/", get(list_cycles).post(create_cycle))
        .route("/:id", get(get_cycle).put(update_cycle))
        .route("/:id/feedback", post(analyze_cycle))
        .with_state(handlers)
}
