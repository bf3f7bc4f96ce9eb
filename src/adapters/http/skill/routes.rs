//! HTTP routes for skill endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_skill, list_skills, SkillHandlers};

/// Creates the skill router, mounted at `/api/skills`.
pub fn skill_routes(handlers: SkillHandlers) -> Router {
    Router::new()
        .route("/", get(list_skills).post(create_skill))
        .with_state(handlers)
}
