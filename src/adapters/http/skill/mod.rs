//! HTTP adapter for skill endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateSkillRequest, SkillResponse};
pub use handlers::SkillHandlers;
pub use routes::skill_routes;
