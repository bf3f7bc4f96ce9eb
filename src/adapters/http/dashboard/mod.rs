//! HTTP adapter for the dashboard endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{DashboardResponse, DashboardUser};
pub use handlers::DashboardHandlers;
pub use routes::dashboard_routes;
