//! HTTP adapter for learning cycle endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CycleRequest, CycleResponse, ListCyclesParams};
pub use handlers::CycleHandlers;
pub use routes::cycle_routes;
