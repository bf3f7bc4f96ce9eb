//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own module with DTOs, handlers and routes;
//! `router` assembles them behind the shared middleware stack.

pub mod cycle;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod middleware;
pub mod router;
pub mod skill;
pub mod webhook;

pub use error::{ApiError, ErrorBody, FEEDBACK_FAILURE_MESSAGE};
pub use router::{api_router, ApiDependencies, ApiState};
