//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Authentication middleware and extractors
//! - `request_id` - Correlation id extraction

pub mod auth;
pub mod request_id;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth, RequireUser};
pub use request_id::{RequestId, REQUEST_ID_HEADER};
