//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completion providers (OpenAI, mock)
//! - `auth` - Bearer token validation (JWKS, mock)
//! - `http` - axum REST API
//! - `memory` - In-memory repositories for tests and local development
//! - `postgres` - PostgreSQL repositories
//! - `webhook` - Identity-provider webhook verification and parsing

pub mod ai;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod webhook;
