//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects the caller into extensions
//! - `RequireAuth` - Extractor that requires a valid token
//! - `RequireUser` - Extractor that requires a valid token and a local user record
//!
//! # Architecture
//!
//! The middleware uses the `SessionValidator` port, keeping it provider-agnostic.
//! A caller only counts as signed in once the identity webhook (or a dashboard
//! visit) has created their local user record, so the middleware also resolves
//! that record through the `UserRepository` port.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser (+ UserProfile when stored)
//!                                      ↓
//!                  Handler → RequireUser / RequireAuth read from extensions
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::domain::user::UserProfile;
use crate::ports::{SessionValidator, UserRepository};

/// Auth middleware state.
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn SessionValidator>,
    users: Arc<dyn UserRepository>,
}

impl AuthState {
    pub fn new(validator: Arc<dyn SessionValidator>, users: Arc<dyn UserRepository>) -> Self {
        Self { validator, users }
    }
}

/// Authentication middleware that validates Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions, plus the
///    caller's `UserProfile` when a local record exists
/// 4. On missing token, continues without injecting (extractors reject later)
/// 5. On invalid token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return next.run(request).await;
    };

    let user = match auth.validator.validate(token).await {
        Ok(user) => user,
        Err(e) => {
            let (status, message) = match &e {
                AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!("Auth service unavailable: {}", msg);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Authentication service unavailable",
                    )
                }
            };
            return auth_error(status, message);
        }
    };

    match auth.users.find_by_id(&user.id).await {
        Ok(Some(profile)) => {
            request.extensions_mut().insert(profile);
        }
        Ok(None) => {
            tracing::debug!(user_id = %user.id, "No local user record for caller");
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Failed to load local user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "code": "INTERNAL_ERROR"
                })),
            )
                .into_response();
        }
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn auth_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message,
            "code": "AUTH_ERROR"
        })),
    )
        .into_response()
}

/// Extractor that requires a validated token.
///
/// Used by the dashboard, which provisions the local record itself.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor that requires a validated token and a local user record.
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserProfile);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if parts.extensions.get::<AuthenticatedUser>().is_none() {
            return Err(AuthRejection::Unauthenticated);
        }
        parts
            .extensions
            .get::<UserProfile>()
            .cloned()
            .map(RequireUser)
            .ok_or(AuthRejection::UnknownUser)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
    /// The token is valid but no local user record exists yet.
    UnknownUser,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::Unauthenticated => "Unauthorized, please sign in",
            AuthRejection::UnknownUser => "User not found, please sign in again",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
