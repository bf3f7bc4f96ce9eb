//! HTTP error responses.
//!
//! Every failed request answers `{ "error": <message>, "code": <CODE> }`.
//! Application errors convert into `ApiError` so handlers can use `?`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::adapters::webhook::WebhookError;
use crate::application::handlers::{CycleError, FeedbackError, SkillError, UserSyncError};
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Message returned for every model or parse failure; the cause stays in the logs.
pub const FEEDBACK_FAILURE_MESSAGE: &str = "Failed to generate feedback";

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// An HTTP error: status plus the JSON body it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn service_unavailable(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
            code: self.code.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::Validation(e) => ApiError::validation(&e),
            FeedbackError::Disabled => {
                ApiError::service_unavailable("FEATURE_DISABLED", "AI feedback is disabled")
            }
            // Logged with the cause where the model call failed.
            FeedbackError::Upstream(_) | FeedbackError::Parse(_) => {
                ApiError::internal(FEEDBACK_FAILURE_MESSAGE)
            }
        }
    }
}

impl From<CycleError> for ApiError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::Validation(e) => ApiError::validation(&e),
            CycleError::NotFound(id) => ApiError::not_found("Learning cycle", id),
            CycleError::SkillNotFound(id) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "SKILL_NOT_FOUND",
                format!("Skill not found: {}", id),
            ),
            CycleError::Feedback(e) => e.into(),
            CycleError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Learning cycle request failed");
                ApiError::internal("Failed to process learning cycle")
            }
        }
    }
}

impl From<SkillError> for ApiError {
    fn from(err: SkillError) -> Self {
        match err {
            SkillError::Validation(e) => ApiError::validation(&e),
            SkillError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Skill request failed");
                ApiError::internal("Failed to process skill")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.message)
            }
            ErrorCode::UserNotFound => ApiError::unauthorized("User not found"),
            ErrorCode::SkillNotFound | ErrorCode::CycleNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.message)
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                tracing::error!(error = %err, "Request failed");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<UserSyncError> for ApiError {
    fn from(err: UserSyncError) -> Self {
        tracing::error!(error = %err, "Error processing identity webhook");
        ApiError::internal("Error processing webhook")
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        if err.is_server_side() {
            tracing::error!(error = %err, "Identity webhook misconfigured");
            return ApiError::internal("Error processing webhook");
        }
        tracing::warn!(error = %err, "Rejected identity webhook");
        match err {
            WebhookError::MissingHeaders => ApiError::bad_request("Missing svix headers"),
            WebhookError::InvalidPayload(_) => ApiError::bad_request("Invalid webhook payload"),
            _ => ApiError::bad_request("Error verifying webhook"),
        }
    }
}
