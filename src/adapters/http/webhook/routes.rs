//! HTTP routes for identity webhooks.

use axum::{routing::post, Router};

use super::handlers::{receive_identity_event, WebhookHandlers};

/// Creates the webhook router, mounted at `/api/webhooks`.
///
/// Deliveries authenticate by signature, so this router sits outside the
/// bearer-token middleware.
pub fn webhook_routes(handlers: WebhookHandlers) -> Router {
    Router::new()
        .route("/identity", post(receive_identity_event))
        .with_state(handlers)
}
