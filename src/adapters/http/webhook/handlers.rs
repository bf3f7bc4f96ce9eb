//! HTTP handler for identity-provider webhooks.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::webhook::{parse_identity_event, SignedHeaders, SvixVerifier};
use crate::application::handlers::SyncIdentityHandler;

#[derive(Clone)]
pub struct WebhookHandlers {
    verifier: Option<Arc<SvixVerifier>>,
    sync_handler: Arc<SyncIdentityHandler>,
}

impl WebhookHandlers {
    /// `verifier` is `None` when no signing secret is configured; deliveries
    /// are then answered with 500.
    pub fn new(verifier: Option<Arc<SvixVerifier>>, sync_handler: Arc<SyncIdentityHandler>) -> Self {
        Self {
            verifier,
            sync_handler,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub message: &'static str,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /api/webhooks/identity - Mirror identity-provider user events locally
pub async fn receive_identity_event(
    State(handlers): State<WebhookHandlers>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signed = SignedHeaders::from_parts(
        header(&headers, "svix-id"),
        header(&headers, "svix-timestamp"),
        header(&headers, "svix-signature"),
    )?;

    let Some(verifier) = handlers.verifier.as_ref() else {
        tracing::error!("Identity webhook received but no signing secret is configured");
        return Err(ApiError::internal("Error processing webhook"));
    };

    verifier.verify(&signed, &body)?;
    let event = parse_identity_event(&body)?;

    tracing::info!(
        webhook_id = %signed.id,
        event_type = %event.kind(),
        "Identity webhook received"
    );

    handlers.sync_handler.handle(event).await?;
    Ok(Json(WebhookAck {
        message: "Webhook received",
    }))
}
