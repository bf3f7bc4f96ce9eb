//! HTTP adapter for identity-provider webhooks.

mod handlers;
mod routes;

pub use handlers::{WebhookAck, WebhookHandlers};
pub use routes::webhook_routes;
