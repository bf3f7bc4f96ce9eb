//! Mapping of the identity provider's user webhook payloads.

use serde::Deserialize;

use crate::domain::foundation::UserId;
use crate::domain::user::{IdentityEvent, IdentityProfile};

use super::WebhookError;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct DeletedData {
    id: Option<String>,
}

/// Parses a verified webhook body into an `IdentityEvent`.
pub fn parse_identity_event(body: &[u8]) -> Result<IdentityEvent, WebhookError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

    match envelope.kind.as_str() {
        "user.created" => Ok(IdentityEvent::Created(identity(envelope.data)?)),
        "user.updated" => Ok(IdentityEvent::Updated(identity(envelope.data)?)),
        "user.deleted" => {
            let data: DeletedData = serde_json::from_value(envelope.data)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
            let id = data
                .id
                .ok_or_else(|| WebhookError::InvalidPayload("missing user id".to_string()))?;
            Ok(IdentityEvent::Deleted(user_id(id)?))
        }
        _ => Ok(IdentityEvent::Other(envelope.kind)),
    }
}

fn identity(data: serde_json::Value) -> Result<IdentityProfile, WebhookError> {
    let data: UserData =
        serde_json::from_value(data).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

    Ok(IdentityProfile {
        id: user_id(data.id)?,
        email: data
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .unwrap_or_default(),
        name: IdentityProfile::display_name(data.first_name.as_deref(), data.last_name.as_deref()),
        image_url: data.image_url.filter(|url| !url.is_empty()),
    })
}

fn user_id(id: String) -> Result<UserId, WebhookError> {
    UserId::new(id).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}
