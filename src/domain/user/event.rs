//! Account lifecycle events delivered by the identity provider.

use crate::domain::foundation::UserId;

use super::IdentityProfile;

/// A verified identity-provider event relevant to local user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// A new account; create the local record unless it already exists.
    Created(IdentityProfile),
    /// Account data changed; overwrite the local record.
    Updated(IdentityProfile),
    /// The account is gone; remove the local record and everything it owns.
    Deleted(UserId),
    /// Any other event type. Acknowledged and ignored.
    Other(String),
}

impl IdentityEvent {
    /// Event type name as sent by the provider.
    pub fn kind(&self) -> &str {
        match self {
            IdentityEvent::Created(_) => "user.created",
            IdentityEvent::Updated(_) => "user.updated",
            IdentityEvent::Deleted(_) => "user.deleted",
            IdentityEvent::Other(kind) => kind,
        }
    }
}
