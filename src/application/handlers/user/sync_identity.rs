//! SyncIdentityHandler - Applies identity-provider events to local users.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::domain::user::{IdentityEvent, UserProfile};
use crate::ports::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserSyncError {
    #[error("Failed to sync user: {0}")]
    Infrastructure(String),
}

impl From<DomainError> for UserSyncError {
    fn from(err: DomainError) -> Self {
        UserSyncError::Infrastructure(err.to_string())
    }
}

/// What an event did to the local records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    AlreadyExists,
    Updated,
    Deleted,
    /// Deletion of a user that was never stored, or already removed.
    AlreadyDeleted,
    Ignored,
}

pub struct SyncIdentityHandler {
    users: Arc<dyn UserRepository>,
}

impl SyncIdentityHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, event: IdentityEvent) -> Result<SyncOutcome, UserSyncError> {
        let kind = event.kind().to_string();

        let outcome = match event {
            IdentityEvent::Created(identity) => {
                let user = UserProfile::from_identity(identity);
                if self.users.insert_if_absent(&user).await? {
                    SyncOutcome::Created
                } else {
                    SyncOutcome::AlreadyExists
                }
            }
            IdentityEvent::Updated(identity) => {
                let user = match self.users.find_by_id(&identity.id).await? {
                    Some(mut existing) => {
                        existing.apply_identity(identity);
                        existing
                    }
                    None => UserProfile::from_identity(identity),
                };
                self.users.upsert(&user).await?;
                SyncOutcome::Updated
            }
            IdentityEvent::Deleted(id) => {
                if self.users.delete(&id).await? {
                    SyncOutcome::Deleted
                } else {
                    SyncOutcome::AlreadyDeleted
                }
            }
            IdentityEvent::Other(_) => {
                tracing::info!(event_type = %kind, "Unhandled identity event type");
                SyncOutcome::Ignored
            }
        };

        tracing::debug!(event_type = %kind, outcome = ?outcome, "Identity event applied");
        Ok(outcome)
    }
}
