//! UserRepository port for local user records.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;

/// Repository for users mirrored from the identity provider.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by identity-provider subject.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Insert or fully replace a user record.
    async fn upsert(&self, user: &UserProfile) -> Result<(), DomainError>;

    /// Insert a user unless one with the same id exists.
    ///
    /// Returns `true` when a row was inserted.
    async fn insert_if_absent(&self, user: &UserProfile) -> Result<bool, DomainError>;

    /// Delete a user together with their skills and cycles.
    ///
    /// Returns `false` when no such user existed.
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;
}
