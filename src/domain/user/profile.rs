//! UserProfile entity and the identity data it is synchronized from.

use serde::Serialize;

use crate::domain::foundation::{Timestamp, UserId};

/// Account data as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

impl IdentityProfile {
    /// Joins first and last name the way the identity provider displays them.
    ///
    /// Returns `None` when there is no first name; a missing last name is
    /// simply left off.
    pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> Option<String> {
        let first = first_name.filter(|f| !f.is_empty())?;
        let joined = format!("{} {}", first, last_name.unwrap_or_default());
        Some(joined.trim().to_string())
    }
}

/// A local user record keyed by the identity-provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: UserId,
    email: String,
    name: Option<String>,
    image_url: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl UserProfile {
    /// Creates a new local record from identity data.
    pub fn from_identity(identity: IdentityProfile) -> Self {
        let now = Timestamp::now();
        Self {
            id: identity.id,
            email: identity.email,
            name: identity.name,
            image_url: identity.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a user from persisted data.
    pub fn reconstitute(
        id: UserId,
        email: String,
        name: Option<String>,
        image_url: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            name,
            image_url,
            created_at,
            updated_at,
        }
    }

    /// Overwrites the synchronized fields with fresh identity data.
    pub fn apply_identity(&mut self, identity: IdentityProfile) {
        self.email = identity.email;
        self.name = identity.name;
        self.image_url = identity.image_url;
        self.updated_at = Timestamp::now();
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
