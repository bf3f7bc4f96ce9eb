//! Skill aggregate - a user-defined category learning cycles are tagged with.

use serde::Serialize;

use crate::domain::foundation::{SkillId, Timestamp, UserId, ValidationError};

/// A named skill owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    id: SkillId,
    user_id: UserId,
    name: String,
    description: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Skill {
    /// Creates a new skill. The name must not be blank.
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: SkillId::new(),
            user_id,
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a skill from persisted state.
    pub fn reconstitute(
        id: SkillId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> SkillId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
