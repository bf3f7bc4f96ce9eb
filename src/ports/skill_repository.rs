//! SkillRepository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SkillId, UserId};
use crate::domain::skill::Skill;

/// Repository for user-defined skills.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Save a new skill.
    async fn save(&self, skill: &Skill) -> Result<(), DomainError>;

    /// Find a skill by id, scoped to its owner.
    ///
    /// Returns `None` when the skill does not exist or belongs to someone else.
    async fn find_for_owner(
        &self,
        id: &SkillId,
        owner: &UserId,
    ) -> Result<Option<Skill>, DomainError>;

    /// List a user's skills ordered by name ascending.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Skill>, DomainError>;

    /// Count a user's skills.
    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError>;
}
