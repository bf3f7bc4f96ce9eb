//! Cycle repository port.
//!
//! Defines the contract for persisting and retrieving LearningCycle
//! aggregates. Every read is scoped to an owner.

use async_trait::async_trait;

use crate::domain::cycle::LearningCycle;
use crate::domain::feedback::FeedbackResult;
use crate::domain::foundation::{CycleId, DomainError, SkillId, Timestamp, UserId};

/// Listing options for a user's cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleFilter {
    /// Only cycles tagged with this skill.
    pub skill_id: Option<SkillId>,
    /// Maximum number of cycles to return.
    pub limit: Option<u32>,
}

impl CycleFilter {
    pub fn with_skill(mut self, skill_id: Option<SkillId>) -> Self {
        self.skill_id = skill_id;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Repository port for LearningCycle persistence.
#[async_trait]
pub trait CycleRepository: Send + Sync {
    /// Save a new cycle.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, cycle: &LearningCycle) -> Result<(), DomainError>;

    /// Update an existing cycle, including its cached feedback.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, cycle: &LearningCycle) -> Result<(), DomainError>;

    /// Cache feedback on a cycle, but only while it is still at
    /// `expected_updated_at`.
    ///
    /// Returns `false` without writing when the cycle was edited or removed
    /// after it was read.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn record_feedback(
        &self,
        id: &CycleId,
        owner: &UserId,
        expected_updated_at: Timestamp,
        feedback: &FeedbackResult,
    ) -> Result<bool, DomainError>;

    /// Find a cycle by id, scoped to its owner.
    ///
    /// Returns `None` when the cycle does not exist or belongs to someone else.
    async fn find_for_owner(
        &self,
        id: &CycleId,
        owner: &UserId,
    ) -> Result<Option<LearningCycle>, DomainError>;

    /// List a user's cycles, most recently updated first.
    async fn list_by_owner(
        &self,
        owner: &UserId,
        filter: CycleFilter,
    ) -> Result<Vec<LearningCycle>, DomainError>;

    /// Count a user's cycles.
    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError>;
}
