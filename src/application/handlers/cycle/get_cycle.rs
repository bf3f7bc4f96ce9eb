//! GetCycleHandler - Query handler for one cycle of the acting user.

use std::sync::Arc;

use crate::domain::foundation::{CycleId, UserId};
use crate::ports::{CycleRepository, SkillRepository};

use super::{CycleError, CycleWithSkill};

/// Query to get a cycle by ID.
#[derive(Debug, Clone)]
pub struct GetCycleQuery {
    pub cycle_id: CycleId,
    pub user_id: UserId,
}

/// Handler for retrieving a cycle.
pub struct GetCycleHandler {
    cycles: Arc<dyn CycleRepository>,
    skills: Arc<dyn SkillRepository>,
}

impl GetCycleHandler {
    pub fn new(cycles: Arc<dyn CycleRepository>, skills: Arc<dyn SkillRepository>) -> Self {
        Self { cycles, skills }
    }

    /// Cycles owned by other users are reported as not found.
    pub async fn handle(&self, query: GetCycleQuery) -> Result<CycleWithSkill, CycleError> {
        let cycle = self
            .cycles
            .find_for_owner(&query.cycle_id, &query.user_id)
            .await?
            .ok_or_else(|| CycleError::not_found(query.cycle_id))?;

        Ok(CycleWithSkill::load(self.skills.as_ref(), cycle).await?)
    }
}
