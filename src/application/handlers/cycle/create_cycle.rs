//! CreateCycleHandler - Command handler for logging a new learning cycle.

use std::sync::Arc;

use crate::domain::cycle::{CycleDraft, LearningCycle};
use crate::domain::foundation::{CommandMetadata, SkillId};
use crate::ports::{CycleRepository, SkillRepository};

use super::{CycleError, CycleWithSkill};

/// Command to create a cycle for the acting user.
#[derive(Debug, Clone, Default)]
pub struct CreateCycleCommand {
    pub draft: CycleDraft,
    pub skill_id: Option<SkillId>,
}

/// Handler for creating cycles.
pub struct CreateCycleHandler {
    cycles: Arc<dyn CycleRepository>,
    skills: Arc<dyn SkillRepository>,
}

impl CreateCycleHandler {
    pub fn new(cycles: Arc<dyn CycleRepository>, skills: Arc<dyn SkillRepository>) -> Self {
        Self { cycles, skills }
    }

    pub async fn handle(
        &self,
        cmd: CreateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CycleWithSkill, CycleError> {
        let content = cmd.draft.validate()?;

        // 1. The tagged skill must belong to the same user
        let skill = match cmd.skill_id {
            Some(id) => Some(
                self.skills
                    .find_for_owner(&id, &metadata.user_id)
                    .await?
                    .ok_or(CycleError::SkillNotFound(id))?,
            ),
            None => None,
        };

        // 2. Create and persist
        let cycle = LearningCycle::new(metadata.user_id.clone(), content, cmd.skill_id);
        self.cycles.save(&cycle).await?;

        tracing::info!(
            cycle_id = %cycle.id(),
            user_id = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "Learning cycle created"
        );

        Ok(CycleWithSkill::new(cycle, skill))
    }
}
