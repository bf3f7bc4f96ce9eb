//! CreateSkillHandler - Command handler for adding a skill.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::skill::Skill;
use crate::ports::SkillRepository;

use super::SkillError;

/// Command to create a skill for the acting user.
#[derive(Debug, Clone)]
pub struct CreateSkillCommand {
    pub name: String,
    pub description: Option<String>,
}

/// Handler for creating skills.
pub struct CreateSkillHandler {
    skills: Arc<dyn SkillRepository>,
}

impl CreateSkillHandler {
    pub fn new(skills: Arc<dyn SkillRepository>) -> Self {
        Self { skills }
    }

    pub async fn handle(
        &self,
        cmd: CreateSkillCommand,
        metadata: CommandMetadata,
    ) -> Result<Skill, SkillError> {
        let skill = Skill::new(metadata.user_id.clone(), cmd.name, cmd.description)?;
        self.skills.save(&skill).await?;

        tracing::info!(
            skill_id = %skill.id(),
            user_id = %metadata.user_id,
            correlation_id = %metadata.correlation_id(),
            "Skill created"
        );

        Ok(skill)
    }
}
