//! ListSkillsHandler - Query handler for the acting user's skills.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::skill::Skill;
use crate::ports::SkillRepository;

use super::SkillError;

/// Query for a user's skills, ordered by name.
#[derive(Debug, Clone)]
pub struct ListSkillsQuery {
    pub user_id: UserId,
}

pub struct ListSkillsHandler {
    skills: Arc<dyn SkillRepository>,
}

impl ListSkillsHandler {
    pub fn new(skills: Arc<dyn SkillRepository>) -> Self {
        Self { skills }
    }

    pub async fn handle(&self, query: ListSkillsQuery) -> Result<Vec<Skill>, SkillError> {
        Ok(self.skills.list_by_owner(&query.user_id).await?)
    }
}
