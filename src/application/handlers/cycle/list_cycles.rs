//! ListCyclesHandler - Query handler for the acting user's cycles.

use std::sync::Arc;

use crate::domain::foundation::{SkillId, UserId};
use crate::ports::{CycleFilter, CycleRepository, SkillRepository};

use super::{CycleError, CycleWithSkill};

/// Query for a user's cycles, most recently updated first.
#[derive(Debug, Clone)]
pub struct ListCyclesQuery {
    pub user_id: UserId,
    pub skill_id: Option<SkillId>,
    pub limit: Option<u32>,
}

impl ListCyclesQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            skill_id: None,
            limit: None,
        }
    }
}

/// Handler for listing cycles.
pub struct ListCyclesHandler {
    cycles: Arc<dyn CycleRepository>,
    skills: Arc<dyn SkillRepository>,
}

impl ListCyclesHandler {
    pub fn new(cycles: Arc<dyn CycleRepository>, skills: Arc<dyn SkillRepository>) -> Self {
        Self { cycles, skills }
    }

    pub async fn handle(&self, query: ListCyclesQuery) -> Result<Vec<CycleWithSkill>, CycleError> {
        let mut filter = CycleFilter::default().with_skill(query.skill_id);
        if let Some(limit) = query.limit {
            filter = filter.with_limit(limit);
        }

        let cycles = self.cycles.list_by_owner(&query.user_id, filter).await?;
        Ok(CycleWithSkill::load_all(self.skills.as_ref(), &query.user_id, cycles).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::cycle::{CycleContent, LearningCycle};
    use crate::domain::skill::Skill;

    #[tokio::test]
    async fn lists_only_own_cycles_with_skills_embedded() {
        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let skill = Skill::new(owner.clone(), "Writing", None).unwrap();
        SkillRepository::save(&store, &skill).await.unwrap();

        let content = CycleContent::new("t", "a", "b", "c", "d").unwrap();
        for (user, tag) in [("u1", Some(skill.id())), ("u1", None), ("u2", None)] {
            let cycle = LearningCycle::new(UserId::new(user).unwrap(), content.clone(), tag);
            CycleRepository::save(&store, &cycle).await.unwrap();
        }
        let handler = ListCyclesHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        let all = handler.handle(ListCyclesQuery::for_user(owner.clone())).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|c| c.skill.is_some()).count(), 1);

        let tagged = handler
            .handle(ListCyclesQuery {
                skill_id: Some(skill.id()),
                ..ListCyclesQuery::for_user(owner)
            })
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].skill.as_ref().map(|s| s.name()), Some("Writing"));
    }
}
