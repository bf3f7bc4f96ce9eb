//! Read model pairing a cycle with its skill.

use std::collections::HashMap;

use crate::domain::cycle::LearningCycle;
use crate::domain::foundation::{DomainError, SkillId, UserId};
use crate::domain::skill::Skill;
use crate::ports::SkillRepository;

/// A cycle with its tagged skill resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleWithSkill {
    pub cycle: LearningCycle,
    pub skill: Option<Skill>,
}

impl CycleWithSkill {
    pub fn new(cycle: LearningCycle, skill: Option<Skill>) -> Self {
        Self { cycle, skill }
    }

    /// Resolves the skill of a single cycle.
    pub(crate) async fn load(
        skills: &dyn SkillRepository,
        cycle: LearningCycle,
    ) -> Result<Self, DomainError> {
        let skill = match cycle.skill_id() {
            Some(id) => skills.find_for_owner(&id, cycle.user_id()).await?,
            None => None,
        };
        Ok(Self::new(cycle, skill))
    }

    /// Resolves skills for many cycles of one owner with a single lookup.
    pub(crate) async fn load_all(
        skills: &dyn SkillRepository,
        owner: &UserId,
        cycles: Vec<LearningCycle>,
    ) -> Result<Vec<Self>, DomainError> {
        if cycles.iter().all(|c| c.skill_id().is_none()) {
            return Ok(cycles.into_iter().map(|c| Self::new(c, None)).collect());
        }

        let by_id: HashMap<SkillId, Skill> = skills
            .list_by_owner(owner)
            .await?
            .into_iter()
            .map(|skill| (skill.id(), skill))
            .collect();

        Ok(cycles
            .into_iter()
            .map(|cycle| {
                let skill = cycle.skill_id().and_then(|id| by_id.get(&id).cloned());
                Self::new(cycle, skill)
            })
            .collect())
    }
}
