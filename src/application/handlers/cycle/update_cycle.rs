//! UpdateCycleHandler - Command handler for editing a cycle.

use std::sync::Arc;

use crate::domain::cycle::CycleDraft;
use crate::domain::foundation::{CommandMetadata, CycleId, SkillId};
use crate::ports::{CycleRepository, SkillRepository};

use super::{CycleError, CycleWithSkill};

/// Command replacing a cycle's text and skill tag.
#[derive(Debug, Clone)]
pub struct UpdateCycleCommand {
    pub cycle_id: CycleId,
    pub draft: CycleDraft,
    pub skill_id: Option<SkillId>,
}

/// Handler for editing cycles.
pub struct UpdateCycleHandler {
    cycles: Arc<dyn CycleRepository>,
    skills: Arc<dyn SkillRepository>,
}

impl UpdateCycleHandler {
    pub fn new(cycles: Arc<dyn CycleRepository>, skills: Arc<dyn SkillRepository>) -> Self {
        Self { cycles, skills }
    }

    /// Revising a cycle drops any cached feedback.
    pub async fn handle(
        &self,
        cmd: UpdateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CycleWithSkill, CycleError> {
        let content = cmd.draft.validate()?;

        let mut cycle = self
            .cycles
            .find_for_owner(&cmd.cycle_id, &metadata.user_id)
            .await?
            .ok_or_else(|| CycleError::not_found(cmd.cycle_id))?;

        let skill = match cmd.skill_id {
            Some(id) => Some(
                self.skills
                    .find_for_owner(&id, &metadata.user_id)
                    .await?
                    .ok_or(CycleError::SkillNotFound(id))?,
            ),
            None => None,
        };

        cycle.revise(content, cmd.skill_id);
        self.cycles.update(&cycle).await?;

        tracing::info!(
            cycle_id = %cycle.id(),
            correlation_id = %metadata.correlation_id(),
            "Learning cycle updated"
        );

        Ok(CycleWithSkill::new(cycle, skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::cycle::{CycleContent, LearningCycle};
    use crate::domain::feedback::FeedbackResult;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    fn draft(title: &str) -> CycleDraft {
        CycleDraft {
            title: Some(title.to_string()),
            concrete_experience: Some("a".to_string()),
            reflective_observation: Some("b".to_string()),
            abstract_conceptualization: Some("c".to_string()),
            active_experimentation: Some("d".to_string()),
        }
    }

    fn feedback() -> FeedbackResult {
        let stage = json!({"rating": 5, "feedback": "ok"});
        serde_json::from_value(json!({
            "concreteExperience": stage,
            "reflectiveObservation": stage,
            "abstractConceptualization": stage,
            "activeExperimentation": stage,
            "overallFeedback": "fine"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn edit_replaces_text_and_clears_feedback() {
        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let mut cycle = LearningCycle::new(
            owner.clone(),
            CycleContent::new("old", "a", "b", "c", "d").unwrap(),
            None,
        );
        cycle.record_feedback(feedback());
        CycleRepository::save(&store, &cycle).await.unwrap();
        let handler = UpdateCycleHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        let updated = handler
            .handle(
                UpdateCycleCommand {
                    cycle_id: cycle.id(),
                    draft: draft("new"),
                    skill_id: None,
                },
                CommandMetadata::new(owner.clone()),
            )
            .await
            .unwrap();

        assert_eq!(updated.cycle.title(), "new");
        let stored = CycleRepository::find_for_owner(&store, &cycle.id(), &owner)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.feedback().is_none());
    }

    #[tokio::test]
    async fn cannot_edit_someone_elses_cycle() {
        let store = InMemoryStore::new();
        let cycle = LearningCycle::new(
            UserId::new("u1").unwrap(),
            CycleContent::new("t", "a", "b", "c", "d").unwrap(),
            None,
        );
        CycleRepository::save(&store, &cycle).await.unwrap();
        let handler = UpdateCycleHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        let err = handler
            .handle(
                UpdateCycleCommand {
                    cycle_id: cycle.id(),
                    draft: draft("hijack"),
                    skill_id: None,
                },
                CommandMetadata::new(UserId::new("u2").unwrap()),
            )
            .await
            .unwrap_err();

        assert_eq!(err, CycleError::NotFound(cycle.id()));
    }
}
