//! AnalyzeCycleHandler - Generates and caches feedback for a stored cycle.

use std::sync::Arc;

use crate::application::handlers::feedback::GenerateFeedbackHandler;
use crate::domain::feedback::{FeedbackOutcome, FeedbackRequest};
use crate::domain::foundation::{CommandMetadata, CycleId};
use crate::ports::{CycleRepository, SkillRepository};

use super::CycleError;

/// Command to analyze one of the acting user's cycles.
#[derive(Debug, Clone)]
pub struct AnalyzeCycleCommand {
    pub cycle_id: CycleId,
}

/// Handler for stored-cycle analysis.
pub struct AnalyzeCycleHandler {
    cycles: Arc<dyn CycleRepository>,
    skills: Arc<dyn SkillRepository>,
    feedback: Arc<GenerateFeedbackHandler>,
}

impl AnalyzeCycleHandler {
    pub fn new(
        cycles: Arc<dyn CycleRepository>,
        skills: Arc<dyn SkillRepository>,
        feedback: Arc<GenerateFeedbackHandler>,
    ) -> Self {
        Self {
            cycles,
            skills,
            feedback,
        }
    }

    /// Complete results are stored on the cycle unless it was edited while
    /// the model was running; an empty (degraded) result is returned but not
    /// stored.
    pub async fn handle(
        &self,
        cmd: AnalyzeCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<FeedbackOutcome, CycleError> {
        let cycle = self
            .cycles
            .find_for_owner(&cmd.cycle_id, &metadata.user_id)
            .await?
            .ok_or_else(|| CycleError::not_found(cmd.cycle_id))?;

        let skill = match cycle.skill_id() {
            Some(id) => self.skills.find_for_owner(&id, &metadata.user_id).await?,
            None => None,
        };

        let request = FeedbackRequest::for_cycle(&cycle, skill.as_ref().map(|s| s.name()));
        let outcome = self.feedback.generate(request, &metadata).await?;

        if let FeedbackOutcome::Complete(result) = &outcome {
            let cached = self
                .cycles
                .record_feedback(&cycle.id(), &metadata.user_id, cycle.updated_at(), result)
                .await?;
            if cached {
                tracing::info!(cycle_id = %cycle.id(), "Cached feedback on learning cycle");
            } else {
                tracing::info!(
                    cycle_id = %cycle.id(),
                    "Learning cycle changed during analysis; feedback not cached"
                );
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::feedback::FeedbackError;
    use crate::domain::cycle::{CycleContent, LearningCycle};
    use crate::domain::feedback::{FeedbackParameters, UnparseablePolicy};
    use crate::domain::foundation::UserId;
    use crate::domain::skill::Skill;
    use serde_json::json;

    fn reply() -> String {
        let stage = json!({"rating": 7, "feedback": "good"});
        json!({
            "concreteExperience": stage,
            "reflectiveObservation": stage,
            "abstractConceptualization": stage,
            "activeExperimentation": stage,
            "overallFeedback": "Nice cycle."
        })
        .to_string()
    }

    fn handler(
        store: &InMemoryStore,
        ai: &MockAIProvider,
        policy: UnparseablePolicy,
    ) -> AnalyzeCycleHandler {
        let feedback = GenerateFeedbackHandler::new(
            Arc::new(ai.clone()),
            FeedbackParameters::default(),
            policy,
        );
        AnalyzeCycleHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(feedback),
        )
    }

    async fn stored_cycle(store: &InMemoryStore, owner: &UserId) -> LearningCycle {
        let skill = Skill::new(owner.clone(), "Public speaking", None).unwrap();
        SkillRepository::save(store, &skill).await.unwrap();
        let cycle = LearningCycle::new(
            owner.clone(),
            CycleContent::new("Talk", "gave a talk", "rushed", "pacing", "rehearse").unwrap(),
            Some(skill.id()),
        );
        CycleRepository::save(store, &cycle).await.unwrap();
        cycle
    }

    #[tokio::test]
    async fn complete_feedback_is_cached_on_cycle() {
        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let cycle = stored_cycle(&store, &owner).await;
        let ai = MockAIProvider::new().with_response(reply());

        let outcome = handler(&store, &ai, UnparseablePolicy::Fail)
            .handle(
                AnalyzeCycleCommand { cycle_id: cycle.id() },
                CommandMetadata::new(owner.clone()),
            )
            .await
            .unwrap();

        let stored = CycleRepository::find_for_owner(&store, &cycle.id(), &owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.feedback(), outcome.result());
        assert!(ai.get_calls()[0].messages[0]
            .content
            .contains("Skill: Public speaking"));
    }

    #[tokio::test]
    async fn edit_during_analysis_wins_over_stale_feedback() {
        use crate::application::handlers::cycle::{UpdateCycleCommand, UpdateCycleHandler};
        use crate::domain::cycle::CycleDraft;
        use std::time::Duration;

        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let cycle = stored_cycle(&store, &owner).await;
        let ai = MockAIProvider::new()
            .with_response(reply())
            .with_delay(Duration::from_millis(100));
        let analyze = handler(&store, &ai, UnparseablePolicy::Fail);
        let update = UpdateCycleHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));

        let analysis = analyze.handle(
            AnalyzeCycleCommand { cycle_id: cycle.id() },
            CommandMetadata::new(owner.clone()),
        );
        let edit = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            update
                .handle(
                    UpdateCycleCommand {
                        cycle_id: cycle.id(),
                        draft: CycleDraft {
                            title: Some("Second talk".to_string()),
                            concrete_experience: Some("gave it again".to_string()),
                            reflective_observation: Some("calmer".to_string()),
                            abstract_conceptualization: Some("practice helps".to_string()),
                            active_experimentation: Some("record myself".to_string()),
                        },
                        skill_id: None,
                    },
                    CommandMetadata::new(owner.clone()),
                )
                .await
        };
        let (outcome, edited) = tokio::join!(analysis, edit);

        assert!(outcome.unwrap().result().is_some());
        edited.unwrap();
        let stored = CycleRepository::find_for_owner(&store, &cycle.id(), &owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), "Second talk");
        assert!(stored.feedback().is_none());
    }

    #[tokio::test]
    async fn degraded_feedback_is_not_cached() {
        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let cycle = stored_cycle(&store, &owner).await;
        let ai = MockAIProvider::new().with_response("not json");

        let outcome = handler(&store, &ai, UnparseablePolicy::Degrade)
            .handle(
                AnalyzeCycleCommand { cycle_id: cycle.id() },
                CommandMetadata::new(owner.clone()),
            )
            .await
            .unwrap();

        assert!(outcome.is_empty());
        let stored = CycleRepository::find_for_owner(&store, &cycle.id(), &owner)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.feedback().is_none());
    }

    #[tokio::test]
    async fn parse_failure_surfaces_as_feedback_error() {
        let store = InMemoryStore::new();
        let owner = UserId::new("u1").unwrap();
        let cycle = stored_cycle(&store, &owner).await;
        let ai = MockAIProvider::new().with_response("not json");

        let err = handler(&store, &ai, UnparseablePolicy::Fail)
            .handle(
                AnalyzeCycleCommand { cycle_id: cycle.id() },
                CommandMetadata::new(owner),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CycleError::Feedback(FeedbackError::Parse(_))));
    }

    #[tokio::test]
    async fn unknown_cycle_makes_no_model_call() {
        let store = InMemoryStore::new();
        let ai = MockAIProvider::new();
        let id = CycleId::new();

        let err = handler(&store, &ai, UnparseablePolicy::Fail)
            .handle(
                AnalyzeCycleCommand { cycle_id: id },
                CommandMetadata::new(UserId::new("u1").unwrap()),
            )
            .await
            .unwrap_err();

        assert_eq!(err, CycleError::NotFound(id));
        assert_eq!(ai.call_count(), 0);
    }
}
