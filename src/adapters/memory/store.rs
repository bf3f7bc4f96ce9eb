//! In-memory store backing the user, skill and cycle repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::cycle::LearningCycle;
use crate::domain::feedback::FeedbackResult;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, SkillId, Timestamp, UserId};
use crate::domain::skill::Skill;
use crate::domain::user::UserProfile;
use crate::ports::{CycleFilter, CycleRepository, SkillRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserProfile>,
    skills: HashMap<SkillId, Skill>,
    cycles: HashMap<CycleId, LearningCycle>,
}

/// Shared in-memory tables for users, skills and learning cycles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Number of stored cycles across all users.
    pub async fn cycle_count(&self) -> usize {
        self.tables.read().await.cycles.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.users.clear();
        tables.skills.clear();
        tables.cycles.clear();
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn upsert(&self, user: &UserProfile) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(user.id()) {
            // The original creation time survives updates, as with ON CONFLICT.
            Some(existing) => {
                *existing = UserProfile::reconstitute(
                    user.id().clone(),
                    user.email().to_string(),
                    user.name().map(str::to_string),
                    user.image_url().map(str::to_string),
                    existing.created_at(),
                    user.updated_at(),
                );
            }
            None => {
                tables.users.insert(user.id().clone(), user.clone());
            }
        }
        Ok(())
    }

    async fn insert_if_absent(&self, user: &UserProfile) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(user.id()) {
            return Ok(false);
        }
        tables.users.insert(user.id().clone(), user.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let removed = tables.users.remove(id).is_some();
        tables.skills.retain(|_, skill| skill.user_id() != id);
        tables.cycles.retain(|_, cycle| !cycle.is_owned_by(id));
        Ok(removed)
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn save(&self, skill: &Skill) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.skills.contains_key(&skill.id()) {
            return Err(DomainError::database("Failed to insert skill", "duplicate id"));
        }
        tables.skills.insert(skill.id(), skill.clone());
        Ok(())
    }

    async fn find_for_owner(
        &self,
        id: &SkillId,
        owner: &UserId,
    ) -> Result<Option<Skill>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .skills
            .get(id)
            .filter(|skill| skill.user_id() == owner)
            .cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Skill>, DomainError> {
        let tables = self.tables.read().await;
        let mut skills: Vec<Skill> = tables
            .skills
            .values()
            .filter(|skill| skill.user_id() == owner)
            .cloned()
            .collect();
        skills.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(skills)
    }

    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.skills.values().filter(|s| s.user_id() == owner).count() as u64)
    }
}

#[async_trait]
impl CycleRepository for InMemoryStore {
    async fn save(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.cycles.contains_key(&cycle.id()) {
            return Err(DomainError::database("Failed to insert learning cycle", "duplicate id"));
        }
        tables.cycles.insert(cycle.id(), cycle.clone());
        Ok(())
    }

    async fn update(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.cycles.get_mut(&cycle.id()) {
            Some(existing) if existing.is_owned_by(cycle.user_id()) => {
                *existing = cycle.clone();
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Learning cycle not found: {}", cycle.id()),
            )),
        }
    }

    async fn record_feedback(
        &self,
        id: &CycleId,
        owner: &UserId,
        expected_updated_at: Timestamp,
        feedback: &FeedbackResult,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        match tables.cycles.get_mut(id) {
            Some(cycle)
                if cycle.is_owned_by(owner) && cycle.updated_at() == expected_updated_at =>
            {
                cycle.record_feedback(feedback.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_for_owner(
        &self,
        id: &CycleId,
        owner: &UserId,
    ) -> Result<Option<LearningCycle>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cycles
            .get(id)
            .filter(|cycle| cycle.is_owned_by(owner))
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
        filter: CycleFilter,
    ) -> Result<Vec<LearningCycle>, DomainError> {
        let tables = self.tables.read().await;
        let mut cycles: Vec<LearningCycle> = tables
            .cycles
            .values()
            .filter(|cycle| cycle.is_owned_by(owner))
            .filter(|cycle| filter.skill_id.map_or(true, |id| cycle.skill_id() == Some(id)))
            .cloned()
            .collect();
        cycles.sort_by(|a, b| b.updated_at().as_datetime().cmp(a.updated_at().as_datetime()));
        if let Some(limit) = filter.limit {
            cycles.truncate(limit as usize);
        }
        Ok(cycles)
    }

    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.cycles.values().filter(|c| c.is_owned_by(owner)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle::CycleContent;
    use crate::domain::user::IdentityProfile;

    fn user_id(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn profile(id: &str, email: &str) -> UserProfile {
        UserProfile::from_identity(IdentityProfile {
            id: user_id(id),
            email: email.to_string(),
            name: None,
            image_url: None,
        })
    }

    fn content(title: &str) -> CycleContent {
        CycleContent::new(title, "a", "b", "c", "d").unwrap()
    }

    #[tokio::test]
    async fn insert_if_absent_only_inserts_once() {
        let store = InMemoryStore::new();
        assert!(store.insert_if_absent(&profile("u1", "a@x.io")).await.unwrap());
        assert!(!store.insert_if_absent(&profile("u1", "b@x.io")).await.unwrap());

        let stored = UserRepository::find_by_id(&store, &user_id("u1")).await.unwrap().unwrap();
        assert_eq!(stored.email(), "a@x.io");
    }

    #[tokio::test]
    async fn upsert_keeps_creation_time() {
        let store = InMemoryStore::new();
        let original = profile("u1", "a@x.io");
        store.upsert(&original).await.unwrap();

        let mut changed = original.clone();
        changed.apply_identity(IdentityProfile {
            id: user_id("u1"),
            email: "new@x.io".to_string(),
            name: Some("Ada".to_string()),
            image_url: None,
        });
        store.upsert(&changed).await.unwrap();

        let stored = UserRepository::find_by_id(&store, &user_id("u1")).await.unwrap().unwrap();
        assert_eq!(stored.email(), "new@x.io");
        assert_eq!(stored.created_at(), original.created_at());
    }

    #[tokio::test]
    async fn deleting_user_cascades() {
        let store = InMemoryStore::new();
        let owner = user_id("u1");
        store.upsert(&profile("u1", "a@x.io")).await.unwrap();
        let skill = Skill::new(owner.clone(), "Rust", None).unwrap();
        SkillRepository::save(&store, &skill).await.unwrap();
        CycleRepository::save(&store, &LearningCycle::new(owner.clone(), content("t"), Some(skill.id())))
            .await
            .unwrap();

        assert!(UserRepository::delete(&store, &owner).await.unwrap());
        assert!(!UserRepository::delete(&store, &owner).await.unwrap());
        assert_eq!(SkillRepository::count_by_owner(&store, &owner).await.unwrap(), 0);
        assert_eq!(store.cycle_count().await, 0);
    }

    #[tokio::test]
    async fn lookups_are_scoped_to_owner() {
        let store = InMemoryStore::new();
        let cycle = LearningCycle::new(user_id("u1"), content("mine"), None);
        CycleRepository::save(&store, &cycle).await.unwrap();

        let theirs = CycleRepository::find_for_owner(&store, &cycle.id(), &user_id("u2"))
            .await
            .unwrap();
        assert!(theirs.is_none());

        let mut stolen = LearningCycle::reconstitute(
            cycle.id(),
            user_id("u2"),
            None,
            content("stolen"),
            None,
            cycle.created_at(),
            cycle.updated_at(),
        );
        stolen.revise(content("stolen"), None);
        let err = CycleRepository::update(&store, &stolen).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CycleNotFound);
    }

    #[tokio::test]
    async fn feedback_is_recorded_only_on_unchanged_cycle() {
        let store = InMemoryStore::new();
        let owner = user_id("u1");
        let cycle = LearningCycle::new(owner.clone(), content("draft"), None);
        CycleRepository::save(&store, &cycle).await.unwrap();
        let stage = serde_json::json!({"rating": 6, "feedback": "ok"});
        let feedback: FeedbackResult = serde_json::from_value(serde_json::json!({
            "concreteExperience": stage,
            "reflectiveObservation": stage,
            "abstractConceptualization": stage,
            "activeExperimentation": stage,
            "overallFeedback": "fine"
        }))
        .unwrap();

        let mut edited = cycle.clone();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        edited.revise(content("revised"), None);
        CycleRepository::update(&store, &edited).await.unwrap();

        let stale = store
            .record_feedback(&cycle.id(), &owner, cycle.updated_at(), &feedback)
            .await
            .unwrap();
        assert!(!stale);
        let fresh = store
            .record_feedback(&cycle.id(), &owner, edited.updated_at(), &feedback)
            .await
            .unwrap();
        assert!(fresh);

        let stored = CycleRepository::find_for_owner(&store, &cycle.id(), &owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), "revised");
        assert_eq!(stored.feedback(), Some(&feedback));

        let missing = store
            .record_feedback(&CycleId::new(), &owner, edited.updated_at(), &feedback)
            .await
            .unwrap();
        assert!(!missing);
    }

    #[tokio::test]
    async fn cycles_list_newest_first_with_filter_and_limit() {
        let store = InMemoryStore::new();
        let owner = user_id("u1");
        let skill = SkillId::new();
        for (title, tag) in [("one", None), ("two", Some(skill)), ("three", Some(skill))] {
            CycleRepository::save(&store, &LearningCycle::new(owner.clone(), content(title), tag))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let all = CycleRepository::list_by_owner(&store, &owner, CycleFilter::default())
            .await
            .unwrap();
        let titles: Vec<&str> = all.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        let tagged = CycleRepository::list_by_owner(
            &store,
            &owner,
            CycleFilter::default().with_skill(Some(skill)).with_limit(1),
        )
        .await
        .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title(), "three");
    }

    #[tokio::test]
    async fn skills_list_by_name() {
        let store = InMemoryStore::new();
        let owner = user_id("u1");
        for name in ["Writing", "Cooking", "Rust"] {
            SkillRepository::save(&store, &Skill::new(owner.clone(), name, None).unwrap())
                .await
                .unwrap();
        }

        let names: Vec<String> = SkillRepository::list_by_owner(&store, &owner)
            .await
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Cooking", "Rust", "Writing"]);
    }
}
