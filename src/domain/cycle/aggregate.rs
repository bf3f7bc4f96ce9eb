//! LearningCycle aggregate - the root entity for a learner's reflection.

use crate::domain::feedback::FeedbackResult;
use crate::domain::foundation::{CycleId, SkillId, Timestamp, UserId};

use super::{CycleContent, Stage};

/// The LearningCycle aggregate root.
///
/// Owned by exactly one user. The cached feedback always describes the
/// current text: any edit clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningCycle {
    id: CycleId,
    user_id: UserId,
    skill_id: Option<SkillId>,
    content: CycleContent,
    feedback: Option<FeedbackResult>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl LearningCycle {
    /// Creates a new cycle for a user.
    pub fn new(user_id: UserId, content: CycleContent, skill_id: Option<SkillId>) -> Self {
        let now = Timestamp::now();
        Self {
            id: CycleId::new(),
            user_id,
            skill_id,
            content,
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a cycle from persisted data.
    pub fn reconstitute(
        id: CycleId,
        user_id: UserId,
        skill_id: Option<SkillId>,
        content: CycleContent,
        feedback: Option<FeedbackResult>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            skill_id,
            content,
            feedback,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> CycleId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn skill_id(&self) -> Option<SkillId> {
        self.skill_id
    }

    pub fn content(&self) -> &CycleContent {
        &self.content
    }

    pub fn title(&self) -> &str {
        self.content.title()
    }

    pub fn stage_text(&self, stage: Stage) -> &str {
        self.content.stage(stage)
    }

    /// Returns the feedback cached for the current text, if any.
    pub fn feedback(&self) -> Option<&FeedbackResult> {
        self.feedback.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if the given user owns this cycle.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────

    /// Replaces the text and skill tag, dropping any cached feedback.
    pub fn revise(&mut self, content: CycleContent, skill_id: Option<SkillId>) {
        self.content = content;
        self.skill_id = skill_id;
        self.feedback = None;
        self.touch();
    }

    /// Caches feedback generated for the current text.
    pub fn record_feedback(&mut self, feedback: FeedbackResult) {
        self.feedback = Some(feedback);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
