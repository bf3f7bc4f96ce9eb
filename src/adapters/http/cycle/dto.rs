//! HTTP DTOs for learning cycle endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::skill::SkillResponse;
use crate::application::handlers::CycleWithSkill;
use crate::domain::cycle::{CycleDraft, Stage};
use crate::domain::feedback::FeedbackResult;
use crate::domain::foundation::{SkillId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/cycles` and `PUT /api/cycles/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    #[serde(flatten)]
    pub draft: CycleDraft,
    #[serde(default)]
    pub skill_id: Option<String>,
}

impl CycleRequest {
    pub fn skill_id(&self) -> Result<Option<SkillId>, ApiError> {
        parse_skill_id(self.skill_id.as_deref())
    }
}

/// Query parameters for listing cycles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCyclesParams {
    #[serde(default)]
    pub skill_id: Option<String>,
}

impl ListCyclesParams {
    pub fn skill_id(&self) -> Result<Option<SkillId>, ApiError> {
        parse_skill_id(self.skill_id.as_deref())
    }
}

/// An empty skill id means "no skill".
fn parse_skill_id(raw: Option<&str>) -> Result<Option<SkillId>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<SkillId>()
            .map(Some)
            .map_err(|_| ApiError::bad_request("Invalid skill ID")),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResponse {
    pub id: String,
    pub title: String,
    pub concrete_experience: String,
    pub reflective_observation: String,
    pub abstract_conceptualization: String,
    pub active_experimentation: String,
    pub skill_id: Option<String>,
    pub skill: Option<SkillResponse>,
    pub feedback: Option<FeedbackResult>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&CycleWithSkill> for CycleResponse {
    fn from(view: &CycleWithSkill) -> Self {
        let cycle = &view.cycle;
        Self {
            id: cycle.id().to_string(),
            title: cycle.title().to_string(),
            concrete_experience: cycle.stage_text(Stage::ConcreteExperience).to_string(),
            reflective_observation: cycle.stage_text(Stage::ReflectiveObservation).to_string(),
            abstract_conceptualization: cycle
                .stage_text(Stage::AbstractConceptualization)
                .to_string(),
            active_experimentation: cycle.stage_text(Stage::ActiveExperimentation).to_string(),
            skill_id: cycle.skill_id().map(|id| id.to_string()),
            skill: view.skill.as_ref().map(SkillResponse::from),
            feedback: cycle.feedback().cloned(),
            created_at: cycle.created_at(),
            updated_at: cycle.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle::{CycleContent, LearningCycle};
    use crate::domain::foundation::UserId;
    use crate::domain::skill::Skill;

    fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn request_reads_draft_and_skill_id() {
        let skill_id = SkillId::new();
        let req: CycleRequest = serde_json::from_value(serde_json::json!({
            "title": "Knife skills",
            "concreteExperience": "a",
            "reflectiveObservation": "b",
            "abstractConceptualization": "c",
            "activeExperimentation": "d",
            "skillId": skill_id.to_string()
        }))
        .unwrap();

        assert_eq!(req.draft.title.as_deref(), Some("Knife skills"));
        assert_eq!(req.skill_id().unwrap(), Some(skill_id));
    }

    #[test]
    fn empty_skill_id_means_no_skill() {
        let req = CycleRequest {
            skill_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(req.skill_id().unwrap(), None);
    }

    #[test]
    fn malformed_skill_id_is_bad_request() {
        let params = ListCyclesParams {
            skill_id: Some("not-a-uuid".to_string()),
        };
        let err = params.skill_id().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_embeds_skill_and_camel_case_stages() {
        let skill = Skill::new(owner(), "Cooking", None).unwrap();
        let cycle = LearningCycle::new(
            owner(),
            CycleContent::new("Soup", "a", "b", "c", "d").unwrap(),
            Some(skill.id()),
        );
        let view = CycleWithSkill::new(cycle, Some(skill));

        let json = serde_json::to_value(CycleResponse::from(&view)).unwrap();
        assert_eq!(json["title"], "Soup");
        assert_eq!(json["reflectiveObservation"], "b");
        assert_eq!(json["skill"]["name"], "Cooking");
        assert!(json["feedback"].is_null());
    }
}
