//! HTTP DTOs for the feedback endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::cycle::CycleDraft;
use crate::domain::feedback::FeedbackOutcome;

/// Body of `POST /api/feedback`: the cycle fields plus an optional skill.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRequestBody {
    #[serde(flatten)]
    pub draft: CycleDraft,
    #[serde(default)]
    pub skill: Option<SkillRef>,
}

impl FeedbackRequestBody {
    pub fn skill_name(&self) -> Option<String> {
        self.skill.as_ref().and_then(|s| s.name.clone())
    }
}

/// The skill a draft is tagged with; only its name reaches the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// `{ "feedback": ... }` where an empty outcome renders as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackResponse {
    pub feedback: FeedbackOutcome,
}
