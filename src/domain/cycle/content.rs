//! Cycle text content and its validation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::Stage;

/// Unvalidated cycle text as submitted by a client.
///
/// Every field is optional here so validation can report all missing fields
/// at once instead of failing on the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDraft {
    pub title: Option<String>,
    pub concrete_experience: Option<String>,
    pub reflective_observation: Option<String>,
    pub abstract_conceptualization: Option<String>,
    pub active_experimentation: Option<String>,
}

impl CycleDraft {
    /// Validates that all five fields are present and non-empty.
    ///
    /// Whitespace-only text counts as present; only absent or empty strings
    /// are rejected.
    pub fn validate(self) -> Result<CycleContent, ValidationError> {
        let mut missing = Vec::new();
        let mut take = |name: &'static str, value: Option<String>| match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let title = take("title", self.title);
        let concrete_experience = take(Stage::ConcreteExperience.key(), self.concrete_experience);
        let reflective_observation =
            take(Stage::ReflectiveObservation.key(), self.reflective_observation);
        let abstract_conceptualization = take(
            Stage::AbstractConceptualization.key(),
            self.abstract_conceptualization,
        );
        let active_experimentation =
            take(Stage::ActiveExperimentation.key(), self.active_experimentation);

        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        Ok(CycleContent {
            title,
            concrete_experience,
            reflective_observation,
            abstract_conceptualization,
            active_experimentation,
        })
    }
}

/// Validated cycle text: a title and one entry per stage, none empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleContent {
    title: String,
    concrete_experience: String,
    reflective_observation: String,
    abstract_conceptualization: String,
    active_experimentation: String,
}

impl CycleContent {
    /// Builds content from five values, validating them like a draft.
    pub fn new(
        title: impl Into<String>,
        concrete_experience: impl Into<String>,
        reflective_observation: impl Into<String>,
        abstract_conceptualization: impl Into<String>,
        active_experimentation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        CycleDraft {
            title: Some(title.into()),
            concrete_experience: Some(concrete_experience.into()),
            reflective_observation: Some(reflective_observation.into()),
            abstract_conceptualization: Some(abstract_conceptualization.into()),
            active_experimentation: Some(active_experimentation.into()),
        }
        .validate()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the learner's text for one stage.
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::ConcreteExperience => &self.concrete_experience,
            Stage::ReflectiveObservation => &self.reflective_observation,
            Stage::AbstractConceptualization => &self.abstract_conceptualization,
            Stage::ActiveExperimentation => &self.active_experimentation,
        }
    }
}
