//! Decoding of the model's JSON feedback reply.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::cycle::Stage;
use crate::domain::foundation::Rating;

/// Rating and comment for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFeedback {
    pub rating: Rating,
    pub feedback: String,
    /// Keys the model added beyond the requested schema, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complete feedback on a cycle: one entry per stage plus an overall note.
///
/// Decoded atomically; a reply missing any stage or the overall text is
/// rejected as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub concrete_experience: StageFeedback,
    pub reflective_observation: StageFeedback,
    pub abstract_conceptualization: StageFeedback,
    pub active_experimentation: StageFeedback,
    pub overall_feedback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedbackResult {
    /// Parses the raw message content returned by the model.
    pub fn parse(content: &str) -> Result<Self, FeedbackParseError> {
        if content.trim().is_empty() {
            return Err(FeedbackParseError::Empty);
        }
        serde_json::from_str(content).map_err(|e| FeedbackParseError::Invalid(e.to_string()))
    }

    /// Returns the feedback for one stage.
    pub fn stage(&self, stage: Stage) -> &StageFeedback {
        match stage {
            Stage::ConcreteExperience => &self.concrete_experience,
            Stage::ReflectiveObservation => &self.reflective_observation,
            Stage::AbstractConceptualization => &self.abstract_conceptualization,
            Stage::ActiveExperimentation => &self.active_experimentation,
        }
    }
}

/// Why a model reply could not be decoded into feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackParseError {
    #[error("model returned no content")]
    Empty,

    #[error("model reply is not a valid feedback object: {0}")]
    Invalid(String),
}

/// What a feedback request produced.
///
/// `Empty` only arises under [`UnparseablePolicy::Degrade`] and serializes
/// as the empty object `{}`.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Complete(FeedbackResult),
    Empty,
}

impl FeedbackOutcome {
    pub fn result(&self) -> Option<&FeedbackResult> {
        match self {
            FeedbackOutcome::Complete(result) => Some(result),
            FeedbackOutcome::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FeedbackOutcome::Empty)
    }
}

impl Serialize for FeedbackOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeedbackOutcome::Complete(result) => result.serialize(serializer),
            FeedbackOutcome::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// How to treat a model reply that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Surface the parse error to the caller.
    #[default]
    Fail,
    /// Answer with the explicit empty result.
    Degrade,
}

impl UnparseablePolicy {
    /// Decodes reply content under this policy. Missing content is treated
    /// like an empty string.
    pub fn decode(&self, content: Option<&str>) -> Result<FeedbackOutcome, FeedbackParseError> {
        match FeedbackResult::parse(content.unwrap_or_default()) {
            Ok(result) => Ok(FeedbackOutcome::Complete(result)),
            Err(_) if *self == UnparseablePolicy::Degrade => Ok(FeedbackOutcome::Empty),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_reply() -> Value {
        json!({
            "concreteExperience": {"rating": 8, "feedback": "Vivid description."},
            "reflectiveObservation": {"rating": 6, "feedback": "Go deeper."},
            "abstractConceptualization": {"rating": 7, "feedback": "Good theory."},
            "activeExperimentation": {"rating": 9, "feedback": "Clear plan."},
            "overallFeedback": "Well connected stages."
        })
    }

    #[test]
    fn parses_well_formed_reply() {
        let result = FeedbackResult::parse(&valid_reply().to_string()).unwrap();
        assert_eq!(result.stage(Stage::ActiveExperimentation).rating.value(), 9);
        assert_eq!(result.overall_feedback, "Well connected stages.");
    }

    #[test]
    fn well_formed_reply_passes_through_unchanged() {
        let mut reply = valid_reply();
        reply["confidence"] = json!("high");
        reply["concreteExperience"]["resources"] = json!(["Thinking in React"]);

        let result = FeedbackResult::parse(&reply.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), reply);
    }

    #[test]
    fn rejects_empty_content() {
        assert_eq!(FeedbackResult::parse("  "), Err(FeedbackParseError::Empty));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            FeedbackResult::parse("Sure! Here is your feedback"),
            Err(FeedbackParseError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_missing_stage() {
        let mut reply = valid_reply();
        reply.as_object_mut().unwrap().remove("reflectiveObservation");
        assert!(FeedbackResult::parse(&reply.to_string()).is_err());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut reply = valid_reply();
        reply["concreteExperience"]["rating"] = json!(11);
        assert!(FeedbackResult::parse(&reply.to_string()).is_err());
    }

    #[test]
    fn rejects_fractional_rating() {
        let mut reply = valid_reply();
        reply["concreteExperience"]["rating"] = json!(7.5);
        assert!(FeedbackResult::parse(&reply.to_string()).is_err());
    }

    #[test]
    fn fail_policy_surfaces_errors() {
        let err = UnparseablePolicy::Fail.decode(Some("not json")).unwrap_err();
        assert!(matches!(err, FeedbackParseError::Invalid(_)));
        assert_eq!(
            UnparseablePolicy::Fail.decode(None),
            Err(FeedbackParseError::Empty)
        );
    }

    #[test]
    fn degrade_policy_yields_empty_object() {
        let outcome = UnparseablePolicy::Degrade.decode(Some("not json")).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({}));
    }

    #[test]
    fn degrade_policy_keeps_valid_replies() {
        let content = valid_reply().to_string();
        let outcome = UnparseablePolicy::Degrade.decode(Some(&content)).unwrap();
        assert_eq!(serde_json::to_value(&outcome).unwrap(), valid_reply());
    }

    #[test]
    fn policy_deserializes_lowercase() {
        let policy: UnparseablePolicy = serde_json::from_str("\"degrade\"").unwrap();
        assert_eq!(policy, UnparseablePolicy::Degrade);
        assert_eq!(UnparseablePolicy::default(), UnparseablePolicy::Fail);
    }
}
