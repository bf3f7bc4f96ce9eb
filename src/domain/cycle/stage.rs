//! The four stages of Kolb's experiential learning cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the learning cycle, in the order a learner moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    ConcreteExperience,
    ReflectiveObservation,
    AbstractConceptualization,
    ActiveExperimentation,
}

impl Stage {
    /// All stages in cycle order.
    pub const ALL: [Stage; 4] = [
        Stage::ConcreteExperience,
        Stage::ReflectiveObservation,
        Stage::AbstractConceptualization,
        Stage::ActiveExperimentation,
    ];

    /// JSON key used for this stage in requests, responses and model replies.
    pub fn key(&self) -> &'static str {
        match self {
            Stage::ConcreteExperience => "concreteExperience",
            Stage::ReflectiveObservation => "reflectiveObservation",
            Stage::AbstractConceptualization => "abstractConceptualization",
            Stage::ActiveExperimentation => "activeExperimentation",
        }
    }

    /// Human-readable stage name.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::ConcreteExperience => "Concrete Experience",
            Stage::ReflectiveObservation => "Reflective Observation",
            Stage::AbstractConceptualization => "Abstract Conceptualization",
            Stage::ActiveExperimentation => "Active Experimentation",
        }
    }

    /// Short label for tab-style navigation.
    pub fn short_label(&self) -> &'static str {
        match self {
            Stage::ConcreteExperience => "Experience",
            Stage::ReflectiveObservation => "Reflection",
            Stage::AbstractConceptualization => "Conceptualization",
            Stage::ActiveExperimentation => "Experimentation",
        }
    }

    /// One-line description of what the learner writes in this stage.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::ConcreteExperience => "Your hands-on experience",
            Stage::ReflectiveObservation => "Your reflections and observations",
            Stage::AbstractConceptualization => "Your theories and conclusions",
            Stage::ActiveExperimentation => "Your plan to apply insights",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
