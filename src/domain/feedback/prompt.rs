//! Coaching prompt assembly.

use crate::domain::cycle::{CycleContent, LearningCycle, Stage};

/// System message framing the model as a Kolb learning coach.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert learning coach who specializes in Kolb's Experiential Learning Cycle. Your goal is to provide constructive, actionable feedback to help learners improve their learning process.";

/// Text substituted for the skill name when a cycle has no skill.
pub const SKILL_PLACEHOLDER: &str = "Not specified";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A validated feedback request: cycle text plus an optional skill name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    content: CycleContent,
    skill_name: Option<String>,
}

impl FeedbackRequest {
    /// Creates a request. An empty skill name is treated as no skill.
    pub fn new(content: CycleContent, skill_name: Option<String>) -> Self {
        Self {
            content,
            skill_name: skill_name.filter(|name| !name.is_empty()),
        }
    }

    /// Builds a request for a stored cycle.
    pub fn for_cycle(cycle: &LearningCycle, skill_name: Option<&str>) -> Self {
        Self::new(cycle.content().clone(), skill_name.map(str::to_string))
    }

    pub fn content(&self) -> &CycleContent {
        &self.content
    }

    pub fn skill_name(&self) -> Option<&str> {
        self.skill_name.as_deref()
    }

    /// Renders the user prompt sent to the model.
    pub fn render_prompt(&self) -> String {
        let c = &self.content;
        format!(
            r#"Please analyze the following learning cycle entries based on Kolb's Experiential Learning Cycle and provide feedback.
The learning cycle consists of four stages: Concrete Experience, Reflective Observation, Abstract Conceptualization, and Active Experimentation.

Learning Cycle Title: {title}
Skill: {skill}

Concrete Experience: {ce}

Reflective Observation: {ro}

Abstract Conceptualization: {ac}

Active Experimentation: {ae}

For each stage, please:
1. Rate the entry on a scale of 1-10
2. Provide specific feedback on what was done well
3. Suggest improvements or questions to consider
4. Recommend resources or next steps if applicable

Also provide an overall evaluation of the learning cycle and how well the stages connect to each other.
Format your response in JSON with the following structure:
{{
  "concreteExperience": {{ "rating": number, "feedback": string }},
  "reflectiveObservation": {{ "rating": number, "feedback": string }},
  "abstractConceptualization": {{ "rating": number, "feedback": string }},
  "activeExperimentation": {{ "rating": number, "feedback": string }},
  "overallFeedback": string
}}"#,
            title = c.title(),
            skill = self.skill_name().unwrap_or(SKILL_PLACEHOLDER),
            ce = c.stage(Stage::ConcreteExperience),
            ro = c.stage(Stage::ReflectiveObservation),
            ac = c.stage(Stage::AbstractConceptualization),
            ae = c.stage(Stage::ActiveExperimentation),
        )
    }
}

/// Model parameters for one feedback generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackParameters {
    pub model: String,
    /// `None` leaves sampling temperature to the provider default.
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_instruction: String,
}

impl FeedbackParameters {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }
}

impl Default for FeedbackParameters {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn content(title: &str, ce: &str, ro: &str, ac: &str, ae: &str) -> CycleContent {
        CycleContent::new(title, ce, ro, ac, ae).unwrap()
    }

    fn occurrences(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn prompt_uses_placeholder_without_skill() {
        let request = FeedbackRequest::new(content("T", "a", "b", "c", "d"), None);
        assert!(request.render_prompt().contains("Skill: Not specified"));
    }

    #[test]
    fn empty_skill_name_falls_back_to_placeholder() {
        let request = FeedbackRequest::new(content("T", "a", "b", "c", "d"), Some(String::new()));
        assert!(request.skill_name().is_none());
        assert!(request.render_prompt().contains("Skill: Not specified"));
    }

    #[test]
    fn prompt_includes_skill_name() {
        let request =
            FeedbackRequest::new(content("T", "a", "b", "c", "d"), Some("React".to_string()));
        let prompt = request.render_prompt();
        assert!(prompt.contains("Skill: React"));
        assert!(!prompt.contains(SKILL_PLACEHOLDER));
    }

    #[test]
    fn prompt_requests_json_schema_for_every_stage() {
        let prompt = FeedbackRequest::new(content("T", "a", "b", "c", "d"), None).render_prompt();
        for stage in Stage::ALL {
            assert!(prompt.contains(&format!(
                "\"{}\": {{ \"rating\": number, \"feedback\": string }}",
                stage.key()
            )));
        }
        assert!(prompt.contains("\"overallFeedback\": string"));
        assert!(prompt.contains("Rate the entry on a scale of 1-10"));
    }

    #[test]
    fn worked_example_values_appear_once() {
        let (ce, ro, ac, ae) = ("a".repeat(10), "b".repeat(10), "c".repeat(10), "d".repeat(10));
        let prompt = FeedbackRequest::new(content("X", &ce, &ro, &ac, &ae), None).render_prompt();

        for value in ["X", ce.as_str(), ro.as_str(), ac.as_str(), ae.as_str()] {
            assert_eq!(occurrences(&prompt, value), 1, "value {:?}", value);
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let request = FeedbackRequest::new(content("T", "a", "b", "c", "d"), Some("Go".into()));
        assert_eq!(request.render_prompt(), request.render_prompt());
    }

    #[test]
    fn default_parameters_match_coaching_defaults() {
        let params = FeedbackParameters::default();
        assert_eq!(params.model, DEFAULT_MODEL);
        assert_eq!(params.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(params.system_instruction, SYSTEM_INSTRUCTION);
        assert!(params.max_tokens.is_none());
    }

    // Values are wrapped in markers absent from the template so a value can
    // neither match template text nor another value.
    fn marked(tag: &'static str) -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!?']{0,60}".prop_map(move |body| format!("<<{}|{}>>", tag, body))
    }

    proptest! {
        #[test]
        fn every_input_value_appears_verbatim_exactly_once(
            title in marked("title"),
            ce in marked("ce"),
            ro in marked("ro"),
            ac in marked("ac"),
            ae in marked("ae"),
            skill in proptest::option::of(marked("skill")),
        ) {
            let request = FeedbackRequest::new(
                content(&title, &ce, &ro, &ac, &ae),
                skill.clone(),
            );
            let prompt = request.render_prompt();

            for value in [&title, &ce, &ro, &ac, &ae] {
                prop_assert_eq!(occurrences(&prompt, value), 1);
            }
            match skill {
                Some(name) => prop_assert_eq!(occurrences(&prompt, &name), 1),
                None => prop_assert_eq!(occurrences(&prompt, SKILL_PLACEHOLDER), 1),
            }
        }
    }
}
