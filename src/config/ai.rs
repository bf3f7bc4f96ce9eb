//! AI feedback model configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::feedback::{
    FeedbackParameters, UnparseablePolicy, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

use super::error::ValidationError;

/// Chat-completion model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key; required while AI feedback is enabled
    pub openai_api_key: Option<SecretString>,

    /// API base URL (override for proxies and tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Leave temperature out of requests so the provider default applies
    #[serde(default)]
    pub omit_temperature: bool,

    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for transient provider errors
    #[serde(default)]
    pub max_retries: u32,

    /// Handling of replies that are not valid feedback JSON
    #[serde(default)]
    pub unparseable: UnparseablePolicy,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Temperature sent with requests, if any
    pub fn temperature(&self) -> Option<f32> {
        (!self.omit_temperature).then_some(self.temperature)
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Model parameters for feedback generation
    pub fn feedback_parameters(&self) -> FeedbackParameters {
        FeedbackParameters::new(&self.model)
            .with_temperature(self.temperature())
            .with_max_tokens(self.max_tokens)
    }

    /// Validate AI configuration
    ///
    /// The API key is only required when feedback generation is enabled.
    pub fn validate(&self, feedback_enabled: bool) -> Result<(), ValidationError> {
        if feedback_enabled && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 5 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            omit_temperature: false,
            max_tokens: None,
            timeout_secs: default_timeout(),
            max_retries: 0,
            unparseable: UnparseablePolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout() -> u64 {
    60
}
