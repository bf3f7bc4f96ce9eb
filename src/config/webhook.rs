//! Identity webhook configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Signed identity-provider webhook settings
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// `whsec_`-prefixed signing secret; webhook calls fail while unset
    pub signing_secret: Option<SecretString>,

    /// Maximum accepted age of a webhook timestamp, in seconds
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: u64,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = &self.signing_secret {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidWebhookSecret);
            }
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            tolerance_secs: default_tolerance(),
        }
    }
}

fn default_tolerance() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::default();
        assert!(config.signing_secret.is_none());
        assert_eq!(config.tolerance_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_prefix_is_checked() {
        let config = WebhookConfig {
            signing_secret: Some(SecretString::new("secret".to_string())),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWebhookSecret));

        let config = WebhookConfig {
            signing_secret: Some(SecretString::new("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
