//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Identity provider configuration (OpenID Connect issuer)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token issuer URL; must match the `iss` claim exactly
    pub issuer_url: String,

    /// Expected `aud` claim; audience is not checked when unset
    pub audience: Option<String>,

    /// JWKS endpoint; defaults to `{issuer_url}/.well-known/jwks.json`
    pub jwks_url: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Resolved JWKS endpoint URL
    pub fn jwks_endpoint(&self) -> String {
        match &self.jwks_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "{}/.well-known/jwks.json",
                self.issuer_url.trim_end_matches('/')
            ),
        }
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the issuer URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER_URL"));
        }
        if *environment == Environment::Production && !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer_url: String::new(),
            audience: None,
            jwks_url: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.jwks_cache_ttl(), Duration::from_secs(3600));
        assert!(config.audience.is_none());
    }

    #[test]
    fn test_jwks_endpoint_derived_from_issuer() {
        let config = AuthConfig {
            issuer_url: "https://clerk.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.jwks_endpoint(),
            "https://clerk.example.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_jwks_endpoint_override() {
        let config = AuthConfig {
            issuer_url: "https://clerk.example.com".to_string(),
            jwks_url: Some("https://keys.example.com/jwks".to_string()),
            ..Default::default()
        };
        assert_eq!(config.jwks_endpoint(), "https://keys.example.com/jwks");
    }

    #[test]
    fn test_validation_missing_issuer() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__ISSUER_URL"))
        );
    }

    #[test]
    fn test_validation_production_requires_https() {
        let config = AuthConfig {
            issuer_url: "http://localhost:9000".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::IssuerMustBeHttps)
        );
    }
}
