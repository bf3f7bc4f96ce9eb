//! OpenID Connect adapter for JWT validation against a JWKS endpoint.
//!
//! Implements the `SessionValidator` port for hosted identity providers that
//! publish their signing keys as a JSON Web Key Set. Tokens are validated by:
//!
//! 1. Fetching (and caching) the issuer's JWKS
//! 2. Selecting the key named by the token's `kid` header
//! 3. Validating signature, issuer, expiry and, when configured, audience
//! 4. Mapping claims to the domain `AuthenticatedUser` type
//!
//! # Example
//!
//! ```ignore
//! let config = JwksConfig::new("https://clerk.example.com", "https://clerk.example.com/.well-known/jwks.json");
//! let validator = JwksSessionValidator::new(config)?;
//! let user = validator.validate("eyJ...").await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for the JWKS validator.
#[derive(Debug, Clone)]
pub struct JwksConfig {
    /// Expected `iss` claim.
    pub issuer_url: String,
    /// URL serving the signing keys.
    pub jwks_url: String,
    /// Expected `aud` claim; not checked when `None`.
    pub audience: Option<String>,
    /// How long fetched keys are trusted before refetching.
    pub cache_duration: Duration,
    /// Minimum gap between refetches triggered by an unknown `kid`.
    pub min_refresh_interval: Duration,
}

impl JwksConfig {
    pub fn new(issuer_url: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            jwks_url: jwks_url.into(),
            audience: None,
            cache_duration: Duration::from_secs(3600),
            min_refresh_interval: Duration::from_secs(30),
        }
    }

    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }
}

/// JWT claims read from identity-provider session tokens.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Audience,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }

    /// Keys can answer for `kid` without a fetch: either they contain it,
    /// or they were fetched too recently to refetch for an unknown key.
    fn serves(&self, kid: &str, min_refresh_interval: Duration) -> bool {
        !self.is_expired()
            && (self.jwks.find(kid).is_some() || self.fetched_at.elapsed() < min_refresh_interval)
    }
}

/// JWKS-backed session validator.
pub struct JwksSessionValidator {
    config: JwksConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksSessionValidator {
    /// Creates a validator. Keys are fetched lazily on first validation.
    pub fn new(config: JwksConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = &self.config.jwks_url;
        tracing::debug!(%url, "Fetching JWKS");

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    /// Returns cached keys, refetching when expired or when `kid` is unknown.
    ///
    /// Unknown-`kid` refetches are limited to one per `min_refresh_interval`,
    /// so forged tokens cannot drive traffic to the JWKS endpoint.
    async fn get_jwks(&self, kid: &str) -> Result<JwkSet, AuthError> {
        let min_refresh = self.config.min_refresh_interval;
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.serves(kid, min_refresh)) {
                return Ok(cached.jwks.clone());
            }
        }

        let mut cache = self.jwks_cache.write().await;
        // Another request may have refetched while this one waited.
        if let Some(cached) = cache.as_ref().filter(|c| c.serves(kid, min_refresh)) {
            return Ok(cached.jwks.clone());
        }

        let jwks = self.fetch_jwks().await?;
        *cache = Some(JwksCache::new(jwks.clone(), self.config.cache_duration));
        Ok(jwks)
    }

    fn find_decoding_key(kid: &str, jwks: &JwkSet) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!(kid, "No matching key found");
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(KeyAlgorithm::HS256) => Algorithm::HS256,
            Some(other) => {
                tracing::warn!(algorithm = ?other, "Unsupported algorithm");
                return Err(AuthError::InvalidToken);
            }
        };

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!(error = %e, "Failed to create decoding key");
            AuthError::InvalidToken
        })?;

        Ok((decoding_key, algorithm))
    }

    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenData<SessionClaims>, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<SessionClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl SessionValidator for JwksSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode JWT header");
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks(&kid).await?;
        let (decoding_key, algorithm) = Self::find_decoding_key(&kid, &jwks)?;
        let claims = self.validate_token(token, &decoding_key, algorithm)?.claims;

        if let Some(audience) = &self.config.audience {
            if !claims.aud.contains(audience) {
                tracing::warn!(expected = %audience, "Audience mismatch after validation");
                return Err(AuthError::InvalidToken);
            }
        }

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Empty subject in token");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.email, claims.name))
    }
}

impl std::fmt::Debug for JwksSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
