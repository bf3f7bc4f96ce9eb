//! Session validation port for JWT token validation.
//!
//! This port defines the contract for validating access tokens and extracting
//! user identity. It is provider-agnostic: the JWKS adapter serves any
//! OpenID Connect issuer and a mock serves tests.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Validate issuer, audience (when configured) and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a JWT access token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TestSessionValidator {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    impl TestSessionValidator {
        fn new() -> Self {
            Self {
                tokens: RwLock::new(HashMap::new()),
            }
        }

        fn add_valid_token(&self, token: &str, user: AuthenticatedUser) {
            self.tokens.write().unwrap().insert(token.to_string(), user);
        }
    }

    #[async_trait]
    impl SessionValidator for TestSessionValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn returns_user_for_valid_token() {
        let validator = TestSessionValidator::new();
        validator.add_valid_token(
            "valid-token-123",
            AuthenticatedUser::new(
                UserId::new("user-123").unwrap(),
                Some("test@example.com".to_string()),
                None,
            ),
        );

        let user = validator.validate("valid-token-123").await.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email.as_deref(), Some("test@example.com"));
    }

    #[tokio::test]
    async fn returns_error_for_invalid_token() {
        let validator = TestSessionValidator::new();
        let result = validator.validate("invalid-token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn trait_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionValidator>();
    }
}
