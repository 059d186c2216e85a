//! Pluggable bearer token authentication

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jwt::{Audience, JwtClaims};

/// Authentication errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("No signing key configured")]
    NotConfigured,
}

impl AuthError {
    /// Machine-readable code reported to API clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::NotConfigured => "AUTH_NOT_CONFIGURED",
        }
    }
}

/// Identity of an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Subject claim
    pub subject: String,
    /// Issuer, if the token carried one
    pub issuer: Option<String>,
    /// Audiences the token was issued for (empty if none)
    pub audience: Vec<String>,
    /// Expiration (unix timestamp)
    pub expires_at: i64,
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Self {
            subject: claims.sub,
            issuer: claims.iss,
            audience: claims.aud.map(Audience::into_vec).unwrap_or_default(),
            expires_at: claims.exp,
        }
    }
}

/// Validates a bearer token and resolves it to a [`Principal`]
#[async_trait]
pub trait BearerAuthenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;

    /// Short name of the handler (for logging)
    fn scheme(&self) -> &'static str;
}

/// Authenticator used when no key material is configured
///
/// Every token is rejected, so protected routes are unreachable while
/// anonymous routes keep working.
pub struct RejectAllAuthenticator;

#[async_trait]
impl BearerAuthenticator for RejectAllAuthenticator {
    async fn authenticate(&self, _token: &str) -> Result<Principal, AuthError> {
        Err(AuthError::NotConfigured)
    }

    fn scheme(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reject_all_authenticator() {
        let auth = RejectAllAuthenticator;
        assert_eq!(
            auth.authenticate("anything").await,
            Err(AuthError::NotConfigured)
        );
        assert_eq!(auth.scheme(), "none");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::TokenExpired.code(), "TOKEN_EXPIRED");
        assert_eq!(
            AuthError::InvalidToken("bad".to_string()).code(),
            "INVALID_TOKEN"
        );
    }
}
