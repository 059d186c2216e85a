//! Bearer token authentication for the docgate API
//!
//! Callers present `Authorization: Bearer <token>`. This crate extracts the
//! token from the header and validates it as a JWT, producing a [`Principal`]
//! the HTTP layer can attach to the request.

pub mod bearer;
pub mod jwt;
pub mod validator;

pub use bearer::{extract_bearer_token, BEARER_PREFIX};
pub use jwt::{Audience, JwtClaims, JwtError, JwtValidator};
pub use validator::{AuthError, BearerAuthenticator, Principal, RejectAllAuthenticator};

// Re-export useful types
pub use async_trait::async_trait;
pub use jsonwebtoken::Algorithm;
