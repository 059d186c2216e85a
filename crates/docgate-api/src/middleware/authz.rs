//! Authorization middleware for protected routes
//!
//! Must be layered inside [`super::authenticate`]: it only looks at what
//! authentication recorded and never reads the Authorization header itself.
//! The global requirement carries no scopes, so any authenticated caller is
//! allowed through.

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use docgate_auth::Principal;
use tracing::debug;

use super::authn::AuthFailure;
use crate::models::ErrorResponse;

/// Reject requests that did not authenticate
///
/// # Errors
/// Returns 401 Unauthorized with a `WWW-Authenticate: Bearer` challenge if:
/// - No Authorization header was sent
/// - The header is not in `Bearer <token>` format
/// - The token is invalid or expired
pub async fn require_authorization(request: Request, next: Next) -> Response {
    if request.extensions().get::<Principal>().is_some() {
        return next.run(request).await;
    }

    let failure = request.extensions().get::<AuthFailure>().cloned();
    debug!(
        "Rejecting unauthenticated request to {}",
        request.uri().path()
    );

    unauthorized(failure.as_ref())
}

fn unauthorized(failure: Option<&AuthFailure>) -> Response {
    let (challenge, body) = match failure {
        None => (
            HeaderValue::from_static("Bearer"),
            ErrorResponse::new("Missing bearer token in Authorization header", "MISSING_TOKEN"),
        ),
        Some(failure) => (
            HeaderValue::from_static(r#"Bearer error="invalid_token""#),
            ErrorResponse::new(failure.message(), failure.code()),
        ),
    };

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, challenge)],
        Json(body),
    )
        .into_response()
}
