//! Bearer authentication middleware
//!
//! Extracts the token from the Authorization header, validates it with the
//! configured [`BearerAuthenticator`] and records the outcome in request
//! extensions. It never rejects a request: anonymous routes stay reachable
//! with a missing or bad token, and protected routes are rejected later by
//! the authorization middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use docgate_auth::{extract_bearer_token, AuthError, BearerAuthenticator};
use std::sync::Arc;
use tracing::debug;

/// Authentication state shared across middleware instances
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn BearerAuthenticator>,
}

impl AuthState {
    pub fn new(authenticator: Arc<dyn BearerAuthenticator>) -> Self {
        Self { authenticator }
    }
}

/// Why a presented credential did not authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Authorization header is not `Bearer <token>`
    MalformedHeader,
    /// Token was presented but rejected
    Rejected(AuthError),
}

impl AuthFailure {
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::MalformedHeader => "INVALID_AUTH_FORMAT",
            AuthFailure::Rejected(e) => e.code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            AuthFailure::MalformedHeader => {
                "Invalid Authorization header format. Expected 'Bearer <token>'".to_string()
            }
            AuthFailure::Rejected(e) => format!("Invalid or expired token: {}", e),
        }
    }
}

/// Authentication middleware
///
/// On success inserts a [`docgate_auth::Principal`] into request extensions,
/// on failure an [`AuthFailure`]. Requests without an Authorization header
/// pass through untouched.
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().map(str::to_owned));

    match header_value {
        None => {
            debug!("No Authorization header, continuing anonymously");
        }
        Some(Err(_)) => {
            debug!("Authorization header is not valid ASCII");
            request.extensions_mut().insert(AuthFailure::MalformedHeader);
        }
        Some(Ok(value)) => match extract_bearer_token(&value) {
            None => {
                debug!("Authorization header does not carry a bearer token");
                request.extensions_mut().insert(AuthFailure::MalformedHeader);
            }
            Some(token) => match state.authenticator.authenticate(token).await {
                Ok(principal) => {
                    debug!("Authenticated subject {}", principal.subject);
                    request.extensions_mut().insert(principal);
                }
                Err(e) => {
                    debug!("Bearer token rejected: {}", e);
                    request.extensions_mut().insert(AuthFailure::Rejected(e));
                }
            },
        },
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use chrono::Duration;
    use docgate_auth::{JwtClaims, JwtValidator, Principal};
    use tower::ServiceExt; // For oneshot()

    const SECRET: &[u8] = b"test-secret-key";

    // Reports what authentication left in the request extensions
    async fn inspect(request: Request<Body>) -> String {
        if let Some(principal) = request.extensions().get::<Principal>() {
            format!("principal:{}", principal.subject)
        } else if let Some(failure) = request.extensions().get::<AuthFailure>() {
            format!("failure:{}", failure.code())
        } else {
            "anonymous".to_string()
        }
    }

    fn create_test_app() -> Router {
        let state = Arc::new(AuthState::new(Arc::new(JwtValidator::new(SECRET))));

        Router::new()
            .route("/inspect", get(inspect))
            .layer(middleware::from_fn_with_state(state, authenticate))
    }

    async fn call(app: Router, authorization: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/inspect");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }

        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_sets_principal() {
        let claims = JwtClaims::new("user-123".to_string(), Duration::hours(1));
        let token = JwtValidator::encode(SECRET, &claims).unwrap();

        let result = call(create_test_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(result, "principal:user-123");
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        assert_eq!(call(create_test_app(), None).await, "anonymous");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_recorded_as_malformed() {
        let result = call(create_test_app(), Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(result, "failure:INVALID_AUTH_FORMAT");
    }

    #[tokio::test]
    async fn test_wrong_secret_recorded_as_invalid() {
        let claims = JwtClaims::new("user-123".to_string(), Duration::hours(1));
        let token = JwtValidator::encode(b"wrong-secret-key", &claims).unwrap();

        let result = call(create_test_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(result, "failure:INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_expired_token_recorded_as_expired() {
        let claims = JwtClaims::new("user-123".to_string(), Duration::seconds(-10));
        let token = JwtValidator::encode(SECRET, &claims).unwrap();

        let result = call(create_test_app(), Some(&format!("Bearer {}", token))).await;
        assert_eq!(result, "failure:TOKEN_EXPIRED");
    }
}
