//! API server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use docgate_auth::{BearerAuthenticator, JwtValidator, RejectAllAuthenticator};
use tracing::{info, warn};

use crate::error::ApiError;

/// Default path of the OpenAPI JSON document
pub const DEFAULT_OPENAPI_PATH: &str = "/api/openapi.json";
/// Default path of the Swagger UI
pub const DEFAULT_SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Routes served by the API itself
const API_ROUTES: &[&str] = &["/", "/api/health", "/api/me"];

/// Key material and claim checks for the JWT bearer handler
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    /// Shared secret for HS256 tokens
    pub jwt_secret: Option<String>,
    /// RSA public key (PEM) for RS256 tokens
    pub jwt_public_key_pem: Option<Vec<u8>>,
    /// Required `iss` claim
    pub issuer: Option<String>,
    /// Required `aud` claim
    pub audience: Option<String>,
}

impl AuthSettings {
    /// HS256 settings with the given secret and no claim checks
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Build the bearer handler described by these settings
    ///
    /// With no key material every token is rejected.
    pub fn authenticator(&self) -> Result<Arc<dyn BearerAuthenticator>, ApiError> {
        let validator = match (&self.jwt_secret, &self.jwt_public_key_pem) {
            (Some(_), Some(_)) => {
                return Err(ApiError::Config(
                    "configure either a JWT secret or an RSA public key, not both".to_string(),
                ))
            }
            (Some(secret), None) => {
                if secret.is_empty() {
                    return Err(ApiError::Config("JWT secret must not be empty".to_string()));
                }
                JwtValidator::new(secret.as_bytes())
            }
            (None, Some(pem)) => JwtValidator::from_rsa_pem(pem)?,
            (None, None) => {
                warn!("No JWT signing key configured; all bearer tokens will be rejected");
                return Ok(Arc::new(RejectAllAuthenticator));
            }
        };

        let validator = match &self.issuer {
            Some(issuer) => validator.with_issuer(issuer.clone()),
            None => validator,
        };
        let validator = match &self.audience {
            Some(audience) => validator.with_audience(audience.clone()),
            None => validator,
        };

        info!("JWT bearer authentication enabled ({:?})", validator.algorithm());
        Ok(Arc::new(validator))
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Path serving the OpenAPI JSON document
    pub openapi_path: String,
    /// Path serving the Swagger UI
    pub swagger_ui_path: String,
    /// Bearer authentication settings
    pub auth: AuthSettings,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            openapi_path: DEFAULT_OPENAPI_PATH.to_string(),
            swagger_ui_path: DEFAULT_SWAGGER_UI_PATH.to_string(),
            auth: AuthSettings::default(),
        }
    }
}

impl ApiServerConfig {
    /// Check the documentation paths before they are handed to the router
    ///
    /// Both must be absolute, free of route parameters, distinct, and clear of
    /// the API's own routes. The Swagger UI owns everything below its path.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_path("OpenAPI path", &self.openapi_path)?;
        check_path("Swagger UI path", &self.swagger_ui_path)?;

        let ui_path = self.swagger_ui_path.trim_end_matches('/');
        if ui_path.is_empty() {
            return Err(ApiError::Config("Swagger UI path must not be `/`".to_string()));
        }

        if API_ROUTES.contains(&self.openapi_path.as_str()) {
            return Err(ApiError::Config(format!(
                "OpenAPI path {} collides with an API route",
                self.openapi_path
            )));
        }

        if let Some(route) = API_ROUTES.iter().find(|route| is_under(ui_path, route)) {
            return Err(ApiError::Config(format!(
                "Swagger UI path {} collides with API route {}",
                self.swagger_ui_path, route
            )));
        }

        if is_under(ui_path, &self.openapi_path) {
            return Err(ApiError::Config(format!(
                "OpenAPI path {} collides with Swagger UI path {}",
                self.openapi_path, self.swagger_ui_path
            )));
        }

        Ok(())
    }
}

fn check_path(what: &str, path: &str) -> Result<(), ApiError> {
    if !path.starts_with('/') {
        return Err(ApiError::Config(format!("{} must start with `/`: {:?}", what, path)));
    }
    if path.contains(['{', '}', '*']) || path.chars().any(char::is_whitespace) {
        return Err(ApiError::Config(format!(
            "{} contains characters not allowed in a route: {:?}",
            what, path
        )));
    }
    Ok(())
}

/// Whether `path` is `prefix` itself or lies below it
fn is_under(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.openapi_path, "/api/openapi.json");
        assert_eq!(config.swagger_ui_path, "/swagger-ui");
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_no_key_material_rejects_everything() {
        let auth = AuthSettings::default().authenticator().unwrap();
        assert_eq!(auth.scheme(), "none");
    }

    #[test]
    fn test_secret_enables_jwt() {
        let auth = AuthSettings::with_secret("s3cret").authenticator().unwrap();
        assert_eq!(auth.scheme(), "jwt");
    }

    #[test]
    fn test_both_keys_rejected() {
        let settings = AuthSettings {
            jwt_secret: Some("s3cret".to_string()),
            jwt_public_key_pem: Some(b"pem".to_vec()),
            ..AuthSettings::default()
        };
        assert!(matches!(settings.authenticator(), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            AuthSettings::with_secret("").authenticator(),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_bad_public_key_rejected() {
        let settings = AuthSettings {
            jwt_public_key_pem: Some(b"not a key".to_vec()),
            ..AuthSettings::default()
        };
        assert!(matches!(
            settings.authenticator(),
            Err(ApiError::SigningKey(_))
        ));
    }

    fn with_paths(openapi_path: &str, swagger_ui_path: &str) -> ApiServerConfig {
        ApiServerConfig {
            openapi_path: openapi_path.to_string(),
            swagger_ui_path: swagger_ui_path.to_string(),
            ..ApiServerConfig::default()
        }
    }

    #[test]
    fn test_default_paths_are_valid() {
        assert!(ApiServerConfig::default().validate().is_ok());
        assert!(with_paths("/openapi/v1.json", "/docs/").validate().is_ok());
    }

    #[test]
    fn test_relative_paths_rejected() {
        for (openapi, ui) in [
            ("api/openapi.json", "/swagger-ui"),
            ("/api/openapi.json", "swagger-ui"),
            ("", "/swagger-ui"),
        ] {
            assert!(
                matches!(with_paths(openapi, ui).validate(), Err(ApiError::Config(_))),
                "{openapi} / {ui} should be rejected"
            );
        }
    }

    #[test]
    fn test_route_parameters_rejected() {
        assert!(with_paths("/api/{doc}", "/swagger-ui").validate().is_err());
        assert!(with_paths("/api/openapi.json", "/docs/{*rest}").validate().is_err());
    }

    #[test]
    fn test_paths_colliding_with_api_routes_rejected() {
        assert!(with_paths("/api/health", "/swagger-ui").validate().is_err());
        assert!(with_paths("/api/me", "/swagger-ui").validate().is_err());
        assert!(with_paths("/", "/swagger-ui").validate().is_err());
        assert!(with_paths("/api/openapi.json", "/").validate().is_err());
        assert!(with_paths("/api/openapi.json", "/api/health").validate().is_err());
        assert!(with_paths("/openapi.json", "/api").validate().is_err());
    }

    #[test]
    fn test_openapi_path_inside_swagger_ui_rejected() {
        assert!(with_paths("/docs", "/docs").validate().is_err());
        assert!(with_paths("/docs/openapi.json", "/docs/").validate().is_err());
        // Shared prefix without a path separator is fine
        assert!(with_paths("/docs-openapi.json", "/docs").validate().is_ok());
    }
}
