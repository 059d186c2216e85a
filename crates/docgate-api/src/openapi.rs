//! OpenAPI document and security scheme registration
//!
//! The document declares a single `Bearer` scheme and a global requirement
//! referencing it, so every documented operation shows up as needing a
//! bearer token. This is a documentation annotation only: enforcement is done
//! by the authorization middleware on protected routes.

use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme,
};
use utoipa::OpenApi;

use crate::error::DocsError;
use crate::{handlers, models};

/// Name under which the bearer scheme is registered
pub const BEARER_SCHEME_NAME: &str = "Bearer";

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docgate API",
        description = "HTTP API protected by JWT bearer authentication"
    ),
    paths(
        handlers::hello_world,
        handlers::health_check,
        handlers::whoami,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::CurrentUser,
            models::ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and info endpoints"),
        (name = "auth", description = "Caller identity endpoints")
    )
)]
pub struct ApiDoc;

/// Where a credential is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeLocation {
    Header,
    Query,
    Cookie,
}

/// Kind of security scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// `type: http`, `scheme: bearer`
    HttpBearer,
    /// `type: apiKey`, named field at [`SchemeLocation`]
    ApiKey,
}

/// Static description of a security scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySchemeDescriptor {
    pub name: &'static str,
    pub field_name: &'static str,
    pub location: SchemeLocation,
    pub kind: SchemeKind,
    pub bearer_format: Option<&'static str>,
    pub description: &'static str,
}

impl SecuritySchemeDescriptor {
    /// `Authorization: Bearer <jwt>`
    pub const fn bearer() -> Self {
        Self {
            name: BEARER_SCHEME_NAME,
            field_name: "Authorization",
            location: SchemeLocation::Header,
            kind: SchemeKind::HttpBearer,
            bearer_format: Some("JWT"),
            description: "JWT Authorization header using the Bearer scheme",
        }
    }

    pub fn to_security_scheme(&self) -> SecurityScheme {
        match self.kind {
            // The http scheme has no name/in fields; the header is implied
            SchemeKind::HttpBearer => {
                let mut builder = HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(self.description));
                if let Some(format) = self.bearer_format {
                    builder = builder.bearer_format(format);
                }
                SecurityScheme::Http(builder.build())
            }
            SchemeKind::ApiKey => {
                let value = ApiKeyValue::with_description(self.field_name, self.description);
                SecurityScheme::ApiKey(match self.location {
                    SchemeLocation::Header => ApiKey::Header(value),
                    SchemeLocation::Query => ApiKey::Query(value),
                    SchemeLocation::Cookie => ApiKey::Cookie(value),
                })
            }
        }
    }

    /// Requirement that references this scheme with no scopes
    pub fn requirement(&self) -> SecurityRequirementDescriptor {
        SecurityRequirementDescriptor {
            scheme: self.name,
            scopes: Vec::new(),
        }
    }
}

/// Reference to a registered scheme plus the scopes it demands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirementDescriptor {
    pub scheme: &'static str,
    pub scopes: Vec<String>,
}

impl SecurityRequirementDescriptor {
    pub fn to_security_requirement(&self) -> SecurityRequirement {
        SecurityRequirement::new(self.scheme, self.scopes.clone())
    }
}

/// Register `scheme` and a global requirement on it
///
/// Fails if a scheme with the same name is already registered.
pub fn add_security<'a>(
    openapi: &'a mut utoipa::openapi::OpenApi,
    scheme: &SecuritySchemeDescriptor,
) -> Result<&'a mut utoipa::openapi::OpenApi, DocsError> {
    let components = openapi.components.get_or_insert_with(Default::default);
    if components.security_schemes.contains_key(scheme.name) {
        return Err(DocsError::DuplicateScheme(scheme.name.to_string()));
    }
    components.add_security_scheme(scheme.name, scheme.to_security_scheme());

    openapi
        .security
        .get_or_insert_with(Vec::new)
        .push(scheme.requirement().to_security_requirement());

    Ok(openapi)
}

/// Register the `Bearer` scheme and its global requirement
pub fn add_bearer_security(
    openapi: &mut utoipa::openapi::OpenApi,
) -> Result<&mut utoipa::openapi::OpenApi, DocsError> {
    add_security(openapi, &SecuritySchemeDescriptor::bearer())
}

/// Generate the API document with bearer security registered
pub fn build_openapi() -> Result<utoipa::openapi::OpenApi, DocsError> {
    let mut openapi = ApiDoc::openapi();
    add_bearer_security(&mut openapi)?;
    Ok(openapi)
}
