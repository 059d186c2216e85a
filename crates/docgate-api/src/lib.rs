//! docgate HTTP API
//!
//! Publishes an OpenAPI document with a single `Bearer` security scheme,
//! serves the Swagger UI, and runs requests through bearer authentication
//! followed by authorization on protected routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa_swagger_ui::SwaggerUi;

use docgate_auth::BearerAuthenticator;

pub use config::{ApiServerConfig, AuthSettings};
pub use error::{ApiError, DocsError};

/// Application state shared across handlers
pub struct AppState {
    /// Name of the active bearer handler
    pub auth_scheme: &'static str,
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
    authenticator: Arc<dyn BearerAuthenticator>,
    openapi: utoipa::openapi::OpenApi,
}

impl ApiServer {
    /// Create a new API server
    ///
    /// Validates the documentation paths, builds the bearer handler from the
    /// auth settings and registers the security scheme with the API document.
    pub fn new(config: ApiServerConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let authenticator = config.auth.authenticator()?;
        let openapi = openapi::build_openapi()?;

        let state = Arc::new(AppState {
            auth_scheme: authenticator.scheme(),
        });

        Ok(Self {
            config,
            state,
            authenticator,
            openapi,
        })
    }

    /// The API document served by this server
    pub fn openapi(&self) -> &utoipa::openapi::OpenApi {
        &self.openapi
    }

    /// Build the router with all routes
    ///
    /// Pipeline order: routes, OpenAPI JSON, Swagger UI, authentication
    /// (every route), authorization (protected routes only).
    pub fn build_router(&self) -> Router {
        let auth_state = Arc::new(middleware::AuthState::new(self.authenticator.clone()));

        // Build PUBLIC routes (no authorization required)
        let public_router = Router::new()
            .route("/", get(handlers::hello_world))
            .route("/api/health", get(handlers::health_check))
            .with_state(self.state.clone());

        // Build PROTECTED routes (require an authenticated caller)
        let protected_router = Router::new()
            .route("/api/me", get(handlers::whoami))
            .route_layer(axum_middleware::from_fn(middleware::require_authorization))
            .with_state(self.state.clone());

        let api_router = public_router.merge(protected_router);

        // SwaggerUi serves both the UI and the JSON document
        let router = api_router.merge(
            SwaggerUi::new(self.config.swagger_ui_path.clone())
                .url(self.config.openapi_path.clone(), self.openapi.clone()),
        );

        // Authentication wraps every route so authorization can read its result
        router
            .layer(axum_middleware::from_fn_with_state(
                auth_state,
                middleware::authenticate,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), ApiError> {
        let router = self.build_router();
        let addr = self.config.bind_addr;

        info!("Starting API server on {}", addr);
        info!("OpenAPI document: http://{}{}", addr, self.config.openapi_path);
        info!("Swagger UI: http://{}{}", addr, self.config.swagger_ui_path);
        info!("Bearer authentication: {}", self.state.auth_scheme);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ApiError::Bind { addr, source })?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ApiError::Server)?;

        info!("API server stopped");
        Ok(())
    }
}

/// Convenience function to create and start an API server
pub async fn run_api_server(config: ApiServerConfig) -> Result<(), ApiError> {
    ApiServer::new(config)?.start().await
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping API server...");
        }
        Err(err) => {
            error!("Error listening for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
