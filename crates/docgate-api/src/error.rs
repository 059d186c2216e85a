//! Error types for server setup

use std::net::SocketAddr;

use docgate_auth::JwtError;
use thiserror::Error;

/// Errors raised while registering API documentation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocsError {
    #[error("security scheme '{0}' is already registered")]
    DuplicateScheme(String),
}

/// Errors raised while building or running the API server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("documentation setup failed: {0}")]
    Docs(#[from] DocsError),

    #[error("invalid signing key: {0}")]
    SigningKey(#[from] JwtError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}
