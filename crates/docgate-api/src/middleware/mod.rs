//! API Middleware
//!
//! Authentication runs on every request and records what it found;
//! authorization guards protected routes and only reads that record.

pub mod authn;
pub mod authz;

pub use authn::{authenticate, AuthFailure, AuthState};
pub use authz::require_authorization;
