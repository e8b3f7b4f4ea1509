//! Shared HTTP API functionality
//!
//! Pure functions only; each service wraps them in framework-specific
//! middleware.

pub mod auth;

pub use auth::{bearer_token, AdminToken, AuthFailure};
