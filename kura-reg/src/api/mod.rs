//! HTTP API handlers for kura-reg

pub mod auth;
pub mod health;
pub mod locations;
pub mod registrants;

pub use auth::{auth_middleware, AdminSession};
pub use health::health_routes;
pub use locations::location_routes;
pub use registrants::registrant_routes;
