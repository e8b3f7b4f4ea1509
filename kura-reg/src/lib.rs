//! kura-reg library - member and aspirant registration service
//!
//! Exposes the router and state so integration tests can drive the service
//! without binding a socket.

use axum::Router;
use kura_common::api::AdminToken;
use kura_common::db::RecordKind;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod db;
pub mod error;
pub mod validation;

pub use crate::catalog::CatalogCache;
pub use crate::error::{ApiError, ApiResult};

/// Route serving member records
pub const MEMBERS_PATH: &str = "/api/registernewmember";
/// Route serving aspirant records
pub const ASPIRANTS_PATH: &str = "/api/aspirantnew";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Location catalog, loaded on first use
    pub catalog: CatalogCache,
    /// Admin credential; `None` disables the admin gate
    pub admin_token: Option<AdminToken>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, catalog: CatalogCache, admin_token: Option<AdminToken>) -> Self {
        Self {
            db,
            catalog,
            admin_token,
        }
    }
}

/// Build application router
///
/// Record routes gate every method except POST behind the admin middleware;
/// location lookups and health are public.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            MEMBERS_PATH,
            api::registrant_routes(RecordKind::Member, state.clone()),
        )
        .route(
            ASPIRANTS_PATH,
            api::registrant_routes(RecordKind::Aspirant, state.clone()),
        )
        .merge(api::location_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
