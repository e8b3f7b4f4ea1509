//! Location lookup endpoints backing the cascading county/constituency/ward
//! selects
//!
//! Unknown names yield empty lists, which is how a form shows "nothing
//! selected yet". Validation of a submitted triple happens on registration.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use kura_common::location::{constituencies_of, wards_of, LocationCatalog};
use serde::Deserialize;

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ConstituencyQuery {
    #[serde(default)]
    pub county: String,
}

#[derive(Debug, Deserialize)]
pub struct WardQuery {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub constituency: String,
}

/// GET /api/locations - the whole catalog in reference-file format
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Json<LocationCatalog>> {
    let catalog = state.catalog.get().await?;
    Ok(Json(catalog.as_ref().clone()))
}

/// GET /api/locations/counties
pub async fn list_counties(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let catalog = state.catalog.get().await?;
    Ok(Json(
        catalog.counties().iter().map(|c| c.name.clone()).collect(),
    ))
}

/// GET /api/locations/constituencies?county=
pub async fn list_constituencies(
    State(state): State<AppState>,
    Query(query): Query<ConstituencyQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let catalog = state.catalog.get().await?;
    Ok(Json(
        constituencies_of(&catalog, &query.county)
            .iter()
            .map(|k| k.name.clone())
            .collect(),
    ))
}

/// GET /api/locations/wards?county=&constituency=
pub async fn list_wards(
    State(state): State<AppState>,
    Query(query): Query<WardQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let catalog = state.catalog.get().await?;
    let constituencies = constituencies_of(&catalog, &query.county);
    Ok(Json(wards_of(constituencies, &query.constituency).to_vec()))
}

/// Build location lookup routes
pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/api/locations", get(get_catalog))
        .route("/api/locations/counties", get(list_counties))
        .route("/api/locations/constituencies", get(list_constituencies))
        .route("/api/locations/wards", get(list_wards))
}
