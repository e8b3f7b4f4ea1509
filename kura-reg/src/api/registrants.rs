//! Member and aspirant record endpoints
//!
//! One set of handlers serves both record kinds; the route attaches its
//! [`RecordKind`] as a request extension.
//!
//! | Method       | Auth  | Success                        |
//! |--------------|-------|--------------------------------|
//! | GET          | admin | 200, records newest first      |
//! | POST         | none  | 201, created record            |
//! | PUT / PATCH  | admin | 200, updated record            |
//! | DELETE ?id=  | admin | 200                            |
//! | other        |       | 405                            |
//!
//! HEAD is answered with 405 too; axum would otherwise serve it from the GET
//! handler.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, MethodRouter},
    Extension, Json,
};
use kura_common::db::{RecordKind, Registrant};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::api::auth::{auth_middleware, AdminSession};
use crate::validation::{check_location, RegistrationPayload};
use crate::{db, ApiError, ApiResult, AppState};

/// Query parameters for DELETE
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// `{ "message": ..., "<kind>": record }`
fn record_body(message: String, kind: RecordKind, record: &Registrant) -> ApiResult<Json<Value>> {
    let record = serde_json::to_value(record)
        .map_err(|e| ApiError::Internal(format!("Failed to serialise {}: {}", kind, e)))?;

    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(message));
    body.insert(kind.response_key().to_string(), record);
    Ok(Json(Value::Object(body)))
}

fn read_payload(
    payload: Result<Json<RegistrationPayload>, JsonRejection>,
) -> ApiResult<RegistrationPayload> {
    payload.map(|Json(p)| p).map_err(|rejection| {
        debug!("Rejected request body: {}", rejection);
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })
}

/// GET - list all records of this kind, newest first
pub async fn list_records(
    State(state): State<AppState>,
    Extension(kind): Extension<RecordKind>,
    Extension(_session): Extension<AdminSession>,
) -> ApiResult<Json<Vec<Registrant>>> {
    let records = db::list_all(&state.db, kind).await?;
    Ok(Json(records))
}

/// POST - public registration
///
/// Order of checks: body shape, required fields, location triple, then
/// national id uniqueness. The catalog is only loaded once the fields are
/// known to be present.
pub async fn create_record(
    State(state): State<AppState>,
    Extension(kind): Extension<RecordKind>,
    payload: Result<Json<RegistrationPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let payload = read_payload(payload)?;
    let form = payload.into_form(kind)?;
    check_location(&form, &*state.catalog.get().await?)?;

    let created = db::create_unique(&state.db, kind, &form).await?;

    let body = record_body(format!("{} registered successfully", kind.label()), kind, &created)?;
    Ok((StatusCode::CREATED, body))
}

/// PUT / PATCH - replace a record's fields; body carries the id
pub async fn update_record(
    State(state): State<AppState>,
    Extension(kind): Extension<RecordKind>,
    Extension(session): Extension<AdminSession>,
    payload: Result<Json<RegistrationPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let payload = read_payload(payload)?;
    let (id, form) = payload.into_update(kind)?;
    check_location(&form, &*state.catalog.get().await?)?;

    let updated = db::update_by_id(&state.db, kind, &id, &form).await?;
    info!(verified = session.verified, "Admin updated {} {}", kind, id);

    record_body(format!("{} updated successfully", kind.label()), kind, &updated)
}

/// DELETE ?id= - remove a record
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(kind): Extension<RecordKind>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<Value>> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("ID is required".to_string()))?;

    db::delete_by_id(&state.db, kind, &id).await?;
    info!(verified = session.verified, "Admin deleted {} {}", kind, id);

    let mut body = Map::new();
    body.insert(
        "message".to_string(),
        Value::String(format!("{} deleted successfully", kind.label())),
    );
    Ok(Json(Value::Object(body)))
}

/// Any method without a handler on a record route
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Method router for one record kind
///
/// The admin middleware is attached before POST and HEAD are added, so it
/// wraps only GET, PUT, PATCH and DELETE.
pub fn registrant_routes(kind: RecordKind, state: AppState) -> MethodRouter<AppState> {
    get(list_records)
        .put(update_record)
        .patch(update_record)
        .delete(delete_record)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .post(create_record)
        .head(method_not_allowed)
        .fallback(method_not_allowed)
        .layer(Extension(kind))
}
