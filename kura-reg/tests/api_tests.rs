//! Integration tests for kura-reg API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Member and aspirant registration (POST) with field, location and
//!   duplicate validation
//! - Admin listing, update and delete
//! - Method handling (405)
//! - Admin token gate
//! - Location lookups and catalog failures

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use kura_common::api::AdminToken;
use kura_reg::{build_router, AppState, CatalogCache, ASPIRANTS_PATH, MEMBERS_PATH};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("county.json")
}

/// Test helper: app over a fresh database, optionally with an admin token
async fn setup_app_with(admin_token: Option<&str>, catalog_path: PathBuf) -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = kura_reg::db::init_database(&dir.path().join("kura.db"))
        .await
        .expect("Should create test database");

    let state = AppState::new(
        pool,
        CatalogCache::new(catalog_path),
        admin_token.map(AdminToken::new),
    );
    (build_router(state), dir)
}

/// Test helper: app with admin gate disabled
async fn setup_app() -> (Router, TempDir) {
    setup_app_with(None, fixture_catalog()).await
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Send a request, returning status and JSON body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

fn member(national_id: &str) -> Value {
    json!({
        "name": "Atieno Odhiambo",
        "nationalId": national_id,
        "mobile": "0712000000",
        "email": "atieno@example.com",
        "county": "Nairobi",
        "constituency": "Westlands",
        "ward": "Kitisuru"
    })
}

fn aspirant(national_id: &str, position: &str) -> Value {
    let mut body = member(national_id);
    body["position"] = json!(position);
    body
}

/// Fields a client submits, compared against a stored record
fn assert_fields_match(record: &Value, submitted: &Value) {
    for field in ["name", "nationalId", "mobile", "email", "county", "constituency", "ward"] {
        assert_eq!(record[field], submitted[field], "field {}", field);
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "kura-reg");
    assert!(body["version"].is_string());

    // Nothing has needed the catalog yet
    assert_eq!(body["catalog_loaded"], false);
    send(&app, test_request("GET", "/api/locations/counties")).await;
    let (_, body) = send(&app, test_request("GET", "/health")).await;
    assert_eq!(body["catalog_loaded"], true);
}

// =============================================================================
// Registration (POST)
// =============================================================================

#[tokio::test]
async fn test_register_member_then_list() {
    let (app, _dir) = setup_app().await;
    let submitted = member("10000001");

    let (status, body) = send(&app, json_request("POST", MEMBERS_PATH, &submitted)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Member registered successfully");
    assert_fields_match(&body["member"], &submitted);
    assert!(body["member"]["id"].is_string());
    assert!(body["member"].get("position").is_none());

    let (status, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], body["member"]);
}

#[tokio::test]
async fn test_register_member_ignores_position() {
    let (app, _dir) = setup_app().await;
    let mut submitted = member("10000002");
    submitted["position"] = json!(5);

    let (status, body) = send(&app, json_request("POST", MEMBERS_PATH, &submitted)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["member"].get("position").is_none());
}

#[tokio::test]
async fn test_register_aspirant_with_position() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", ASPIRANTS_PATH, &aspirant("20000001", "Women Rep")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Aspirant registered successfully");
    assert_eq!(body["aspirant"]["position"], "Women Rep");

    // Aspirants and members are separate collections
    let (_, members) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(members, json!([]));
}

#[tokio::test]
async fn test_register_aspirant_requires_valid_position() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, json_request("POST", ASPIRANTS_PATH, &member("20000002"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = send(
        &app,
        json_request("POST", ASPIRANTS_PATH, &aspirant("20000002", "Chief")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid position: Chief");
}

#[tokio::test]
async fn test_register_missing_field() {
    let (app, _dir) = setup_app().await;

    let mut body = member("10000002");
    body.as_object_mut().unwrap().remove("email");
    let (status, response) = send(&app, json_request("POST", MEMBERS_PATH, &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "All fields are required");

    let mut body = member("10000002");
    body["ward"] = json!("");
    let (status, _) = send(&app, json_request("POST", MEMBERS_PATH, &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_invalid_location() {
    let (app, _dir) = setup_app().await;

    let cases = [
        ("county", "Atlantis", "Invalid County"),
        ("constituency", "Nyali", "Invalid Constituency for selected County"),
        ("ward", "Karen", "Invalid Ward for selected Constituency"),
    ];

    for (field, value, expected) in cases {
        let mut body = member("10000003");
        body[field] = json!(value);
        let (status, response) = send(&app, json_request("POST", MEMBERS_PATH, &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} = {}", field, value);
        assert_eq!(response["error"], expected);
    }

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_register_duplicate_national_id() {
    let (app, _dir) = setup_app().await;

    let (status, first) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000004"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut again = member("10000004");
    again["name"] = json!("Impostor");
    let (status, body) = send(&app, json_request("POST", MEMBERS_PATH, &again)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Member with this National ID already exists");

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(list, json!([first["member"]]));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let (app, _dir) = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri(MEMBERS_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_list_newest_first() {
    let (app, _dir) = setup_app().await;

    for id in ["10000010", "10000011", "10000012"] {
        let (status, _) = send(&app, json_request("POST", MEMBERS_PATH, &member(id))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["nationalId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["10000012", "10000011", "10000010"]);
}

// =============================================================================
// Update (PUT / PATCH)
// =============================================================================

#[tokio::test]
async fn test_update_member() {
    let (app, _dir) = setup_app().await;
    let (_, created) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000020"))).await;
    let id = created["member"]["id"].as_str().unwrap().to_string();

    let mut changed = member("10000020");
    changed["id"] = json!(id);
    changed["constituency"] = json!("Langata");
    changed["ward"] = json!("South C");

    let (status, body) = send(&app, json_request("PUT", MEMBERS_PATH, &changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member updated successfully");
    assert_fields_match(&body["member"], &changed);
    assert_eq!(body["member"]["createdAt"], created["member"]["createdAt"]);

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(list, json!([body["member"]]));
}

#[tokio::test]
async fn test_patch_aspirant() {
    let (app, _dir) = setup_app().await;
    let (_, created) = send(
        &app,
        json_request("POST", ASPIRANTS_PATH, &aspirant("20000020", "MCA")),
    )
    .await;

    let mut changed = aspirant("20000020", "Governor");
    changed["id"] = created["aspirant"]["id"].clone();

    let (status, body) = send(&app, json_request("PATCH", ASPIRANTS_PATH, &changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Aspirant updated successfully");
    assert_eq!(body["aspirant"]["position"], "Governor");
}

#[tokio::test]
async fn test_update_missing_id_or_fields() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, json_request("PUT", MEMBERS_PATH, &member("10000021"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, _) = send(
        &app,
        json_request("PUT", MEMBERS_PATH, &json!({ "id": "abc", "name": "Only Name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_id() {
    let (app, _dir) = setup_app().await;

    let mut body = member("10000022");
    body["id"] = json!("00000000-0000-0000-0000-000000000000");
    let (status, _) = send(&app, json_request("PUT", MEMBERS_PATH, &body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_invalid_location() {
    let (app, _dir) = setup_app().await;
    let (_, created) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000023"))).await;

    let mut changed = member("10000023");
    changed["id"] = created["member"]["id"].clone();
    changed["ward"] = json!("Railways");

    let (status, body) = send(&app, json_request("PUT", MEMBERS_PATH, &changed)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Ward for selected Constituency");

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(list, json!([created["member"]]));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_member() {
    let (app, _dir) = setup_app().await;
    let (_, created) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000030"))).await;
    let id = created["member"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        test_request("DELETE", &format!("{}?id={}", MEMBERS_PATH, id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member deleted successfully");

    let (_, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_delete_missing_or_unknown_id() {
    let (app, _dir) = setup_app().await;
    let (_, created) = send(&app, json_request("POST", ASPIRANTS_PATH, &aspirant("20000030", "Senator"))).await;

    let (status, body) = send(&app, test_request("DELETE", ASPIRANTS_PATH)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID is required");

    let (status, _) = send(
        &app,
        test_request("DELETE", &format!("{}?id=does-not-exist", ASPIRANTS_PATH)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, test_request("GET", ASPIRANTS_PATH)).await;
    assert_eq!(list, json!([created["aspirant"]]));
}

// =============================================================================
// Methods
// =============================================================================

#[tokio::test]
async fn test_unsupported_method() {
    let (app, _dir) = setup_app().await;

    for path in [MEMBERS_PATH, ASPIRANTS_PATH] {
        let (status, body) = send(&app, test_request("OPTIONS", path)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method Not Allowed");

        // HEAD responses carry no body, so only the status is checked
        let response = app.clone().oneshot(test_request("HEAD", path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

// =============================================================================
// Admin token
// =============================================================================

#[tokio::test]
async fn test_admin_routes_require_token_when_configured() {
    let (app, _dir) = setup_app_with(Some("letmein"), fixture_catalog()).await;

    let (status, body) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing bearer token");

    let wrong = Request::builder()
        .method("GET")
        .uri(MEMBERS_PATH)
        .header(header::AUTHORIZATION, "Bearer guess")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid admin token");

    let right = Request::builder()
        .method("GET")
        .uri(MEMBERS_PATH)
        .header(header::AUTHORIZATION, "Bearer letmein")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, right).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        test_request("DELETE", &format!("{}?id=anything", MEMBERS_PATH)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_is_public_when_token_configured() {
    let (app, _dir) = setup_app_with(Some("letmein"), fixture_catalog()).await;

    let (status, _) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000040"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, test_request("GET", "/api/locations/counties")).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn test_location_lookups() {
    let (app, _dir) = setup_app().await;

    let (status, counties) = send(&app, test_request("GET", "/api/locations/counties")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counties, json!(["Mombasa", "Kisumu", "Nairobi"]));

    let (_, constituencies) = send(
        &app,
        test_request("GET", "/api/locations/constituencies?county=Kisumu"),
    )
    .await;
    assert_eq!(constituencies, json!(["Kisumu Central", "Kisumu East"]));

    let (_, wards) = send(
        &app,
        test_request("GET", "/api/locations/wards?county=Nairobi&constituency=Westlands"),
    )
    .await;
    assert_eq!(
        wards,
        json!(["Kitisuru", "Parklands/Highridge", "Karura", "Kangemi", "Mountain View"])
    );
}

#[tokio::test]
async fn test_location_lookups_unknown_names_are_empty() {
    let (app, _dir) = setup_app().await;

    let (status, constituencies) = send(
        &app,
        test_request("GET", "/api/locations/constituencies?county=Atlantis"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(constituencies, json!([]));

    let (_, wards) = send(
        &app,
        test_request("GET", "/api/locations/wards?county=Mombasa&constituency=Westlands"),
    )
    .await;
    assert_eq!(wards, json!([]));

    let (_, wards) = send(&app, test_request("GET", "/api/locations/wards")).await;
    assert_eq!(wards, json!([]));
}

#[tokio::test]
async fn test_full_catalog() {
    let (app, _dir) = setup_app().await;

    let (status, catalog) = send(&app, test_request("GET", "/api/locations")).await;
    assert_eq!(status, StatusCode::OK);

    let expected: Value =
        serde_json::from_str(&std::fs::read_to_string(fixture_catalog()).unwrap()).unwrap();
    assert_eq!(catalog, expected);
}

#[tokio::test]
async fn test_catalog_unavailable() {
    let missing = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/missing.json");
    let (app, _dir) = setup_app_with(None, missing).await;

    let (status, body) = send(&app, json_request("POST", MEMBERS_PATH, &member("10000050"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");

    let (status, _) = send(&app, test_request("GET", "/api/locations/counties")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Incomplete bodies are rejected before the catalog is needed
    let (status, body) = send(&app, json_request("PUT", MEMBERS_PATH, &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let mut incomplete = member("10000051");
    incomplete["ward"] = json!("");
    let (status, body) = send(&app, json_request("POST", MEMBERS_PATH, &incomplete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = send(&app, json_request("POST", ASPIRANTS_PATH, &member("10000052"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    // Records remain readable without a catalog
    let (status, list) = send(&app, test_request("GET", MEMBERS_PATH)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}
