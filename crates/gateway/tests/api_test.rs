//! Router tests against migrated in-memory SQLite.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

use common::{AppError, DatabaseConfig};
use crud::{CrudError, Database};
use gateway_lib::{config::DATABASE_ERROR_MESSAGE, routes::create_router, state::AppState};
use users::{Migrator, MockUserService};

async fn database() -> Database {
    let config = DatabaseConfig {
        dialect: "sqlite".to_string(),
        dsn: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        log_level: "silent".to_string(),
    };
    let db = Database::connect(&config).await.unwrap();
    db.run_migrations::<Migrator>().await.unwrap();
    db
}

async fn app() -> Router {
    create_router(AppState::new(database().await, CancellationToken::new()))
}

fn citizen(document_id: &str) -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Gómez",
        "document_type": "CC",
        "document_id": document_id,
        "city": "Medellín",
        "state": "Antioquia",
        "address": "Calle 10 # 43-12"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

// =============================================================================
// Generic CRUD routes
// =============================================================================

#[tokio::test]
async fn create_then_get() {
    let app = app().await;

    let (status, created) = send(&app, Method::POST, "/users", Some(citizen("1020304050"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created.get("deleted_at").is_none());

    let (status, fetched) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["document_id"], "1020304050");
    assert_eq!(fetched["created_at"], created["created_at"]);
}

#[tokio::test]
async fn invalid_body_is_bad_request() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/users", Some(citizen("12-34"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Provided body is invalid: Document number must be 5-15 digits"
    );

    let (status, body) = send_raw(&app, "/users", "{\"first_name\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Provided body is invalid"));
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Provided path is invalid"));
}

#[tokio::test]
async fn missing_record_is_a_masked_store_error() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, &format!("/users/{}", Uuid::new_v4()), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], DATABASE_ERROR_MESSAGE);
}

#[tokio::test]
async fn update_uses_path_id_and_upserts() {
    let app = app().await;
    let (_, created) = send(&app, Method::POST, "/users", Some(citizen("1020304050"))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut changed = citizen("1020304050");
    changed["id"] = json!(Uuid::new_v4());
    changed["city"] = json!("Bogotá");
    let (status, body) = send(&app, Method::PUT, &format!("/users/{id}"), Some(changed)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, fetched) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(fetched["city"], "Bogotá");
    assert_eq!(fetched["created_at"], created["created_at"]);

    // Unknown ids are inserted
    let fresh = Uuid::new_v4();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/users/{fresh}"),
        Some(citizen("5566778899")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/users/{fresh}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_is_soft_and_repeatable() {
    let app = app().await;
    let (_, created) = send(&app, Method::POST, "/users", Some(citizen("1020304050"))).await;
    let uri = format!("/users/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::POST, "/users/list", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn list_returns_everything_or_one_page() {
    let app = app().await;
    for document_id in ["1000001", "1000002", "1000003"] {
        let (status, _) = send(&app, Method::POST, "/users", Some(citizen(document_id))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, Method::POST, "/users/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, page) = send(
        &app,
        Method::POST,
        "/users/list",
        Some(json!({"page": 2, "per_page": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, body) = send_raw(&app, "/users/list", "{\"page\": \"two\"}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Provided body is invalid"));
}

#[tokio::test]
async fn page_beyond_any_offset_is_empty() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(citizen("1020304050"))).await;

    let (status, page) = send(
        &app,
        Method::POST,
        "/users/list",
        Some(json!({"page": u64::MAX, "per_page": 100})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn update_with_taken_document_leaves_the_holder_untouched() {
    let app = app().await;
    let (_, holder) = send(&app, Method::POST, "/users", Some(citizen("1020304050"))).await;
    let holder_uri = format!("/users/{}", holder["id"].as_str().unwrap());

    let mut taken = citizen("1020304050");
    taken["city"] = json!("Cali");

    // Unused id carrying the holder's document
    let fresh_uri = format!("/users/{}", Uuid::new_v4());
    let (status, _) = send(&app, Method::PUT, &fresh_uri, Some(taken.clone())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Another existing user switching to the holder's document
    let (_, other) = send(&app, Method::POST, "/users", Some(citizen("5566778899"))).await;
    let other_uri = format!("/users/{}", other["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::PUT, &other_uri, Some(taken)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, unchanged) = send(&app, Method::GET, &holder_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, holder);

    let (_, other_now) = send(&app, Method::GET, &other_uri, None).await;
    assert_eq!(other_now["document_id"], "5566778899");

    let (status, _) = send(&app, Method::GET, &fresh_uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Registration routes
// =============================================================================

#[tokio::test]
async fn registering_twice_returns_existing_user() {
    let app = app().await;

    let (status, first) = send(&app, Method::POST, "/users/register", Some(citizen("1020304050"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) =
        send(&app, Method::POST, "/users/register", Some(citizen("1020304050"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn lookup_by_document() {
    let app = app().await;
    let (_, registered) =
        send(&app, Method::POST, "/users/register", Some(citizen("1020304050"))).await;

    let (status, found) = send(&app, Method::GET, "/users/document/CC/1020304050", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], registered["id"]);

    let (status, body) = send(&app, Method::GET, "/users/document/CE/1020304050", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No user registered with document CE 1020304050");

    let (status, body) = send(&app, Method::GET, "/users/document/XX/1020304050", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Unknown document type: XX; expected one of CC, TI, CE"
    );
}

#[tokio::test]
async fn service_errors_keep_their_status() {
    let mut users = MockUserService::new();
    users
        .expect_register_if_not_exists()
        .times(1)
        .returning(|_, _| Err(CrudError::App(AppError::conflict("registration is closed"))));

    let state = AppState::with_users(database().await, Arc::new(users), CancellationToken::new());
    let app = create_router(state);

    let (status, body) = send(&app, Method::POST, "/users/register", Some(citizen("1020304050"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "registration is closed");
}

#[tokio::test]
async fn shutdown_cancels_in_flight_work() {
    let shutdown = CancellationToken::new();
    let app = create_router(AppState::new(database().await, shutdown.clone()));
    shutdown.cancel();

    let (status, body) = send(&app, Method::POST, "/users/list", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], CrudError::Cancelled.to_string());
}
