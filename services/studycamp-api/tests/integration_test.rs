//! End-to-end tests for the StudyCamp REST API against the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use studycamp_api::{build_router, AppState, TokenService};
use studycamp_core::{doc, Bson, ObjectId, COLLEGES};
use studycamp_storage::{DocumentStore, MemoryDocumentStore};
use tower::ServiceExt; // for `oneshot`

const SECRET: &str = "integration-secret";

/// Initialize tracing for tests (call once)
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("studycamp_api=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn create_app(store: &MemoryDocumentStore) -> Router {
    init_tracing();
    let tokens = TokenService::new(Some(SECRET), Duration::hours(24));
    build_router(AppState::new(Arc::new(store.clone()), tokens))
}

/// Insert `count` colleges and return their hex ids in insertion order.
async fn seed_colleges(store: &MemoryDocumentStore, count: usize) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..count {
        let result = store
            .insert_one(
                COLLEGES,
                doc! { "name": format!("College {i}"), "rating": 4.0 + i as f64 / 10.0 },
            )
            .await
            .unwrap();
        ids.push(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => panic!("unexpected id {other:?}"),
        });
    }
    ids
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_root_liveness() {
    let app = create_app(&MemoryDocumentStore::new());

    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("StudyCamp server is running"));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = create_app(&MemoryDocumentStore::new());

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_list_colleges_returns_everything() {
    let store = MemoryDocumentStore::new();
    let ids = seed_colleges(&store, 4).await;
    let app = create_app(&store);

    let (status, body) = get(&app, "/colleges").await;

    assert_eq!(status, StatusCode::OK);
    let colleges = body.as_array().unwrap();
    assert_eq!(colleges.len(), 4);
    for (college, id) in colleges.iter().zip(&ids) {
        assert_eq!(college["_id"], json!(id));
    }
}

#[tokio::test]
async fn test_list_colleges_is_idempotent() {
    let store = MemoryDocumentStore::new();
    seed_colleges(&store, 3).await;
    let app = create_app(&store);

    let (_, first) = get(&app, "/colleges").await;
    let (_, second) = get(&app, "/colleges").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_colleges_keeps_documents_with_foreign_ids() {
    let store = MemoryDocumentStore::new();
    let ids = seed_colleges(&store, 1).await;
    store
        .insert_one(COLLEGES, doc! { "_id": "mit", "name": "MIT" })
        .await
        .unwrap();
    let app = create_app(&store);

    let (status, body) = get(&app, "/colleges").await;
    assert_eq!(status, StatusCode::OK);
    let colleges = body.as_array().unwrap();
    assert_eq!(colleges.len(), 2);
    assert_eq!(colleges[0]["_id"], json!(ids[0]));
    assert_eq!(colleges[1], json!({ "_id": "mit", "name": "MIT" }));

    let (status, body) = get(&app, "/best-colleges?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_best_colleges_defaults_to_three() {
    let store = MemoryDocumentStore::new();
    seed_colleges(&store, 6).await;
    let app = create_app(&store);

    let (status, body) = get(&app, "/best-colleges").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_best_colleges_with_limit() {
    let store = MemoryDocumentStore::new();
    seed_colleges(&store, 6).await;
    let app = create_app(&store);

    let (status, body) = get(&app, "/best-colleges?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    // Fewer documents than the limit
    let (_, body) = get(&app, "/best-colleges?limit=50").await;
    assert_eq!(body.as_array().unwrap().len(), 6);

    // Unusable limits fall back to the default
    let (_, body) = get(&app, "/best-colleges?limit=abc").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_college_by_id() {
    let store = MemoryDocumentStore::new();
    let ids = seed_colleges(&store, 3).await;
    let app = create_app(&store);

    let (status, body) = get(&app, &format!("/users/colleges/{}", ids[1])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], json!(ids[1]));
    assert_eq!(body["name"], "College 1");
}

#[tokio::test]
async fn test_get_college_absent_id_is_404() {
    let store = MemoryDocumentStore::new();
    seed_colleges(&store, 1).await;
    let app = create_app(&store);

    let absent = ObjectId::new().to_hex();
    let (status, body) = get(&app, &format!("/users/colleges/{absent}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": true, "message": "colleges not found" }));
}

#[tokio::test]
async fn test_get_college_malformed_id_is_500() {
    let app = create_app(&MemoryDocumentStore::new());

    let (status, body) = get(&app, "/users/colleges/not-an-object-id").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": true, "message": "Server error" }));
}

#[tokio::test]
async fn test_submit_then_query_by_email() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    let (status, ack) = post_json(&app, "/candidate", json!({ "email": "a@x.com", "school": "Y" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["acknowledged"], true);
    let inserted_id = ack["insertedId"].as_str().unwrap().to_string();

    post_json(&app, "/candidate", json!({ "email": "b@x.com", "school": "Z" })).await;

    let (status, body) = get(&app, "/mycollege?email=a@x.com").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "_id": inserted_id, "email": "a@x.com", "school": "Y" }])
    );
}

#[tokio::test]
async fn test_mycollege_without_email_returns_all() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        post_json(&app, "/candidate", json!({ "email": email })).await;
    }

    let (status, body) = get(&app, "/mycollege").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get(&app, "/mycollege?email=").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_submission_is_not_validated() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    let (status, ack) = post_json(&app, "/candidate", json!({ "nickname": "no email here" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["acknowledged"], true);
    assert_eq!(store.len("candidateCollection"), 1);
}

async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    read(response).await
}

#[tokio::test]
async fn test_unreadable_bodies_use_error_format() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    let cases = [
        ("/candidate", Some("application/json"), "{\"email\": "),
        ("/candidate", Some("application/json"), "[1, 2, 3]"),
        ("/candidate", None, "{\"email\": \"a@x.com\"}"),
        ("/jwt", Some("application/json"), "not json"),
        ("/jwt", Some("text/plain"), "{\"email\": \"a@x.com\"}"),
    ];

    for (uri, content_type, body) in cases {
        let (status, error) = post_raw(&app, uri, content_type, body).await;

        assert!(status.is_client_error(), "{uri} {body}: {status}");
        assert_eq!(error["error"], true, "{uri} {body}");
        assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
    assert!(store.is_empty("candidateCollection"));
}

#[tokio::test]
async fn test_large_integers_are_stored() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    let (status, ack) = post_raw(
        &app,
        "/candidate",
        Some("application/json"),
        "{\"email\": \"a@x.com\", \"applicationNo\": 18446744073709551615}",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["acknowledged"], true);

    let (_, body) = get(&app, "/mycollege?email=a@x.com").await;
    assert_eq!(body[0]["applicationNo"], json!(u64::MAX as f64));
}

#[tokio::test]
async fn test_duplicate_submission_id_is_500() {
    let store = MemoryDocumentStore::new();
    let app = create_app(&store);

    let body = json!({ "_id": "fixed", "email": "a@x.com" });
    let (status, ack) = post_json(&app, "/candidate", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["insertedId"], "fixed");

    let (status, error) = post_json(&app, "/candidate", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["error"], true);
}

#[tokio::test]
async fn test_jwt_issues_verifiable_token() {
    let app = create_app(&MemoryDocumentStore::new());

    let (status, body) = post_json(&app, "/jwt", json!({ "email": "a@x.com" })).await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let verifier = TokenService::new(Some(SECRET), Duration::hours(24));
    let claims = verifier.verify(token).unwrap();

    assert_eq!(claims.email(), Some("a@x.com"));
    let ttl = claims.expires_at().unwrap() - claims.get("iat").unwrap().as_i64().unwrap();
    assert_eq!(ttl, 24 * 3600);
}

#[tokio::test]
async fn test_jwt_without_secret_is_500() {
    init_tracing();
    let tokens = TokenService::new(None, Duration::hours(24));
    let app = build_router(AppState::new(Arc::new(MemoryDocumentStore::new()), tokens));

    let (status, body) = post_json(&app, "/jwt", json!({ "email": "a@x.com" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": true, "message": "Server error" }));
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() {
    let app = create_app(&MemoryDocumentStore::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/colleges")
                .header("origin", "https://studycamp.example")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "x-client-build,content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://studycamp.example"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "x-client-build,content-type"
    );
}
