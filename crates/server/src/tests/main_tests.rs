use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app_with(store: MemoryStore, max_body_bytes: usize) -> Router {
    build_router(Arc::new(AppState {
        api: ApiContext {
            store: Arc::new(store),
        },
        max_body_bytes,
        expose_submissions: false,
    }))
}

fn owner_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let app = build_router(Arc::new(AppState {
        api: ApiContext {
            store: Arc::new(store.clone()),
        },
        max_body_bytes: config::DEFAULT_MAX_BODY_BYTES,
        expose_submissions: true,
    }));
    (app, store)
}

fn test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    (
        test_app_with(store.clone(), config::DEFAULT_MAX_BODY_BYTES),
        store,
    )
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

async fn read_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn ann_lee() -> String {
    json!({
        "name": "Ann Lee",
        "email": "ann@example.com",
        "message": "Hello there, nice site!"
    })
    .to_string()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _store) = test_app();
    let response = app.oneshot(get_request("/healthz")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn invalid_contact_returns_structured_422() {
    let (app, store) = test_app();
    let payload = json!({ "name": "Al", "email": "bad", "message": "short" }).to_string();
    let response = app
        .oneshot(post_json("/api/contact", payload))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("details")
        .iter()
        .map(|issue| issue["field"].as_str().expect("field"))
        .collect();
    assert_eq!(fields, vec!["email", "message"]);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn valid_contact_is_accepted() {
    let (app, store) = test_app();
    let response = app
        .oneshot(post_json("/api/contact", ann_lee()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let accepted: ContactAccepted =
        serde_json::from_value(read_json(response).await).expect("accepted");
    assert!(accepted.ok);
    assert_eq!(accepted.message, "Message received successfully");

    let stored = store.list_submissions().await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, accepted.id);
    assert_eq!(stored[0].name, "Ann Lee");
}

#[tokio::test]
async fn submissions_are_not_readable_by_default() {
    let (app, store) = test_app();
    let response = app
        .clone()
        .oneshot(post_json("/api/contact", ann_lee()))
        .await
        .expect("response");
    let accepted: ContactAccepted =
        serde_json::from_value(read_json(response).await).expect("accepted");

    for uri in [
        "/api/contact/submissions".to_string(),
        format!("/api/contact/submissions/{}", accepted.id),
    ] {
        let response = app
            .clone()
            .oneshot(get_request(&uri))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&body);
        assert!(!text.contains("ann@example.com"));
        assert!(!text.contains("Hello there"));
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn opted_in_owner_routes_list_and_load_submissions() {
    let (app, _store) = owner_app();
    let response = app
        .clone()
        .oneshot(post_json("/api/contact", ann_lee()))
        .await
        .expect("response");
    let accepted: ContactAccepted =
        serde_json::from_value(read_json(response).await).expect("accepted");

    let response = app
        .clone()
        .oneshot(get_request("/api/contact/submissions"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<ContactSubmission> =
        serde_json::from_value(read_json(response).await).expect("submissions");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, accepted.id);

    let response = app
        .oneshot(get_request(&format!(
            "/api/contact/submissions/{}",
            accepted.id
        )))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_fields_are_validation_issues() {
    let (app, _store) = test_app();
    let response = app
        .oneshot(post_json("/api/contact", "{}".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["details"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn malformed_json_is_rejected_without_storing() {
    let (app, store) = test_app();
    let response = app
        .oneshot(post_json("/api/contact", "{\"name\": ".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn store_failure_returns_internal_error() {
    let app = test_app_with(
        MemoryStore::with_capacity_limit(0),
        config::DEFAULT_MAX_BODY_BYTES,
    );
    let response = app
        .oneshot(post_json("/api/contact", ann_lee()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let store = MemoryStore::new();
    let app = test_app_with(store.clone(), 64);
    let body = ann_lee();
    let request = Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unknown_submission_is_404() {
    let (app, _store) = owner_app();
    let uri = format!("/api/contact/submissions/{}", SubmissionId::generate());
    let response = app.oneshot(get_request(&uri)).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ApiError = serde_json::from_value(read_json(response).await).expect("error");
    assert_eq!(body.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn content_routes_serve_static_feeds() {
    let (app, _store) = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/content"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bundle = read_json(response).await;
    for key in ["skills", "experiences", "education", "projects", "socialLinks"] {
        assert!(bundle[key].as_array().is_some(), "{key} feed present");
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/content/projects?featured=true"))
        .await
        .expect("response");
    let projects: Vec<Project> =
        serde_json::from_value(read_json(response).await).expect("projects");
    assert!(!projects.is_empty());
    assert!(projects.iter().all(|project| project.featured));

    let response = app
        .clone()
        .oneshot(get_request("/api/content/skills?category=backend"))
        .await
        .expect("response");
    let skills: Vec<Skill> = serde_json::from_value(read_json(response).await).expect("skills");
    assert!(!skills.is_empty());
    assert!(skills
        .iter()
        .all(|skill| skill.category == SkillCategory::Backend));

    let response = app
        .oneshot(get_request("/api/content/skills?category=cooking"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
