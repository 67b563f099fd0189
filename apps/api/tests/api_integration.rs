//! End-to-end API integration tests
//!
//! These tests drive the full HTTP router over the in-memory store:
//! - User creation, listing, lookup, update and deletion
//! - Failure-to-status mapping and problem bodies
//! - Malformed payload and path handling

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use usermgmt_api::api::{self, AppState};
use usermgmt_api::infrastructure::repositories::InMemoryUserStore;
use usermgmt_api::service::UserService;

/// Setup test application over an empty in-memory store
fn setup_app() -> Router {
    let service = UserService::new(InMemoryUserStore::new());
    api::router(AppState::new(service, "http://localhost:3000/"))
}

fn mark() -> Value {
    json!({
        "firstName": "Mark",
        "lastName": "Avrelly",
        "email": "ma@gmail.com",
        "age": 15,
        "active": true
    })
}

fn lucius() -> Value {
    json!({
        "firstName": "Lucius",
        "lastName": "Verus",
        "email": "lv@gmail.com",
        "age": 18,
        "active": true
    })
}

async fn send(app: &Router, method: &str, uri: &str, payload: Option<&Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_create_user_assigns_id() {
    let app = setup_app();

    let response = send(&app, "POST", "/api/users", Some(&mark())).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], 100000);
    assert_eq!(json["firstName"], "Mark");
    assert_eq!(json["lastName"], "Avrelly");
    assert_eq!(json["email"], "ma@gmail.com");
    assert_eq!(json["age"], 15);
    assert_eq!(json["active"], true);
}

#[tokio::test]
async fn test_create_user_ignores_client_id() {
    let app = setup_app();
    let mut payload = mark();
    payload["id"] = json!(5);

    let response = send(&app, "POST", "/api/users", Some(&payload)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], 100000);
}

#[tokio::test]
async fn test_create_duplicate_email_returns_bad_request() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;

    let response = send(&app, "POST", "/api/users", Some(&mark())).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/problem+json");

    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["detail"].as_str().unwrap().contains("ma@gmail.com"));

    // Nothing new was stored
    let response = send(&app, "GET", "/api/users", None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_malformed_body_returns_bad_request() {
    let app = setup_app();
    let payload = json!({
        "firstName": "Mark",
        "lastName": "Avrelly",
        "email": "ma@gmail.com",
        "age": "fifteen",
        "active": true
    });

    let response = send(&app, "POST", "/api/users", Some(&payload)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_create_missing_field_returns_bad_request() {
    let app = setup_app();
    let payload = json!({ "firstName": "Mark", "email": "ma@gmail.com" });

    let response = send(&app, "POST", "/api/users", Some(&payload)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;
    send(&app, "POST", "/api/users", Some(&lucius())).await;

    let response = send(&app, "GET", "/api/users", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["firstName"], "Mark");
    assert_eq!(users[1]["email"], "lv@gmail.com");
}

#[tokio::test]
async fn test_list_users_empty() {
    let app = setup_app();

    let response = send(&app, "GET", "/api/users", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_user_by_id_includes_links() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;

    let response = send(&app, "GET", "/api/users/100000", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], 100000);
    assert_eq!(json["firstName"], "Mark");
    assert_eq!(json["email"], "ma@gmail.com");
    assert_eq!(
        json["_links"]["self"]["href"],
        "http://localhost:3000/api/users/100000"
    );
    assert_eq!(
        json["_links"]["users"]["href"],
        "http://localhost:3000/api/users"
    );
}

#[tokio::test]
async fn test_get_unknown_user_returns_not_found() {
    let app = setup_app();

    let response = send(&app, "GET", "/api/users/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
    assert_eq!(json["detail"], "User by id 42 was not found");
}

#[tokio::test]
async fn test_get_non_numeric_id_returns_bad_request() {
    let app = setup_app();

    let response = send(&app, "GET", "/api/users/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_replaces_fields() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;

    let update = json!({
        "firstName": "Updated Mark",
        "lastName": "new Avrelly",
        "email": "mark@gmail.com",
        "age": 45,
        "active": false
    });
    let response = send(&app, "PUT", "/api/users/100000", Some(&update)).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], 100000);
    assert_eq!(json["firstName"], "Updated Mark");

    // Verify the stored record
    let response = send(&app, "GET", "/api/users/100000", None).await;
    let json = body_json(response).await;
    assert_eq!(json["id"], 100000);
    assert_eq!(json["firstName"], "Updated Mark");
    assert_eq!(json["lastName"], "new Avrelly");
    assert_eq!(json["email"], "mark@gmail.com");
    assert_eq!(json["age"], 45);
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn test_update_unknown_user_returns_not_found() {
    let app = setup_app();

    let response = send(&app, "PUT", "/api/users/42", Some(&mark())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_to_taken_email_returns_bad_request() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;
    send(&app, "POST", "/api/users", Some(&lucius())).await;

    let mut update = mark();
    update["email"] = json!("lv@gmail.com");
    let response = send(&app, "PUT", "/api/users/100000", Some(&update)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Email lv@gmail.com taken");
}

#[tokio::test]
async fn test_delete_user() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;

    let response = send(&app, "DELETE", "/api/users/100000", None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    // Verify deletion
    let response = send(&app, "GET", "/api/users/100000", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_user_returns_not_found() {
    let app = setup_app();

    let response = send(&app, "DELETE", "/api/users/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reflects_creates_and_deletes() {
    let app = setup_app();
    send(&app, "POST", "/api/users", Some(&mark())).await;
    send(&app, "POST", "/api/users", Some(&lucius())).await;
    send(&app, "DELETE", "/api/users/100000", None).await;

    let response = send(&app, "GET", "/api/users", None).await;
    let json = body_json(response).await;
    let users = json.as_array().unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], 100001);
}
