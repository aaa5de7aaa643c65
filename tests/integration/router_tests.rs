//! In-process router tests
//!
//! The pool is lazy and never connects, so every case here must be decided
//! before the first query: authentication, role checks and input validation.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use shelfmark_server::{
    api,
    config::AppConfig,
    models::user::{Role, UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let services = Services::new(Repository::new(pool), config.auth.clone());
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (api::create_router(state), config)
}

fn token(config: &AppConfig, user_id: i32, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: format!("user{user_id}"),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();

    let response = app
        .oneshot(request("GET", "/api/v1/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = app();

    let response = app
        .oneshot(request("GET", "/api-docs/openapi.json", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/borrow-records"].is_object());
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let (app, _) = app();

    let response = app
        .oneshot(request("GET", "/api/v1/books", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NotAuthenticated");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let (app, config) = app();
    let mut other = config.clone();
    other.auth.jwt_secret = "not-the-server-secret".to_string();
    let forged = token(&other, 1, Role::Admin);

    let response = app
        .oneshot(request("GET", "/api/v1/fines", Some(&forged), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_create_book() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/books",
            Some(&member),
            Some(json!({ "title": "Dune", "author": "Frank Herbert", "total_copies": 2 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_cannot_delete_book() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request("DELETE", "/api/v1/books/1", Some(&member), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_borrow() {
    let (app, config) = app();
    let admin = token(&config, 1, Role::Admin);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/borrow-records",
            Some(&admin),
            Some(json!({ "book_id": 1 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_return_or_pay() {
    let (app, config) = app();
    let admin = token(&config, 1, Role::Admin);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/book-returns",
            Some(&admin),
            Some(json!({ "borrow_record_id": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/submissions",
            Some(&admin),
            Some(json!({ "borrow_record_id": 1, "amount_paid": "5.00" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_cannot_list_users() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request("GET", "/api/v1/users", Some(&member), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_cannot_read_other_account() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request("GET", "/api/v1/users/8", Some(&member), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_book_without_copies_rejected() {
    let (app, config) = app();
    let admin = token(&config, 1, Role::Admin);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/books",
            Some(&admin),
            Some(json!({ "title": "Dune", "author": "Frank Herbert", "total_copies": 0 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_registration_with_invalid_email_rejected() {
    let (app, _) = app();

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/users",
            None,
            Some(json!({
                "username": "reader",
                "email": "not-an-email",
                "password": "secret",
                "role": "member"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_payment_rejected() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/submissions",
            Some(&member),
            Some(json!({ "borrow_record_id": 1, "amount_paid": "-1.00" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_above_column_range_rejected() {
    let (app, config) = app();
    let member = token(&config, 7, Role::Member);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/submissions",
            Some(&member),
            Some(json!({ "borrow_record_id": 1, "amount_paid": "1000000000.00" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
