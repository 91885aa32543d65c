//! services/api/tests/http_api.rs
//!
//! Drives the full route table through `tower::ServiceExt::oneshot` against
//! the in-memory store, covering the end-to-end account/cart/order flow and
//! the authentication boundary.

use api_lib::adapters::Argon2Hasher;
use api_lib::web::{auth::TokenKeys, router, state::AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use commerce_core::memory::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-material";

fn app() -> Router {
    let state = Arc::new(AppState::new(
        Arc::new(InMemoryStore::with_test_items()),
        Arc::new(Argon2Hasher),
        TokenKeys::new(TEST_SECRET, 1),
    ));
    router(state)
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(path: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn create_user_body(username: &str, password: &str, confirm: &str) -> Value {
    json!({ "username": username, "password": password, "confirmPassword": confirm })
}

/// Registers a user and logs in, returning a bearer token.
async fn signup_and_login(app: &Router, username: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        post(
            "/api/user/create",
            Some(create_user_body(username, password, password)),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        post(
            "/api/user/login",
            Some(json!({ "username": username, "password": password })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_validation_rules() {
    let app = app();

    let (status, body) = send(
        &app,
        post(
            "/api/user/create",
            Some(create_user_body("alice", "secret12", "secret12")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // Same username again.
    let (status, _) = send(
        &app,
        post(
            "/api/user/create",
            Some(create_user_body("alice", "other123", "other123")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Under seven characters.
    let (status, _) = send(
        &app,
        post(
            "/api/user/create",
            Some(create_user_body("bob", "short1", "short1")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Confirmation mismatch.
    let (status, _) = send(
        &app,
        post(
            "/api/user/create",
            Some(create_user_body("bob", "secret12", "secret13")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();
    signup_and_login(&app, "alice", "secret12").await;

    let (status, _) = send(
        &app,
        post(
            "/api/user/login",
            Some(json!({ "username": "alice", "password": "wrong-pass" })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post(
            "/api/user/login",
            Some(json!({ "username": "nobody", "password": "secret12" })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();

    // No Authorization header at all.
    let (status, _) = send(&app, get("/api/item", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token signed with a different key.
    let foreign = TokenKeys::new("some-other-secret", 1).issue("alice").unwrap();
    let (status, _) = send(&app, get("/api/item", Some(&foreign))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An expired token signed with the right key.
    let expired = TokenKeys::new(TEST_SECRET, -1).issue("alice").unwrap();
    let (status, _) = send(&app, get("/api/item", Some(&expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_lookups() {
    let app = app();
    let token = signup_and_login(&app, "alice", "secret12").await;

    let (status, body) = send(&app, get("/api/user/alice", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, get(&format!("/api/user/id/{}", id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, _) = send(&app, get("/api/user/someoneelse", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/user/id/9999", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_catalog_lookups() {
    let app = app();
    let token = signup_and_login(&app, "alice", "secret12").await;

    let (status, body) = send(&app, get("/api/item", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/api/item/1", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Round Widget");
    assert_eq!(body["price"], "2.99");

    let (status, _) = send(&app, get("/api/item/10", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/item/name/Round%20Widget", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/api/item/name/Not%20Found%20Item", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_add_and_remove() {
    let app = app();
    let token = signup_and_login(&app, "alice", "secret12").await;

    let (status, body) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": 2 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 2 x 2.99
    assert_eq!(body["total"], "5.98");
    assert_eq!(body["items"][0]["quantity"], 2);

    let (status, body) = send(
        &app,
        post(
            "/api/cart/removeFromCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": 1 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "2.99");

    // Unknown user and unknown item are distinct 404s.
    let (status, _) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "nobody", "itemId": 1, "quantity": 1 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 10, "quantity": 1 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Negative and oversized quantities never reach the cart.
    let (status, _) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": -1 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": 4_294_967_295_i64 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_and_history_flow() {
    let app = app();
    let token = signup_and_login(&app, "alice", "secret12").await;

    let (status, body) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": 2 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cart_total = body["total"].clone();

    let (status, body) = send(&app, post("/api/order/submit/alice", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], cart_total);
    let first_order_id = body["id"].clone();

    // The cart is empty after submission; a zero-quantity add reads it back.
    let (status, body) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 1, "quantity": 0 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "0");
    assert!(body["items"].as_array().unwrap().is_empty());

    // A second submission lands behind the first in history.
    let (status, _) = send(
        &app,
        post(
            "/api/cart/addToCart",
            Some(json!({ "username": "alice", "itemId": 2, "quantity": 1 })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, post("/api/order/submit/alice", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/order/history/alice", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], first_order_id);
    assert_eq!(history[1]["total"], "1.99");

    // Unknown users get 404 on both order routes.
    let (status, _) = send(&app, post("/api/order/submit/nobody", None, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get("/api/order/history/nobody", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
