//! Shared helpers for HTTP integration tests.
//!
//! Each test drives the complete application over fresh in-memory adapters.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use recipe_backend::test_support::{build_app, in_memory_state};
use serde_json::{Value, json};

pub const CREATE_USER_URL: &str = "/api/user/create/";
pub const TOKEN_URL: &str = "/api/user/token/";
pub const ME_URL: &str = "/api/user/me/";
pub const TAGS_URL: &str = "/api/recipe/tags/";
pub const INGREDIENTS_URL: &str = "/api/recipe/ingredients/";

pub const PASSWORD: &str = "testpass123";

/// Running application under test.
pub trait TestApp:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestApp for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

/// Fresh application with empty in-memory stores.
pub async fn spawn_app() -> impl TestApp {
    test::init_service(build_app(in_memory_state())).await
}

/// Send `req` and decode the JSON body, or `Value::Null` when empty.
pub async fn send(app: &impl TestApp, req: test::TestRequest) -> (StatusCode, Value) {
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// POST a JSON payload anonymously.
pub async fn post_json(app: &impl TestApp, uri: &str, payload: Value) -> (StatusCode, Value) {
    send(app, test::TestRequest::post().uri(uri).set_json(payload)).await
}

/// Register an account through the public API.
pub async fn register(app: &impl TestApp, email: &str, password: &str, name: &str) {
    let (status, body) = post_json(
        app,
        CREATE_USER_URL,
        json!({"email": email, "password": password, "name": name}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
}

/// Exchange credentials for a token key.
pub async fn token(app: &impl TestApp, email: &str, password: &str) -> String {
    let (status, body) =
        post_json(app, TOKEN_URL, json!({"email": email, "password": password})).await;
    assert_eq!(status, StatusCode::OK, "token failed: {body}");
    body["token"].as_str().expect("token key").to_owned()
}

/// Register an account with [`PASSWORD`] and return its token key.
pub async fn register_with_token(app: &impl TestApp, email: &str) -> String {
    register(app, email, PASSWORD, "Test user").await;
    token(app, email, PASSWORD).await
}

/// Request builder carrying `Authorization: Token <key>`.
pub fn authorised(req: test::TestRequest, key: &str) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Token {key}")))
}
