//! HTTP-level auth flow against the in-memory credential store.

use auth::{AuthConfig, InMemoryCredentialStore, auth_router_generic};
use platform::bearer::bearer_header_value;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    auth_router_generic(InMemoryCredentialStore::new(), AuthConfig::with_random_secret())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_me(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/register", json!({"username": username, "password": password})),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/login", json!({"username": username, "password": password})),
    )
    .await
}

#[tokio::test]
async fn alice_registers_logs_in_and_reaches_protected_route() {
    let app = app();

    let (status, body) = register(&app, "alice", "pw123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"username": "alice"}));

    let (status, body) = login(&app, "alice", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["expiresAt"].as_i64().is_some());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_me(Some(&bearer_header_value(&token)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, body) = send(&app, get_me(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], 401);

    let (status, _) = send(&app, get_me(Some("Bearer garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_rejections_carry_www_authenticate() {
    let app = app();
    let resp = app.oneshot(get_me(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    assert_eq!(register(&app, "bob", "pw123").await.0, StatusCode::CREATED);

    let (status, body) = register(&app, "bob", "different").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Username already exists");
    assert_eq!(body["error"]["status"], 409);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = app();
    register(&app, "carol", "pw123").await;

    let wrong_password = login(&app, "carol", "pw124").await;
    let unknown_user = login(&app, "mallory", "pw123").await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        wrong_password.1["error"]["message"],
        "Invalid username or password"
    );
}

#[tokio::test]
async fn register_validates_input() {
    let app = app();

    let (status, body) = register(&app, "", "pw123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Username is required");

    let (status, body) = register(&app, "dave", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Password is required");

    let (status, body) = send(&app, post_json("/register", json!({"password": "pw123"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Username is required");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = auth_router_generic(
        InMemoryCredentialStore::new(),
        AuthConfig::with_random_secret().with_token_ttl(Duration::from_millis(50)),
    );
    register(&app, "erin", "pw123").await;
    let (_, body) = login(&app, "erin", "pw123").await;
    let token = body["token"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(120)).await;

    let (status, body) = send(&app, get_me(Some(&bearer_header_value(&token)))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Authentication token has expired");
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let issuer = app();
    let verifier = app();

    register(&issuer, "frank", "pw123").await;
    let (_, body) = login(&issuer, "frank", "pw123").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&verifier, get_me(Some(&bearer_header_value(&token)))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid authentication token");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_registration_has_one_winner() {
    let app = app();

    let first = tokio::spawn({
        let app = app.clone();
        async move { register(&app, "grace", "pw123").await.0 }
    });
    let second = tokio::spawn({
        let app = app.clone();
        async move { register(&app, "grace", "pw456").await.0 }
    });

    let mut statuses = [first.await.unwrap(), second.await.unwrap()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}
