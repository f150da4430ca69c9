//! End-to-end tests for the REST router against a mocked Threads API.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use threadgems::api;
use threadgems::app_state::AppState;
use threadgems::config::ThreadsApiConfig;
use threadgems::service::AuthService;
use threadgems::threads::{ClientCredentials, ThreadsClient};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(upstream: &str) -> Router {
    let Ok(client) = ThreadsClient::new(&ThreadsApiConfig {
        base_url: upstream.to_string(),
        api_version: "v1.0".to_string(),
        timeout_secs: 5,
    }) else {
        panic!("client construction should not fail");
    };
    let auth_service = AuthService::new(
        client,
        ClientCredentials {
            client_id: "app-1".to_string(),
            client_secret: "shh".to_string(),
        },
        "https://threads.net".to_string(),
        Some("https://app.example/cb".to_string()),
        None,
    );
    Router::new()
        .merge(api::build_router())
        .with_state(AppState {
            auth_service: Arc::new(auth_service),
            cookie_secure: true,
        })
}

async fn send(app: Router, req: Request<Body>) -> Response {
    let Ok(resp) = app.oneshot(req).await else {
        panic!("router is infallible");
    };
    resp
}

async fn json_body(resp: Response) -> serde_json::Value {
    let Ok(bytes) = axum::body::to_bytes(resp.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let Ok(value) = serde_json::from_slice(&bytes) else {
        panic!("body should be JSON");
    };
    value
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("threads_token={token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let Ok(req) = builder.body(body) else {
        panic!("request should build");
    };
    req
}

fn set_cookie(resp: &Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[tokio::test]
async fn callback_sets_cookie_and_returns_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-1",
            "user_id": 42
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "42",
            "username": "designer"
        })))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request(
            "POST",
            "/api/auth/callback",
            None,
            Some(serde_json::json!({"code": "abc", "redirect_uri": "https://app.example/cb"})),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("threads_token=tok-1"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=2592000"));

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user_id"], "42");
    assert_eq!(body["username"], "designer");
    assert_eq!(body["message"], "Authentication successful");
}

#[tokio::test]
async fn callback_survives_profile_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-1",
            "user_id": "42"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request(
            "POST",
            "/api/auth/callback",
            None,
            Some(serde_json::json!({"code": "abc", "redirect_uri": "https://app.example/cb"})),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["user_id"], "42");
    assert!(body["username"].is_null());
}

#[tokio::test]
async fn callback_rejects_failed_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "Invalid code", "type": "OAuthException", "code": 100}
        })))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request(
            "POST",
            "/api/auth/callback",
            None,
            Some(serde_json::json!({"code": "bad", "redirect_uri": "https://app.example/cb"})),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie(&resp).is_empty());
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 1101);
}

#[tokio::test]
async fn callback_rejects_incomplete_token_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "tok"})),
        )
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request(
            "POST",
            "/api/auth/callback",
            None,
            Some(serde_json::json!({"code": "abc", "redirect_uri": "https://app.example/cb"})),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 1102);
    assert_eq!(body["error"]["message"], "invalid token response");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let resp = send(
        app("http://127.0.0.1:1"),
        request("POST", "/api/auth/logout", Some("tok-1"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("threads_token="));
    assert!(cookie.contains("Max-Age=0"));
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn verify_without_cookie_is_unauthorized() {
    let resp = send(
        app("http://127.0.0.1:1"),
        request("POST", "/api/auth/verify", None, None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn verify_accepts_valid_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .and(query_param("fields", "id,username"))
        .and(query_param("access_token", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "42",
            "username": "designer"
        })))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("POST", "/api/auth/verify", Some("tok-1"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["user_id"], "42");
    assert_eq!(body["username"], "designer");
    assert_eq!(body["access_token"], "tok-1");
}

#[tokio::test]
async fn verify_rejects_revoked_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Session has expired", "type": "OAuthException", "code": 190}
        })))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("POST", "/api/auth/verify", Some("old"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn user_degrades_to_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("GET", "/api/auth/user", Some("tok-1"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, serde_json::json!({}));
}

#[tokio::test]
async fn user_returns_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "42",
            "username": "designer",
            "name": "Dee Signer",
            "threads_biography": "pixels"
        })))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("GET", "/api/auth/user", Some("tok-1"), None),
    )
    .await;

    let body = json_body(resp).await;
    assert_eq!(body["username"], "designer");
    assert_eq!(body["name"], "Dee Signer");
    assert_eq!(body["threads_biography"], "pixels");
}

#[tokio::test]
async fn authorize_returns_url_and_state() {
    let resp = send(
        app("http://127.0.0.1:1"),
        request("GET", "/api/auth/authorize?scope=threads_basic", None, None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let Some(url) = body["url"].as_str() else {
        panic!("url should be a string");
    };
    let Some(state) = body["state"].as_str() else {
        panic!("state should be a string");
    };
    assert!(url.starts_with("https://threads.net/oauth/authorize?"));
    assert!(url.contains("client_id=app-1"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains(&format!("state={state}")));
}

#[tokio::test]
async fn profile_posts_requires_cookie() {
    let resp = send(
        app("http://127.0.0.1:1"),
        request("GET", "/api/threads/profile/meta", None, None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_posts_proxies_upstream_body() {
    let server = MockServer::start().await;
    let upstream = serde_json::json!({
        "data": [{"id": "p1", "text": "hello", "timestamp": "2024-01-01T00:00:00+0000"}]
    });
    Mock::given(method("GET"))
        .and(path("/v1.0/profile_posts"))
        .and(query_param("username", "meta"))
        .and(query_param("limit", "25"))
        .and(query_param("access_token", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("GET", "/api/threads/profile/meta", Some("tok-1"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, upstream);
}

#[tokio::test]
async fn profile_posts_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/profile_posts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let resp = send(
        app(&server.uri()),
        request("GET", "/api/threads/profile/meta?limit=5", Some("tok-1"), None),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], 5001);
}

#[tokio::test]
async fn health_reports_store_state() {
    let resp = send(app("http://127.0.0.1:1"), request("GET", "/health", None, None)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_connected"], false);
}
