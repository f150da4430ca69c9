//! Integration tests for `ThreadsClient` using wiremock HTTP mocks.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::time::Duration;

use threadgems::config::ThreadsApiConfig;
use threadgems::threads::{ClientCredentials, ThreadsClient, ThreadsError};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ThreadsClient {
    let Ok(client) = ThreadsClient::new(&ThreadsApiConfig {
        base_url: base_url.to_string(),
        api_version: "v1.0".to_string(),
        timeout_secs: 5,
    }) else {
        panic!("client construction should not fail");
    };
    client
}

fn credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "app-1".to_string(),
        client_secret: "shh".to_string(),
    }
}

#[tokio::test]
async fn exchange_code_posts_form_and_accepts_numeric_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=app-1"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-1",
            "user_id": 1789
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let Ok(token) = client
        .exchange_code(&credentials(), "abc", "https://app.example/cb")
        .await
    else {
        panic!("exchange should succeed");
    };

    assert_eq!(token.access_token.as_deref(), Some("tok-1"));
    assert_eq!(token.user_id.as_deref(), Some("1789"));
}

#[tokio::test]
async fn exchange_code_surfaces_graph_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "message": "Invalid verification code format.",
                "type": "OAuthException",
                "code": 100
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .exchange_code(&credentials(), "bad", "https://app.example/cb")
        .await;

    let Err(ThreadsError::Api { status, message }) = result else {
        panic!("expected ThreadsError::Api, got {result:?}");
    };
    assert_eq!(status, 400);
    assert!(message.contains("Invalid verification code format."));
    assert!(message.contains("OAuthException"));
}

#[tokio::test]
async fn get_profile_sends_token_and_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .and(query_param("access_token", "tok-1"))
        .and(query_param("fields", "id,username"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "1789",
            "username": "designer"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let Ok(profile) = client
        .get_profile("tok-1", "id,username", Some(Duration::from_secs(5)))
        .await
    else {
        panic!("profile should parse");
    };
    assert_eq!(profile.id.as_deref(), Some("1789"));
    assert_eq!(profile.username.as_deref(), Some("designer"));
}

#[tokio::test]
async fn get_profile_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "1"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .get_profile("tok", "id", Some(Duration::from_millis(50)))
        .await;
    assert!(matches!(result, Err(ThreadsError::Http(_))));
}

#[tokio::test]
async fn profile_posts_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/profile_posts"))
        .and(query_param("username", "meta"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "id": "p1",
                    "username": "meta",
                    "text": "New Figma plugin",
                    "media_type": "IMAGE",
                    "media_url": "https://cdn.example/p1.jpg",
                    "permalink": "https://threads.net/@meta/post/p1",
                    "timestamp": "2024-03-01T10:00:00+0000"
                },
                {
                    "id": "p2",
                    "username": "meta",
                    "media_type": "TEXT_POST",
                    "timestamp": "2024-02-01T10:00:00+0000"
                }
            ],
            "paging": { "cursors": { "after": "x" } }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let Ok(posts) = client.profile_posts("tok", "meta", 20).await else {
        panic!("posts should parse");
    };

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "p1");
    assert!(posts[0].is_image());
    assert_eq!(posts[1].text, None);
    assert!(!posts[1].is_image());
}

#[tokio::test]
async fn profile_posts_raw_passes_body_through() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": [],
        "paging": { "cursors": { "before": "a", "after": "b" } }
    });
    Mock::given(method("GET"))
        .and(path("/v1.0/profile_posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let Ok(raw) = client.profile_posts_raw("tok", "someone", 25).await else {
        panic!("raw body expected");
    };
    assert_eq!(raw, body);
}

#[tokio::test]
async fn non_json_error_body_is_reported_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/profile_posts"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.profile_posts("tok", "meta", 20).await;
    let Err(ThreadsError::Api { status, message }) = result else {
        panic!("expected ThreadsError::Api, got {result:?}");
    };
    assert_eq!(status, 503);
    assert_eq!(message, "upstream down");
}
