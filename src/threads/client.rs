//! HTTP client for the Threads Graph API.
//!
//! Wraps `reqwest` with Threads-specific error handling and typed response
//! deserialization. Non-success statuses are surfaced as
//! [`ThreadsError::Api`], using the Graph API error envelope when the body
//! carries one.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::error::ThreadsError;
use super::types::{
    ApiErrorEnvelope, POST_FIELDS, PostsPage, TokenResponse, ThreadsPost, UserProfile,
};
use crate::config::ThreadsApiConfig;

/// OAuth application credentials used for the code exchange.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Application id.
    pub client_id: String,
    /// Application secret.
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Client for the Threads Graph API.
///
/// Holds the HTTP client, the API host and the version segment. Use
/// [`ThreadsClient::new`] with the configured host, or point it at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct ThreadsClient {
    client: Client,
    base_url: Url,
    api_version: String,
}

impl ThreadsClient {
    /// Creates a client from the shared API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ThreadsError::InvalidBaseUrl`] if the
    /// base URL does not parse.
    pub fn new(config: &ThreadsApiConfig) -> Result<Self, ThreadsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("threadgems/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| ThreadsError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self {
            client,
            base_url,
            api_version: config.api_version.trim_matches('/').to_string(),
        })
    }

    /// Exchanges an authorization code for a user access token.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::Api`] if the token endpoint rejects the code.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the body is not a token response.
    pub async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ThreadsError> {
        let url = self.url("oauth/access_token")?;
        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
            ("code", code),
        ];

        let response = self.client.post(url).form(&form).send().await?;
        Self::decode(response, "oauth/access_token").await
    }

    /// Fetches the profile behind `access_token`, limited to `fields`.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::Api`] if the token is rejected.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the body is not a profile.
    pub async fn get_profile(
        &self,
        access_token: &str,
        fields: &str,
        timeout: Option<Duration>,
    ) -> Result<UserProfile, ThreadsError> {
        let url = self.versioned_url("me")?;
        let mut request = self
            .client
            .get(url)
            .query(&[("access_token", access_token), ("fields", fields)]);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        Self::decode(response, "me").await
    }

    /// Fetches one page of a public profile's posts as raw JSON.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::Api`] on a non-success status.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the body is not JSON.
    pub async fn profile_posts_raw(
        &self,
        access_token: &str,
        username: &str,
        limit: u32,
    ) -> Result<serde_json::Value, ThreadsError> {
        let url = self.versioned_url("profile_posts")?;
        let limit = limit.to_string();
        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", access_token),
                ("username", username),
                ("fields", POST_FIELDS),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        Self::decode(response, "profile_posts").await
    }

    /// Fetches one page of a public profile's posts. No pagination is
    /// followed.
    ///
    /// # Errors
    ///
    /// Same as [`ThreadsClient::profile_posts_raw`], plus
    /// [`ThreadsError::Deserialize`] if a post lacks a required field.
    pub async fn profile_posts(
        &self,
        access_token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<ThreadsPost>, ThreadsError> {
        let body = self.profile_posts_raw(access_token, username, limit).await?;
        let page: PostsPage =
            serde_json::from_value(body).map_err(|e| ThreadsError::Deserialize {
                context: format!("profile_posts(username={username})"),
                source: e,
            })?;
        Ok(page.data)
    }

    fn url(&self, path: &str) -> Result<Url, ThreadsError> {
        self.base_url
            .join(path)
            .map_err(|_| ThreadsError::InvalidBaseUrl(self.base_url.to_string()))
    }

    fn versioned_url(&self, path: &str) -> Result<Url, ThreadsError> {
        if self.api_version.is_empty() {
            self.url(path)
        } else {
            self.url(&format!("{}/{path}", self.api_version))
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ThreadsError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ThreadsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ThreadsError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Extracts the message of a Graph API error envelope, falling back to the
/// raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => {
            let detail = envelope.error;
            match (detail.kind, detail.code) {
                (Some(kind), Some(code)) => format!("{} ({kind}, code {code})", detail.message),
                (Some(kind), None) => format!("{} ({kind})", detail.message),
                (None, Some(code)) => format!("{} (code {code})", detail.message),
                (None, None) => detail.message,
            }
        }
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
