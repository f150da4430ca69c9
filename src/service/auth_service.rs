//! Auth service: OAuth code exchange, session checks and proxied profile
//! reads.

use std::time::Duration;

use reqwest::Url;

use crate::domain::TokenRecord;
use crate::error::AppError;
use crate::persistence::PostgresStore;
use crate::threads::types::{PROFILE_FIELDS, VERIFY_FIELDS};
use crate::threads::{ClientCredentials, ThreadsClient, ThreadsError, UserProfile};

/// Timeout for the token check behind `POST /api/auth/verify`.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Scope requested when the caller does not name one.
pub const DEFAULT_SCOPE: &str = "threads_basic";

/// Result of a successful code exchange.
#[derive(Debug, Clone)]
pub struct Login {
    /// Threads user id.
    pub user_id: String,
    /// Access token to place in the session cookie.
    pub access_token: String,
    /// Profile fetched after the exchange; empty if that call failed.
    pub profile: UserProfile,
}

/// Identity confirmed by the token check.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    /// Threads user id.
    pub user_id: Option<String>,
    /// Handle.
    pub username: Option<String>,
}

/// Authorization dialog URL with its CSRF state.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    /// URL to send the browser to.
    pub url: String,
    /// Opaque state the front end must compare on callback.
    pub state: String,
}

/// Stateless coordinator for the session endpoints.
///
/// Owns the Threads client, the OAuth credentials and the optional
/// document store. Every call is independent; nothing is cached.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ThreadsClient,
    credentials: ClientCredentials,
    auth_base_url: String,
    default_redirect_uri: Option<String>,
    store: Option<PostgresStore>,
}

impl AuthService {
    /// Creates a new `AuthService`.
    #[must_use]
    pub fn new(
        client: ThreadsClient,
        credentials: ClientCredentials,
        auth_base_url: String,
        default_redirect_uri: Option<String>,
        store: Option<PostgresStore>,
    ) -> Self {
        Self {
            client,
            credentials,
            auth_base_url,
            default_redirect_uri,
            store,
        }
    }

    /// Whether a document store is attached.
    #[must_use]
    pub fn store_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Builds the authorization dialog URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] when neither the caller nor the
    /// configuration provides a redirect URI, and [`AppError::Internal`] if
    /// the configured auth host is not a URL.
    pub fn authorize_url(
        &self,
        redirect_uri: Option<&str>,
        scopes: &[String],
    ) -> Result<AuthorizeRequest, AppError> {
        let redirect_uri = redirect_uri
            .filter(|r| !r.is_empty())
            .or(self.default_redirect_uri.as_deref())
            .ok_or_else(|| AppError::InvalidRequest("redirect_uri is required".to_string()))?;

        let scope = if scopes.is_empty() {
            DEFAULT_SCOPE.to_string()
        } else {
            scopes.join(",")
        };
        let state = uuid::Uuid::new_v4().simple().to_string();

        let endpoint = format!("{}/oauth/authorize", self.auth_base_url.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", scope.as_str()),
                ("response_type", "code"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AppError::Internal(format!("invalid auth base URL: {e}")))?;

        Ok(AuthorizeRequest {
            url: url.into(),
            state,
        })
    }

    /// Exchanges `code`, fetches the profile and stores the token.
    ///
    /// The profile fetch and the store write never fail the login; their
    /// errors are logged and the login proceeds with what it has.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TokenExchange`] if the exchange call fails, or
    /// [`AppError::InvalidTokenResponse`] if the answer lacks a user id or
    /// token.
    pub async fn login(&self, code: &str, redirect_uri: &str) -> Result<Login, AppError> {
        let token = self
            .client
            .exchange_code(&self.credentials, code, redirect_uri)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "token exchange failed");
                AppError::TokenExchange(e.to_string())
            })?;

        let (Some(user_id), Some(access_token)) = (token.user_id, token.access_token) else {
            return Err(AppError::InvalidTokenResponse);
        };
        tracing::info!(%user_id, "token exchange successful");

        let profile = self.profile_or_empty(&access_token).await;
        self.store_token(TokenRecord::new(
            user_id.clone(),
            access_token.clone(),
            profile.clone(),
        ))
        .await;

        Ok(Login {
            user_id,
            access_token,
            profile,
        })
    }

    /// Checks `access_token` with a single profile call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] on any failure, including
    /// transport errors.
    pub async fn verify(&self, access_token: &str) -> Result<VerifiedUser, AppError> {
        match self
            .client
            .get_profile(access_token, VERIFY_FIELDS, Some(VERIFY_TIMEOUT))
            .await
        {
            Ok(profile) => Ok(VerifiedUser {
                user_id: profile.id,
                username: profile.username,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "token verification failed");
                Err(AppError::InvalidToken)
            }
        }
    }

    /// Returns the full profile behind `access_token`, or an empty profile
    /// when the API call fails.
    pub async fn profile_or_empty(&self, access_token: &str) -> UserProfile {
        match self
            .client
            .get_profile(access_token, PROFILE_FIELDS, None)
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(error = %e, "profile fetch failed");
                UserProfile::default()
            }
        }
    }

    /// Proxies one page of `username`'s posts using the caller's token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] if the Threads API call fails.
    pub async fn profile_posts(
        &self,
        access_token: &str,
        username: &str,
        limit: u32,
    ) -> Result<serde_json::Value, AppError> {
        self.client
            .profile_posts_raw(access_token, username, limit)
            .await
            .map_err(|e: ThreadsError| {
                tracing::error!(username, error = %e, "failed to fetch threads");
                AppError::Upstream(format!("failed to fetch threads: {e}"))
            })
    }

    async fn store_token(&self, record: TokenRecord) {
        let Some(store) = &self.store else {
            tracing::warn!("document store not available, skipping token storage");
            return;
        };
        match store.upsert_user(&record).await {
            Ok(()) => tracing::info!(user_id = %record.user_id, "stored token"),
            Err(e) => tracing::error!(user_id = %record.user_id, error = %e, "failed to store user token"),
        }
    }
}
