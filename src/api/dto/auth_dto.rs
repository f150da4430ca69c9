//! DTOs for the `/api/auth` endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request body for `POST /api/auth/callback`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CallbackRequest {
    /// Authorization code returned by the Threads dialog.
    pub code: String,
    /// Redirect URI used when the code was issued.
    pub redirect_uri: String,
}

/// Response body for `POST /api/auth/callback`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallbackResponse {
    /// Always `true`.
    pub success: bool,
    /// Threads user id.
    pub user_id: String,
    /// Handle, when the profile fetch succeeded.
    pub username: Option<String>,
    /// Human-readable outcome.
    pub message: String,
}

/// Response body for `POST /api/auth/logout`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Response body for `POST /api/auth/verify`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Always `true`; failures answer 401 instead.
    pub valid: bool,
    /// Threads user id.
    pub user_id: Option<String>,
    /// Handle.
    pub username: Option<String>,
    /// The verified token, echoed for front-end API calls.
    pub access_token: String,
}

/// Query for `GET /api/auth/authorize`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    /// Where Threads sends the user back; defaults to the configured URI.
    pub redirect_uri: Option<String>,
    /// Comma-separated scopes; defaults to `threads_basic`.
    pub scope: Option<String>,
}

impl AuthorizeParams {
    /// Requested scopes, trimmed, blanks dropped.
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

/// Response body for `GET /api/auth/authorize`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorizeResponse {
    /// Authorization dialog URL.
    pub url: String,
    /// CSRF state to compare on callback.
    pub state: String,
}
