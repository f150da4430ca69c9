//! Error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type for the HTTP service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! [`SyncError`] covers the filesystem side of the snapshot updater.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1101,
///     "message": "token exchange failed: invalid code"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`AppError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Client          | 400 Bad Request           |
/// | 2000–2999 | Session         | 401 Unauthorized          |
/// | 3000–3999 | Server          | 500 Internal Server Error |
/// | 5000–5999 | Upstream        | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The authorization code could not be exchanged for a token.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The token endpoint answered without a user id or access token.
    #[error("invalid token response")]
    InvalidTokenResponse,

    /// No session cookie was presented.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// The session token was rejected upstream.
    #[error("token verification failed")]
    InvalidToken,

    /// The Threads API failed while serving an authenticated request.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::TokenExchange(_) => 1101,
            Self::InvalidTokenResponse => 1102,
            Self::Unauthenticated(_) => 2001,
            Self::InvalidToken => 2002,
            Self::Internal(_) => 3000,
            Self::Upstream(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::TokenExchange(_) | Self::InvalidTokenResponse => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated(_) | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Failures of the snapshot updater.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Reading or writing a snapshot file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file could not be encoded or decoded.
    #[error("json error on {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
