//! Errors returned by the Threads Graph API client.

use thiserror::Error;

/// Errors returned by the Threads Graph API client.
#[derive(Debug, Error)]
pub enum ThreadsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Threads API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the Graph API error envelope, or the raw body.
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        /// Endpoint being decoded.
        context: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
