//! Configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing goes through a key lookup
//! closure so the same code serves the real environment and tests.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default Threads Graph API host.
pub const DEFAULT_API_BASE_URL: &str = "https://graph.threads.net";

/// Default Graph API version path segment.
pub const DEFAULT_API_VERSION: &str = "v1.0";

/// Default host for the user-facing authorization dialog.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://threads.net";

/// Origins allowed to call the API with credentials when
/// `CORS_ALLOWED_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:3000",
    "https://threadgems.com",
];

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is present but cannot be parsed.
    #[error("invalid value for {key}: {value}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },
}

/// Connection settings for the Threads Graph API, shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadsApiConfig {
    /// Graph API host, without the version segment.
    pub base_url: String,
    /// Version path segment (e.g. `v1.0`).
    pub api_version: String,
    /// Default request timeout in seconds.
    pub timeout_secs: u64,
}

/// PostgreSQL document store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum idle connections in the pool.
    pub min_connections: u32,
    /// Timeout in seconds for acquiring a connection.
    pub connect_timeout_secs: u64,
}

/// Configuration for the OAuth session server.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// OAuth application id.
    pub client_id: String,

    /// OAuth application secret.
    pub client_secret: String,

    /// Redirect URI used when a caller does not supply one.
    pub redirect_uri: Option<String>,

    /// Host serving the authorization dialog.
    pub auth_base_url: String,

    /// Graph API connection settings.
    pub api: ThreadsApiConfig,

    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,

    /// Origins allowed by the CORS layer.
    pub cors_allowed_origins: Vec<String>,

    /// Document store settings; `None` disables persistence.
    pub database: Option<DatabaseConfig>,

    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the OAuth credentials are missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the OAuth credentials are missing or a
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = match non_empty(&lookup, "LISTEN_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                value: raw,
            })?,
            None => {
                let port: u16 = parse_var(&lookup, "PORT", 8000);
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let client_id =
            non_empty(&lookup, "THREADS_CLIENT_ID").ok_or(ConfigError::Missing("THREADS_CLIENT_ID"))?;
        let client_secret = non_empty(&lookup, "THREADS_CLIENT_SECRET")
            .ok_or(ConfigError::Missing("THREADS_CLIENT_SECRET"))?;

        let cors_allowed_origins = non_empty(&lookup, "CORS_ALLOWED_ORIGINS").map_or_else(
            || DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect(),
            |raw| split_list(&raw),
        );

        Ok(Self {
            listen_addr,
            client_id,
            client_secret,
            redirect_uri: non_empty(&lookup, "THREADS_REDIRECT_URI"),
            auth_base_url: non_empty(&lookup, "THREADS_AUTH_BASE_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string()),
            api: api_config(&lookup),
            cookie_secure: parse_bool(&lookup, "COOKIE_SECURE", true),
            cors_allowed_origins,
            database: database_config(&lookup),
            log_json: log_json(&lookup),
        })
    }
}

/// Configuration for the snapshot updater.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Long-lived access token used for every profile fetch.
    pub access_token: String,

    /// Graph API connection settings.
    pub api: ThreadsApiConfig,

    /// Directory receiving the snapshot files.
    pub output_dir: PathBuf,

    /// Maximum posts requested per account.
    pub posts_per_account: u32,

    /// Document store settings; `None` disables persistence.
    pub database: Option<DatabaseConfig>,

    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl UpdaterConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `THREADS_ACCESS_TOKEN` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `THREADS_ACCESS_TOKEN` is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = non_empty(&lookup, "THREADS_ACCESS_TOKEN")
            .ok_or(ConfigError::Missing("THREADS_ACCESS_TOKEN"))?;

        Ok(Self {
            access_token,
            api: api_config(&lookup),
            output_dir: non_empty(&lookup, "OUTPUT_DIR")
                .map_or_else(|| PathBuf::from("public/data"), PathBuf::from),
            posts_per_account: parse_var(&lookup, "POSTS_PER_ACCOUNT", 20),
            database: database_config(&lookup),
            log_json: log_json(&lookup),
        })
    }
}

fn api_config<F: Fn(&str) -> Option<String>>(lookup: &F) -> ThreadsApiConfig {
    ThreadsApiConfig {
        base_url: non_empty(lookup, "THREADS_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        api_version: non_empty(lookup, "THREADS_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        timeout_secs: parse_var(lookup, "HTTP_TIMEOUT_SECS", 10),
    }
}

/// Persistence is on only when a URL is present and the master switch is
/// not turned off.
fn database_config<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<DatabaseConfig> {
    if !parse_bool(lookup, "PERSISTENCE_ENABLED", true) {
        return None;
    }
    let url = non_empty(lookup, "DATABASE_URL")?;
    Some(DatabaseConfig {
        url,
        max_connections: parse_var(lookup, "DATABASE_MAX_CONNECTIONS", 10),
        min_connections: parse_var(lookup, "DATABASE_MIN_CONNECTIONS", 1),
        connect_timeout_secs: parse_var(lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
    })
}

fn log_json<F: Fn(&str) -> Option<String>>(lookup: &F) -> bool {
    non_empty(lookup, "LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"))
}

fn non_empty<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: bool) -> bool {
    match non_empty(lookup, key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
