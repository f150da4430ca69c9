//! Persistence layer: PostgreSQL document store for user tokens and
//! curated threads.
//!
//! Persistence is optional. Callers hold an `Option<PostgresStore>` and
//! skip writes when it is `None`, so both binaries run without a database.

pub mod models;
pub mod postgres;

pub use postgres::PostgresStore;

use crate::config::DatabaseConfig;

/// Errors from the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migration failure.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A document could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Connects to the store when configured.
///
/// A connection failure is logged and treated as "no store", matching the
/// behaviour when no database is configured at all.
pub async fn connect_optional(config: Option<&DatabaseConfig>) -> Option<PostgresStore> {
    let Some(config) = config else {
        tracing::warn!("DATABASE_URL not set, running without persistence");
        return None;
    };
    match PostgresStore::connect(config).await {
        Ok(store) => {
            tracing::info!("document store connected");
            Some(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "document store unavailable, running without persistence");
            None
        }
    }
}
