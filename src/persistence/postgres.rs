//! PostgreSQL implementation of the document store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::StoreError;
use super::models::{StoredThread, StoredUser};
use crate::config::DatabaseConfig;
use crate::domain::{ThreadRecord, TokenRecord};

/// PostgreSQL-backed document store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store around an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from `config` and applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database is unreachable, or
    /// [`StoreError::Migrate`] if a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Writes the token document for `record.user_id`, replacing any
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on encoding or database failure.
    pub async fn upsert_user(&self, record: &TokenRecord) -> Result<(), StoreError> {
        let profile = serde_json::to_value(&record.profile)?;
        sqlx::query(
            "INSERT INTO users (user_id, access_token, token_created_at, profile, last_updated) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
               access_token = EXCLUDED.access_token, \
               token_created_at = EXCLUDED.token_created_at, \
               profile = EXCLUDED.profile, \
               last_updated = EXCLUDED.last_updated",
        )
        .bind(&record.user_id)
        .bind(&record.access_token)
        .bind(record.token_created_at)
        .bind(profile)
        .bind(record.last_updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Loads the stored user document without the token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on database failure.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>, StoreError> {
        let row = sqlx::query_as::<_, StoredUser>(
            "SELECT user_id, profile, token_created_at, last_updated FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Merge-writes every thread document in one transaction.
    ///
    /// Existing keys not present in the new document survive; `cached_at`
    /// is set by the server and `expires_at` to the given instant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on encoding or database failure. Nothing is
    /// committed in that case.
    pub async fn upsert_threads(
        &self,
        threads: &[ThreadRecord],
        expires_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for thread in threads {
            let doc = serde_json::to_value(thread)?;
            let result = sqlx::query(
                "INSERT INTO curated_threads (id, doc, cached_at, expires_at) \
                 VALUES ($1, $2, now(), $3) \
                 ON CONFLICT (id) DO UPDATE SET \
                   doc = curated_threads.doc || EXCLUDED.doc, \
                   cached_at = now(), \
                   expires_at = EXCLUDED.expires_at",
            )
            .bind(&thread.id)
            .bind(doc)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;
            written = written.saturating_add(result.rows_affected());
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Loads one thread document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on database failure.
    pub async fn get_thread(&self, id: &str) -> Result<Option<StoredThread>, StoreError> {
        let row = sqlx::query_as::<_, StoredThread>(
            "SELECT id, doc, cached_at, expires_at FROM curated_threads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
