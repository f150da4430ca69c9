//! Batch pipeline behind `threadgems-update`: fetch, filter, transform,
//! diff against the previous snapshot, persist and publish.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::manifest::REFRESH_INTERVAL_HOURS;
use crate::domain::{KeywordFilter, Manifest, TARGET_ACCOUNTS, ThreadRecord, sort_newest_first};
use crate::error::SyncError;
use crate::persistence::PostgresStore;
use crate::snapshot::{SnapshotWriter, TrackingOutcome, track_deletions};
use crate::threads::ThreadsClient;

/// Result of a complete run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every account came back empty after filtering; nothing was written.
    NothingFetched,
    /// The snapshot was published.
    Published(RunSummary),
}

/// What one published run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Manifest written alongside the snapshot.
    pub manifest: Manifest,
    /// Deletion tracking result; `None` if tracking failed.
    pub tracking: Option<TrackingOutcome>,
    /// Documents written to the store; `None` if the store was skipped or
    /// the write failed.
    pub persisted: Option<u64>,
}

/// Fetch-filter-transform pipeline over a fixed set of accounts.
#[derive(Debug, Clone)]
pub struct Updater {
    client: ThreadsClient,
    access_token: String,
    accounts: Vec<String>,
    limit: u32,
    filter: KeywordFilter,
    writer: SnapshotWriter,
    store: Option<PostgresStore>,
}

impl Updater {
    /// Creates an updater for the default accounts and design keywords.
    #[must_use]
    pub fn new(
        client: ThreadsClient,
        access_token: String,
        limit: u32,
        writer: SnapshotWriter,
        store: Option<PostgresStore>,
    ) -> Self {
        Self {
            client,
            access_token,
            accounts: TARGET_ACCOUNTS.iter().map(ToString::to_string).collect(),
            limit,
            filter: KeywordFilter::design(),
            writer,
            store,
        }
    }

    /// Replaces the account list.
    #[must_use]
    pub fn with_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Accounts fetched, in order.
    #[must_use]
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Fetches every account in turn and returns the matching records,
    /// newest first.
    ///
    /// An account whose fetch fails contributes nothing.
    pub async fn fetch_all<R: Rng + Send>(&self, rng: &mut R) -> Vec<ThreadRecord> {
        let fetched_at = Utc::now();
        let mut records = Vec::new();

        for account in &self.accounts {
            tracing::info!(account = %account, "fetching threads");
            let posts = match self
                .client
                .profile_posts(&self.access_token, account, self.limit)
                .await
            {
                Ok(posts) => posts,
                Err(e) => {
                    tracing::warn!(account = %account, error = %e, "fetch failed, skipping account");
                    continue;
                }
            };

            let before = records.len();
            records.extend(
                posts
                    .iter()
                    .filter(|post| self.filter.matches_post(post))
                    .map(|post| ThreadRecord::from_post(post, &mut *rng, fetched_at)),
            );
            tracing::info!(
                account = %account,
                fetched = posts.len(),
                kept = records.len().saturating_sub(before),
                "filtered account posts"
            );
        }

        sort_newest_first(&mut records);
        records
    }

    /// Runs the whole pipeline once.
    ///
    /// Deletion tracking and persistence failures are logged and do not
    /// stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] only if the snapshot files cannot be written.
    pub async fn run<R: Rng + Send>(&self, rng: &mut R) -> Result<RunOutcome, SyncError> {
        tracing::info!(accounts = self.accounts.len(), limit = self.limit, "starting update");

        let threads = self.fetch_all(rng).await;
        if threads.is_empty() {
            tracing::error!("no threads fetched, aborting");
            return Ok(RunOutcome::NothingFetched);
        }
        tracing::info!(total = threads.len(), "fetched design threads");

        let now = Utc::now();
        let tracking = match track_deletions(&self.writer, &threads, now).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "deletion tracking failed");
                None
            }
        };

        let persisted = self.persist(&threads, now).await;

        let sources: Vec<&str> = self.accounts.iter().map(String::as_str).collect();
        let manifest = self.writer.write_snapshot(&threads, &sources, now).await?;
        tracing::info!(
            total = manifest.total_threads,
            text = manifest.by_type.text,
            image = manifest.by_type.image,
            dir = %self.writer.dir().display(),
            "update complete"
        );

        Ok(RunOutcome::Published(RunSummary {
            manifest,
            tracking,
            persisted,
        }))
    }

    async fn persist(&self, threads: &[ThreadRecord], now: DateTime<Utc>) -> Option<u64> {
        let Some(store) = &self.store else {
            tracing::warn!("document store not available, skipping cache write");
            return None;
        };
        let expires_at = now + Duration::hours(REFRESH_INTERVAL_HOURS);
        match store.upsert_threads(threads, expires_at).await {
            Ok(written) => {
                tracing::info!(written, "cached threads in document store");
                Some(written)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to cache threads");
                None
            }
        }
    }
}
