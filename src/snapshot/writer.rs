//! Static JSON snapshot files consumed by the front end.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::domain::{DeletionLog, Manifest, ThreadRecord, ThreadType};
use crate::error::SyncError;

/// Every published thread, newest first.
pub const ALL_FILE: &str = "threads-all.json";
/// Text threads only.
pub const TEXT_FILE: &str = "threads-text.json";
/// Image threads only.
pub const IMAGES_FILE: &str = "threads-images.json";
/// The most recent threads.
pub const RECENT_FILE: &str = "threads-recent.json";
/// Generation metadata.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Number of records in [`RECENT_FILE`].
pub const RECENT_COUNT: usize = 10;

/// The four thread lists written per run.
#[derive(Debug, Clone)]
pub struct SnapshotSet<'a> {
    /// Every record, in input order.
    pub all: &'a [ThreadRecord],
    /// Records tagged `text`.
    pub text: Vec<&'a ThreadRecord>,
    /// Records tagged `image`.
    pub images: Vec<&'a ThreadRecord>,
    /// The first [`RECENT_COUNT`] records of `all`.
    pub recent: &'a [ThreadRecord],
}

impl<'a> SnapshotSet<'a> {
    /// Splits an already sorted list. `text` and `images` partition `all`.
    #[must_use]
    pub fn partition(threads: &'a [ThreadRecord]) -> Self {
        let (images, text): (Vec<_>, Vec<_>) = threads
            .iter()
            .partition(|t| t.thread_type == ThreadType::Image);
        Self {
            all: threads,
            text,
            images,
            recent: threads.get(..RECENT_COUNT).unwrap_or(threads),
        }
    }
}

/// Reads and writes snapshot files inside one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Creates a writer rooted at `dir`. Nothing is touched until a write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file named `name` inside the output directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Loads the previously published `threads-all.json` as raw JSON
    /// records, so files written by older generations still load.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file exists but cannot be read, or
    /// [`SyncError::Json`] if it does not hold a JSON array.
    pub async fn load_previous(&self) -> Result<Option<Vec<Value>>, SyncError> {
        let path = self.path(ALL_FILE);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(source) => return Err(SyncError::Io { path, source }),
        }
        read_json(&path).await.map(Some)
    }

    /// Writes the four thread lists and the manifest, overwriting earlier
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the directory cannot be created or a
    /// file cannot be written.
    pub async fn write_snapshot(
        &self,
        threads: &[ThreadRecord],
        sources: &[&str],
        now: DateTime<Utc>,
    ) -> Result<Manifest, SyncError> {
        self.ensure_dir().await?;

        let set = SnapshotSet::partition(threads);
        self.write_list(ALL_FILE, set.all, set.all.len()).await?;
        self.write_list(TEXT_FILE, &set.text, set.text.len()).await?;
        self.write_list(IMAGES_FILE, &set.images, set.images.len())
            .await?;
        self.write_list(RECENT_FILE, set.recent, set.recent.len())
            .await?;

        let manifest = Manifest::new(threads, sources, now);
        let path = self.path(MANIFEST_FILE);
        write_json(&path, &manifest).await?;
        tracing::info!(path = %path.display(), "generated manifest");

        Ok(manifest)
    }

    /// Writes `deletions-YYYYMMDD-HHMMSS.json` for `log`.
    ///
    /// Existing logs are never overwritten: if the name is taken, `-1`,
    /// `-2`, ... is appended until a free name is found.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be created or written.
    pub async fn write_deletion_log(&self, log: &DeletionLog) -> Result<PathBuf, SyncError> {
        self.ensure_dir().await?;
        let bytes = to_json_bytes(&self.path(&deletion_log_name(log.deleted_at)), log)?;

        let mut attempt = 0_u32;
        loop {
            let path = self.path(&numbered_deletion_log_name(log.deleted_at, attempt));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "deletion log name taken");
                    attempt += 1;
                    continue;
                }
                Err(source) => return Err(SyncError::Io { path, source }),
            };
            let written = match file.write_all(&bytes).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            return match written {
                Ok(()) => Ok(path),
                Err(source) => Err(SyncError::Io { path, source }),
            };
        }
    }

    async fn write_list<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
        count: usize,
    ) -> Result<(), SyncError> {
        let path = self.path(name);
        write_json(&path, data).await?;
        tracing::info!(path = %path.display(), count, "generated snapshot file");
        Ok(())
    }

    async fn ensure_dir(&self) -> Result<(), SyncError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SyncError::Io {
                path: self.dir.clone(),
                source,
            })
    }
}

/// File name of the deletion log written at `at`.
///
/// Second resolution only; [`SnapshotWriter::write_deletion_log`] adds a
/// numeric suffix when two logs share a second.
#[must_use]
pub fn deletion_log_name(at: DateTime<Utc>) -> String {
    numbered_deletion_log_name(at, 0)
}

fn numbered_deletion_log_name(at: DateTime<Utc>, attempt: u32) -> String {
    let stamp = at.format("%Y%m%d-%H%M%S");
    if attempt == 0 {
        format!("deletions-{stamp}.json")
    } else {
        format!("deletions-{stamp}-{attempt}.json")
    }
}

fn to_json_bytes<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<Vec<u8>, SyncError> {
    let mut bytes = serde_json::to_vec_pretty(data).map_err(|source| SyncError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), SyncError> {
    let bytes = to_json_bytes(path, data)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SyncError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SyncError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SyncError::Json {
        path: path.to_path_buf(),
        source,
    })
}
