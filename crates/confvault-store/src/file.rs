//! File-system backend.
//!
//! Each record lives in its own JSON file under the data directory. File
//! names are derived from the url-encoded id and variation, so any id is a
//! valid single path component.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::{ConfigStore, StoredRecord};

/// Extension of record files.
const RECORD_EXTENSION: &str = "json";

/// Separates the encoded id from the encoded variation. Never produced by
/// url-encoding, so names cannot collide.
const KEY_SEPARATOR: char = '@';

/// A store that keeps one JSON file per record.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    open: AtomicBool,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. Nothing is touched on disk
    /// until [`open`](ConfigStore::open).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            open: AtomicBool::new(false),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns true between `open()` and `close()`.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns the file path used for `(id, variation)`.
    pub fn record_path(&self, id: &str, variation: &str) -> PathBuf {
        self.data_dir.join(file_name(id, variation))
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::not_open(self.name()))
        }
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.data_dir
            .join(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn open(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        self.open.store(true, Ordering::Release);

        info!(data_dir = %self.data_dir.display(), "File store opened");
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.open.store(false, Ordering::Release);

        info!(data_dir = %self.data_dir.display(), "File store closed");
        Ok(())
    }

    async fn find_one(&self, id: &str, variation: &str) -> Result<Option<StoredRecord>, StoreError> {
        self.ensure_open()?;
        let path = self.record_path(id, variation);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: StoredRecord = serde_json::from_str(&content)?;

        if !record.matches(id, variation) {
            return Err(StoreError::invalid_record(format!(
                "{} holds '{}' instead of '{}'",
                path.display(),
                record.key(),
                confvault_core::build_cache_key(id, Some(variation))
            )));
        }

        debug!(path = %path.display(), "Record read");
        Ok(Some(record))
    }

    async fn upsert(&self, record: StoredRecord) -> Result<(), StoreError> {
        self.ensure_open()?;
        let path = self.record_path(record.id(), record.variation());
        let tmp = self.tmp_path(&path);

        let content = serde_json::to_vec(&record)?;
        tokio::fs::write(&tmp, content).await?;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), "Record written");
        Ok(())
    }

    async fn delete(&self, id: &str, variation: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let path = self.record_path(id, variation);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Record deleted");
                Ok(true)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_open()?;

        let metadata = tokio::fs::metadata(&self.data_dir).await?;
        if !metadata.is_dir() {
            return Err(StoreError::unavailable(format!(
                "{} is not a directory",
                self.data_dir.display()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

fn file_name(id: &str, variation: &str) -> String {
    format!(
        "{}{}{}.{}",
        urlencoding::encode(id),
        KEY_SEPARATOR,
        urlencoding::encode(variation),
        RECORD_EXTENSION
    )
}
