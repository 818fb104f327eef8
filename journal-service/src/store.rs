//! JSON-file backed collection store.
//!
//! One store owns one document (`<data_dir>/<resource>.json`) holding the full
//! array of records. Every mutation loads the document, changes the in-memory
//! copy and writes the whole array back through a temp file + rename, so a
//! reader never sees a half-written document.
//!
//! Mutations are serialized per store by `write_lock`. `load` and `save` are
//! public building blocks; code that chains them by hand does so outside the
//! lock and can lose updates.

use crate::error::{StoreError, StoreResult};
use journal_types::{Record, ResourceKind};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct CollectionStore<R: Record> {
    dir: PathBuf,
    path: PathBuf,
    reject_duplicate_ids: bool,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> CollectionStore<R> {
    /// Opens the collection for `R` inside `data_dir`, creating the directory
    /// if needed. The document itself is created lazily on first save.
    pub async fn open(data_dir: &Path, reject_duplicate_ids: bool) -> StoreResult<Self> {
        fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StoreError::storage(data_dir, e))?;

        let path = data_dir.join(R::KIND.file_name());
        log::info!("Opened {} collection at {}", R::KIND, path.display());

        Ok(Self {
            dir: data_dir.to_path_buf(),
            path,
            reject_duplicate_ids,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the durable document.
    ///
    /// A missing, unreadable or corrupt document yields an empty collection.
    /// Any JSON array is a valid document: records are kept whatever their
    /// field types. Only an inaccessible data directory is an error.
    pub async fn load(&self) -> StoreResult<Vec<R>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(self.parse(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.check_dir().await?;
                Ok(Vec::new())
            }
            Err(e) => {
                self.check_dir().await?;
                log::warn!(
                    "Failed to read {}: {}; serving empty {}",
                    self.path.display(),
                    e,
                    R::KIND
                );
                Ok(Vec::new())
            }
        }
    }

    fn parse(&self, bytes: &[u8]) -> Vec<R> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Vec::new();
        }
        match serde_json::from_slice(bytes) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "Corrupt {} document {}: {}; serving empty collection",
                    R::KIND,
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn check_dir(&self) -> StoreResult<()> {
        let meta = fs::metadata(&self.dir)
            .await
            .map_err(|e| StoreError::storage(&self.dir, e))?;
        if !meta.is_dir() {
            return Err(StoreError::storage(
                &self.dir,
                std::io::Error::new(ErrorKind::NotADirectory, "data path is not a directory"),
            ));
        }
        Ok(())
    }

    /// Overwrites the durable document with `records`, pretty-printed.
    ///
    /// Either the new document is fully in place or the old one is untouched.
    pub async fn save(&self, records: &[R]) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::storage(&self.path, std::io::Error::other(e)))?;

        let tmp = self.dir.join(format!(
            ".{}.{}.tmp",
            R::KIND.file_name(),
            uuid::Uuid::new_v4()
        ));

        if let Err(e) = self.write_and_swap(&tmp, &body).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::storage(&self.path, e));
        }
        Ok(())
    }

    async fn write_and_swap(&self, tmp: &Path, body: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(tmp).await?;
        file.write_all(body).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(tmp, &self.path).await
    }

    /// GET path: the whole collection in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<R>> {
        self.load().await
    }

    /// Appends `record` and persists. The id is caller-assigned.
    ///
    /// Duplicate ids are accepted unless the store was opened with
    /// `reject_duplicate_ids`.
    pub async fn create(&self, record: R) -> StoreResult<R> {
        let id = require_id(&record)?.to_string();

        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        if records.iter().any(|r| r.id() == Some(id.as_str())) {
            if self.reject_duplicate_ids {
                return Err(StoreError::DuplicateId {
                    label: R::KIND.label(),
                    id,
                });
            }
            log::warn!("Creating {} with id {:?} that already exists", R::KIND, id);
        }

        records.push(record.clone());
        self.save(&records).await?;
        log::info!("Created {} {}", R::KIND, id);
        Ok(record)
    }

    /// Replaces the record with the same id. Nothing is written on a miss.
    pub async fn update(&self, record: R) -> StoreResult<R> {
        let id = require_id(&record)?.to_string();

        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let Some(slot) = records.iter_mut().find(|r| r.id() == Some(id.as_str())) else {
            return Err(StoreError::NotFound {
                label: R::KIND.label(),
                id,
            });
        };
        *slot = record.clone();

        self.save(&records).await?;
        log::info!("Updated {} {}", R::KIND, id);
        Ok(record)
    }

    /// Drops every record with `id`. Missing ids are not an error.
    pub async fn remove(&self, id: &str) -> StoreResult<String> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|r| r.id() != Some(id));

        if records.len() == before {
            log::debug!("Remove of absent {} {}", R::KIND, id);
        } else {
            self.save(&records).await?;
            log::info!("Removed {} {} ({} record(s))", R::KIND, id, before - records.len());
        }
        Ok(id.to_string())
    }
}

/// The payload's string id; the only field the store interprets.
fn require_id<R: Record>(record: &R) -> StoreResult<&str> {
    match record.id() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        Some(_) => Err(StoreError::InvalidInput(format!(
            "{} id must not be empty",
            R::KIND.label()
        ))),
        None => Err(StoreError::InvalidInput(format!(
            "{} payload must be an object with a string id",
            R::KIND.label()
        ))),
    }
}
