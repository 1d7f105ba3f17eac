use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::MedalTableEntry;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::io::AsyncWriteExt;

use crate::error::PersistenceError;

/// Durable home of the last real medal table.
pub trait SnapshotStore: Send + Sync {
    fn save<'f, 'd, 'own>(
        &'own self,
        data: &'d [MedalTableEntry],
    ) -> BoxFuture<'f, Result<(), PersistenceError>>
    where
        'd: 'f,
        'own: 'f;

    /// `Ok(None)` when nothing has been saved yet.
    fn load<'f, 'own>(&'own self) -> BoxFuture<'f, Result<Option<Vec<MedalTableEntry>>, PersistenceError>>
    where
        'own: 'f;

    /// When the stored snapshot was written, if the store knows.
    fn saved_at<'f, 'own>(&'own self) -> BoxFuture<'f, Result<Option<DateTime<Utc>>, PersistenceError>>
    where
        'own: 'f,
    {
        async { Ok(None) }.boxed()
    }
}

/// Stores the snapshot as a JSON array in a single file.
///
/// Writes go to `<path>.tmp` first and are renamed over `<path>`, so a reader
/// either sees the previous file or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
}

impl FileStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn io_error(&self, path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError {
        let path = path.to_path_buf();
        move |source| PersistenceError::Io { path, source }
    }
}

impl SnapshotStore for FileStore {
    fn save<'f, 'd, 'own>(
        &'own self,
        data: &'d [MedalTableEntry],
    ) -> BoxFuture<'f, Result<(), PersistenceError>>
    where
        'd: 'f,
        'own: 'f,
    {
        async move {
            let encoded = serde_json::to_vec_pretty(data).map_err(PersistenceError::Encode)?;

            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(self.io_error(parent))?;
            }

            let tmp_path = self.temp_path();
            async {
                let mut file = tokio::fs::File::create(&tmp_path).await?;
                file.write_all(&encoded).await?;
                file.sync_all().await?;
                Ok::<_, std::io::Error>(())
            }
            .await
            .map_err(self.io_error(&tmp_path))?;

            tokio::fs::rename(&tmp_path, self.path.as_path())
                .await
                .map_err(self.io_error(&self.path))?;

            tracing::debug!(path = ?self.path, "Saved snapshot of {} countries", data.len());
            Ok(())
        }
        .boxed()
    }

    fn load<'f, 'own>(&'own self) -> BoxFuture<'f, Result<Option<Vec<MedalTableEntry>>, PersistenceError>>
    where
        'own: 'f,
    {
        async move {
            let raw = match tokio::fs::read(self.path.as_path()).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(self.io_error(&self.path)(e)),
            };

            let data = serde_json::from_slice(&raw).map_err(|source| PersistenceError::Corrupt {
                path: self.path.to_path_buf(),
                source,
            })?;

            Ok(Some(data))
        }
        .boxed()
    }

    fn saved_at<'f, 'own>(&'own self) -> BoxFuture<'f, Result<Option<DateTime<Utc>>, PersistenceError>>
    where
        'own: 'f,
    {
        async move {
            let metadata = match tokio::fs::metadata(self.path.as_path()).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(self.io_error(&self.path)(e)),
            };

            let modified = metadata.modified().map_err(self.io_error(&self.path))?;
            Ok(Some(DateTime::<Utc>::from(modified)))
        }
        .boxed()
    }
}
