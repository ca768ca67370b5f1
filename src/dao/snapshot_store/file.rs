use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    models::GameSnapshotEntity,
    snapshot_store::SnapshotStore,
    storage::{StorageError, StorageResult},
};

/// Keeps the snapshot as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
}

impl JsonFileStore {
    /// Store the snapshot at `path`; parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Location of the snapshot document.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>> {
        let path = self.path.clone();
        Box::pin(async move {
            let bytes = match fs::read(path.as_path()).await {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => {
                    return Err(StorageError::unavailable(
                        format!("failed to read `{}`", path.display()),
                        err,
                    ));
                }
            };

            serde_json::from_slice(&bytes).map(Some).map_err(|err| {
                StorageError::corrupt(format!("failed to decode `{}`", path.display()), err)
            })
        })
    }

    fn save(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            let payload = serde_json::to_vec_pretty(&snapshot).map_err(|err| {
                StorageError::corrupt("failed to encode snapshot".into(), err)
            })?;

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|err| {
                    StorageError::unavailable(
                        format!("failed to create `{}`", parent.display()),
                        err,
                    )
                })?;
            }

            // write-then-rename so a crash never leaves a half-written snapshot
            let staging = path.with_extension("json.tmp");
            fs::write(&staging, payload).await.map_err(|err| {
                StorageError::unavailable(format!("failed to write `{}`", staging.display()), err)
            })?;
            fs::rename(&staging, path.as_path()).await.map_err(|err| {
                StorageError::unavailable(format!("failed to replace `{}`", path.display()), err)
            })
        })
    }

    fn clear(&self) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            match fs::remove_file(path.as_path()).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(StorageError::unavailable(
                    format!("failed to remove `{}`", path.display()),
                    err,
                )),
            }
        })
    }
}
