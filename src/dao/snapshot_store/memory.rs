use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::dao::{
    models::GameSnapshotEntity, snapshot_store::SnapshotStore, storage::StorageResult,
};

/// Keeps the snapshot in process memory; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<GameSnapshotEntity>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot.
    pub fn with_snapshot(snapshot: GameSnapshotEntity) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot))),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>> {
        let slot = self.slot.clone();
        Box::pin(async move { Ok(slot.lock().await.clone()) })
    }

    fn save(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let slot = self.slot.clone();
        Box::pin(async move {
            slot.lock().await.replace(snapshot);
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'static, StorageResult<()>> {
        let slot = self.slot.clone();
        Box::pin(async move {
            slot.lock().await.take();
            Ok(())
        })
    }
}
