mod file;
mod memory;

pub use self::{file::JsonFileStore, memory::MemoryStore};

use crate::dao::models::GameSnapshotEntity;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over where the whole-game snapshot is kept.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, `None` when nothing was saved yet.
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>>;
    /// Replace the stored snapshot.
    fn save(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Forget the stored snapshot.
    fn clear(&self) -> BoxFuture<'static, StorageResult<()>>;
}
