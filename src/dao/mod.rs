/// Static song catalog loading.
pub mod catalog;
/// Persisted record definitions and snapshot migration.
pub mod models;
/// Snapshot persistence backends.
pub mod snapshot_store;
/// Storage error types shared by the backends.
pub mod storage;
