mod file;
mod in_memory;

pub use file::{FileFormat, FilePersistence};
pub use in_memory::InMemoryPersistence;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::snapshot::{Scope, Snapshot};

/// Asynchronous load/save of a scope's snapshots to durable storage.
///
/// One logical collection per scope, latest save wins. Loading a scope that
/// has never been saved yields an empty collection.
#[async_trait]
pub trait SnapshotPersistence: Send + Sync {
    /// Load all snapshots for the given scope.
    async fn load(&self, scope: &Scope) -> Result<Vec<Snapshot>, PersistenceError>;

    /// Save (or overwrite) all snapshots for the given scope.
    async fn save(&self, scope: &Scope, snapshots: &[Snapshot]) -> Result<(), PersistenceError>;
}
