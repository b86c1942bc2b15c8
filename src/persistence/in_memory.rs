use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::snapshot::{Scope, Snapshot};

use super::SnapshotPersistence;

/// In-memory persistence backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage). Useful for
/// tests and single-process scenarios where durability is not needed.
#[derive(Clone)]
pub struct InMemoryPersistence {
    storage: Arc<RwLock<HashMap<Scope, Vec<Snapshot>>>>,
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Peek at what has been saved for a scope, for assertions in tests.
    pub fn saved(&self, scope: &Scope) -> Result<Option<Vec<Snapshot>>, PersistenceError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| PersistenceError::Storage("lock poisoned during read".into()))?;
        Ok(storage.get(scope).cloned())
    }
}

#[async_trait]
impl SnapshotPersistence for InMemoryPersistence {
    async fn load(&self, scope: &Scope) -> Result<Vec<Snapshot>, PersistenceError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| PersistenceError::Storage("lock poisoned during load".into()))?;
        Ok(storage.get(scope).cloned().unwrap_or_default())
    }

    async fn save(&self, scope: &Scope, snapshots: &[Snapshot]) -> Result<(), PersistenceError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| PersistenceError::Storage("lock poisoned during save".into()))?;
        storage.insert(scope.clone(), snapshots.to_vec());
        Ok(())
    }
}
