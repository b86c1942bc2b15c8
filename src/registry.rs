use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::SnapshotError;
use crate::manager::SnapshotManager;
use crate::persistence::SnapshotPersistence;
use crate::snapshot::Scope;

/// Resolves a [`SnapshotManager`] per scope, creating and caching one the
/// first time a scope is seen. All managers share the injected persistence
/// backend.
///
/// This is the explicit replacement for ambient scope-keyed service lookup:
/// construct one registry, pass it where managers are needed.
pub struct ScopeRegistry {
    persistence: Arc<dyn SnapshotPersistence>,
    managers: RwLock<HashMap<Scope, Arc<SnapshotManager>>>,
}

impl ScopeRegistry {
    pub fn new(persistence: Arc<dyn SnapshotPersistence>) -> Self {
        ScopeRegistry {
            persistence,
            managers: RwLock::new(HashMap::new()),
        }
    }

    /// The manager for `scope`, created on first use. Repeated calls for the
    /// same scope return the same instance.
    pub fn manager_for(&self, scope: &Scope) -> Result<Arc<SnapshotManager>, SnapshotError> {
        {
            let managers = self
                .managers
                .read()
                .map_err(|_| SnapshotError::LockPoisoned("registry read"))?;
            if let Some(manager) = managers.get(scope) {
                return Ok(manager.clone());
            }
        }

        let mut managers = self
            .managers
            .write()
            .map_err(|_| SnapshotError::LockPoisoned("registry write"))?;
        // Another caller may have created it between the locks
        let manager = managers.entry(scope.clone()).or_insert_with(|| {
            debug!("creating snapshot manager for scope '{}'", scope);
            Arc::new(SnapshotManager::new(
                scope.clone(),
                self.persistence.clone(),
            ))
        });
        Ok(manager.clone())
    }

    pub fn contains(&self, scope: &Scope) -> Result<bool, SnapshotError> {
        let managers = self
            .managers
            .read()
            .map_err(|_| SnapshotError::LockPoisoned("registry read"))?;
        Ok(managers.contains_key(scope))
    }

    /// All scopes with a cached manager.
    pub fn scopes(&self) -> Result<Vec<Scope>, SnapshotError> {
        let managers = self
            .managers
            .read()
            .map_err(|_| SnapshotError::LockPoisoned("registry read"))?;
        Ok(managers.keys().cloned().collect())
    }
}
