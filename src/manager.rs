use std::sync::{Arc, RwLock};

use log::debug;
use tokio::sync::broadcast;

use crate::error::SnapshotError;
use crate::notify::{ChangeKind, ChangeNotifier, SnapshotsChanged};
use crate::persistence::SnapshotPersistence;
use crate::snapshot::{Scope, Snapshot};
use crate::store::SnapshotStore;

/// Owns one scope's snapshot store, its persistence, and its change stream.
///
/// Every mutation publishes a [`SnapshotsChanged`] event. Persistence is
/// explicit: callers (typically [`SnapshotWorkflows`](crate::SnapshotWorkflows))
/// invoke [`SnapshotManager::save`] after each mutating operation; reads
/// never touch storage.
pub struct SnapshotManager {
    scope: Scope,
    store: RwLock<SnapshotStore>,
    persistence: Arc<dyn SnapshotPersistence>,
    notifier: ChangeNotifier,
}

impl SnapshotManager {
    pub fn new(scope: Scope, persistence: Arc<dyn SnapshotPersistence>) -> Self {
        SnapshotManager {
            scope,
            store: RwLock::new(SnapshotStore::new()),
            persistence,
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Subscribe to this scope's change stream.
    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotsChanged> {
        self.notifier.subscribe()
    }

    pub fn snapshots(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        let store = self
            .store
            .read()
            .map_err(|_| SnapshotError::LockPoisoned("read"))?;
        Ok(store.snapshots().to_vec())
    }

    pub fn snapshot_count(&self) -> Result<usize, SnapshotError> {
        let store = self
            .store
            .read()
            .map_err(|_| SnapshotError::LockPoisoned("read"))?;
        Ok(store.len())
    }

    pub fn has_snapshots(&self) -> Result<bool, SnapshotError> {
        Ok(self.snapshot_count()? > 0)
    }

    /// Find a snapshot by title, case-insensitively.
    pub fn find_snapshot(&self, title: &str) -> Result<Option<Snapshot>, SnapshotError> {
        let store = self
            .store
            .read()
            .map_err(|_| SnapshotError::LockPoisoned("read"))?;
        Ok(store.find(title).cloned())
    }

    /// Add a snapshot. Fails if the title is already in use; the
    /// confirmed-overwrite path is [`SnapshotManager::replace`].
    pub fn add(&self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let title = snapshot.title().to_string();
        {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.add(snapshot)?;
        }
        self.notify(ChangeKind::Added(title));
        Ok(())
    }

    /// Overwrite the same-titled snapshot, or add if none exists.
    pub fn replace(&self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let title = snapshot.title().to_string();
        {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.replace(snapshot);
        }
        self.notify(ChangeKind::Replaced(title));
        Ok(())
    }

    /// Replace the snapshot at `original_title` with `updated` (an edit).
    /// Fails if the new title collides with a different snapshot.
    pub fn update(&self, original_title: &str, updated: Snapshot) -> Result<(), SnapshotError> {
        let title = updated.title().to_string();
        {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.update(original_title, updated)?;
        }
        self.notify(ChangeKind::Replaced(title));
        Ok(())
    }

    /// Remove the snapshot with the given title. Returns whether it existed.
    pub fn remove(&self, title: &str) -> Result<bool, SnapshotError> {
        let removed = {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.remove(title)
        };
        match removed {
            Some(snapshot) => {
                self.notify(ChangeKind::Removed(snapshot.title().to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop all snapshots from the store without touching persistence.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.clear();
        }
        self.notify(ChangeKind::Cleared);
        Ok(())
    }

    /// Load this scope's snapshots from persistence, replacing the store
    /// contents wholesale. Returns the number of snapshots loaded.
    pub async fn load(&self) -> Result<usize, SnapshotError> {
        let loaded = self.persistence.load(&self.scope).await?;
        let count = loaded.len();

        debug!(
            "loaded {} snapshot(s) for scope '{}'",
            count, self.scope
        );

        {
            let mut store = self
                .store
                .write()
                .map_err(|_| SnapshotError::LockPoisoned("write"))?;
            store.replace_all(loaded);
        }
        self.notify(ChangeKind::Loaded(count));
        Ok(count)
    }

    /// Save this scope's snapshots to persistence.
    pub async fn save(&self) -> Result<(), SnapshotError> {
        // Clone under the lock, then release it before awaiting
        let snapshots = self.snapshots()?;

        debug!(
            "saving {} snapshot(s) for scope '{}'",
            snapshots.len(),
            self.scope
        );

        self.persistence.save(&self.scope, &snapshots).await?;
        Ok(())
    }

    fn notify(&self, change: ChangeKind) {
        self.notifier.publish(SnapshotsChanged {
            scope: self.scope.clone(),
            change,
        });
    }
}
