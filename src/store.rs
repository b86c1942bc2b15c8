use crate::error::SnapshotError;
use crate::snapshot::Snapshot;

/// Ordered collection of snapshots for a single scope.
///
/// Titles are unique within the store, compared case-insensitively.
/// Enumeration returns insertion order. `add` rejects duplicates; the
/// confirmed-overwrite path goes through [`SnapshotStore::replace`].
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        SnapshotStore {
            snapshots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// Find a snapshot by title, case-insensitively.
    pub fn find(&self, title: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.title_matches(title))
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.snapshots.iter().position(|s| s.title_matches(title))
    }

    /// Append a snapshot. Fails if another entry already uses the title.
    pub fn add(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        if self.find(snapshot.title()).is_some() {
            return Err(SnapshotError::DuplicateTitle {
                title: snapshot.title().to_string(),
            });
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Overwrite the same-titled entry (keeping its position), or append if
    /// no entry matches. Returns the replaced snapshot, if any.
    pub fn replace(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        match self.position(snapshot.title()) {
            Some(index) => Some(std::mem::replace(&mut self.snapshots[index], snapshot)),
            None => {
                self.snapshots.push(snapshot);
                None
            }
        }
    }

    /// Replace the entry at `original_title` with `updated`, keeping its
    /// position. Fails if `updated`'s title collides with a *different*
    /// entry, or if the original is missing.
    pub fn update(&mut self, original_title: &str, updated: Snapshot) -> Result<(), SnapshotError> {
        let index = self
            .position(original_title)
            .ok_or_else(|| SnapshotError::NotFound {
                title: original_title.to_string(),
            })?;

        let collision = self
            .snapshots
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.title_matches(updated.title()));
        if collision {
            return Err(SnapshotError::DuplicateTitle {
                title: updated.title().to_string(),
            });
        }

        self.snapshots[index] = updated;
        Ok(())
    }

    /// Remove the snapshot with the given title. Returns it if it existed.
    pub fn remove(&mut self, title: &str) -> Option<Snapshot> {
        self.position(title).map(|index| self.snapshots.remove(index))
    }

    /// Swap the full contents, used when (re)loading from persistence.
    pub fn replace_all(&mut self, snapshots: Vec<Snapshot>) {
        self.snapshots = snapshots;
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
