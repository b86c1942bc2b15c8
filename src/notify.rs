use tokio::sync::broadcast;

use crate::snapshot::Scope;

/// Default capacity of the change broadcast channel. Observers that fall
/// further behind than this see a `Lagged` error and should refresh from the
/// store instead of replaying events.
pub const DEFAULT_CHANGE_CAPACITY: usize = 64;

/// What changed in a scope's store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Added(String),
    Replaced(String),
    Removed(String),
    Loaded(usize),
    Cleared,
}

/// Published whenever a scope's store contents are mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotsChanged {
    pub scope: Scope,
    pub change: ChangeKind,
}

/// Broadcast-channel change notifier.
///
/// Publishing is best-effort: no subscribers, closed receivers, or lagging
/// receivers never block or fail the publisher. There is no UI-thread
/// affinity; receivers consume the stream from whatever task they like.
pub struct ChangeNotifier {
    sender: broadcast::Sender<SnapshotsChanged>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        // broadcast channels require a nonzero capacity
        let (sender, _) = broadcast::channel(capacity.max(1));
        ChangeNotifier { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotsChanged> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: SnapshotsChanged) {
        // send only errors when there are no receivers, which is fine
        let _ = self.sender.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_CAPACITY)
    }
}
