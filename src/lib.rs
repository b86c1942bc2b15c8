mod browser;
mod error;
mod manager;
mod notify;
mod persistence;
mod registry;
mod snapshot;
mod store;
mod workflow;

pub use browser::SnapshotBrowser;
pub use error::{PersistenceError, SnapshotError};
pub use manager::SnapshotManager;
pub use notify::{ChangeKind, ChangeNotifier, SnapshotsChanged, DEFAULT_CHANGE_CAPACITY};
pub use persistence::{FileFormat, FilePersistence, InMemoryPersistence, SnapshotPersistence};
pub use registry::ScopeRegistry;
pub use snapshot::{Scope, Snapshot, SnapshotDraft};
pub use store::SnapshotStore;
pub use workflow::{CommandOutcome, Confirmation, ConfirmationPrompt, SnapshotWorkflows};
