mod draft;
mod scope;
mod snapshot;

pub use draft::SnapshotDraft;
pub use scope::Scope;
pub use snapshot::Snapshot;
