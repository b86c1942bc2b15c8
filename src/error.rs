use std::fmt;

/// Error type for snapshot store, manager, and workflow operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    LockPoisoned(&'static str),
    EmptyTitle,
    DuplicateTitle { title: String },
    NotFound { title: String },
    Persistence(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::LockPoisoned(operation) => {
                write!(f, "snapshot lock poisoned during {}", operation)
            }
            SnapshotError::EmptyTitle => write!(f, "snapshot title must not be empty"),
            SnapshotError::DuplicateTitle { title } => {
                write!(f, "a snapshot with the title '{}' already exists", title)
            }
            SnapshotError::NotFound { title } => {
                write!(f, "no snapshot with the title '{}'", title)
            }
            SnapshotError::Persistence(message) => write!(f, "persistence error: {}", message),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<PersistenceError> for SnapshotError {
    fn from(err: PersistenceError) -> Self {
        SnapshotError::Persistence(err.to_string())
    }
}

/// Error type for persistence backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// I/O-level error.
    Io(String),
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(msg) => write!(f, "io error: {}", msg),
            PersistenceError::Serde(msg) => write!(f, "serialization error: {}", msg),
            PersistenceError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}
