use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::PersistenceError;
use crate::snapshot::{Scope, Snapshot};

use super::SnapshotPersistence;

/// On-disk encoding of a scope's snapshot collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// Human-readable JSON document, payload bytes base64-encoded.
    Json,
    /// Compact binary encoding (bitcode).
    Binary,
}

impl FileFormat {
    fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Binary => "bin",
        }
    }
}

/// File-per-scope persistence under a base directory.
///
/// The scope key is sanitized into a file stem, so distinct scopes whose
/// keys differ only in non-alphanumeric characters may collide; callers
/// using file persistence should pick scope keys accordingly.
pub struct FilePersistence {
    dir: PathBuf,
    format: FileFormat,
}

impl FilePersistence {
    pub fn json(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, FileFormat::Json)
    }

    pub fn binary(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, FileFormat::Binary)
    }

    pub fn new(dir: impl Into<PathBuf>, format: FileFormat) -> Self {
        FilePersistence {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn path_for(&self, scope: &Scope) -> PathBuf {
        let stem = sanitize_stem(scope.as_str());
        self.dir
            .join(format!("{}.snapshots.{}", stem, self.format.extension()))
    }

    fn encode(&self, snapshots: &[Snapshot]) -> Result<Vec<u8>, PersistenceError> {
        match self.format {
            FileFormat::Json => serde_json::to_vec_pretty(snapshots)
                .map_err(|e| PersistenceError::Serde(e.to_string())),
            FileFormat::Binary => {
                // Serialize through a sized Vec of refs; the encoding is the
                // same sequence a Vec<Snapshot> would produce
                let seq: Vec<&Snapshot> = snapshots.iter().collect();
                bitcode::serialize(&seq).map_err(|e| PersistenceError::Serde(e.to_string()))
            }
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Snapshot>, PersistenceError> {
        match self.format {
            FileFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| PersistenceError::Serde(e.to_string())),
            FileFormat::Binary => {
                bitcode::deserialize(bytes).map_err(|e| PersistenceError::Serde(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl SnapshotPersistence for FilePersistence {
    async fn load(&self, scope: &Scope) -> Result<Vec<Snapshot>, PersistenceError> {
        let path = self.path_for(scope);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            // A scope that has never been saved loads as empty
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::Io(e.to_string())),
        };
        self.decode(&bytes)
    }

    async fn save(&self, scope: &Scope, snapshots: &[Snapshot]) -> Result<(), PersistenceError> {
        let bytes = self.encode(snapshots)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))?;

        // Write to a sibling temp file and rename so readers never observe
        // a partially written collection. The format extension stays in the
        // temp name so instances with different formats over the same
        // directory never stage through the same file.
        let path = self.path_for(scope);
        let tmp = path.with_extension(format!("{}.tmp", self.format.extension()));
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        Ok(())
    }
}

fn sanitize_stem(key: &str) -> String {
    if key.is_empty() {
        return "default".to_string();
    }
    key.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
