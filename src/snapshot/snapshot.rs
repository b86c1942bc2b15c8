use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

use super::draft::SnapshotDraft;

/// Serialize the opaque payload as base64 so the JSON persistence format
/// stays a single readable document.
mod payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// A named, user-managed saved-state record.
///
/// The payload is opaque to the manager; interpreting it is the caller's
/// concern. Identity within a scope is the title, compared
/// case-insensitively.
#[derive(Clone, Serialize, Deserialize)]
pub struct Snapshot {
    title: String,
    description: String,
    #[serde(with = "payload")]
    data: Vec<u8>,
    created_at: SystemTime,
}

impl Snapshot {
    pub fn new(title: impl Into<String>, data: Vec<u8>) -> Self {
        Snapshot {
            title: title.into(),
            description: String::new(),
            data,
            created_at: SystemTime::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build a snapshot from a UI-collected draft. Blank titles are rejected.
    pub fn from_draft(draft: SnapshotDraft) -> Result<Self, SnapshotError> {
        let title = validated_title(&draft.title)?;
        Ok(Snapshot {
            title,
            description: draft.description,
            data: draft.data,
            created_at: SystemTime::now(),
        })
    }

    /// Apply an edited draft to this snapshot, keeping the original creation
    /// time. Blank titles are rejected.
    pub fn apply_draft(&self, draft: SnapshotDraft) -> Result<Self, SnapshotError> {
        let title = validated_title(&draft.title)?;
        Ok(Snapshot {
            title,
            description: draft.description,
            data: draft.data,
            created_at: self.created_at,
        })
    }

    /// A draft pre-filled from this snapshot, for edit dialogs.
    pub fn to_draft(&self) -> SnapshotDraft {
        SnapshotDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            data: self.data.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Case-insensitive title equality.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Case-insensitive substring match on the title, used by filter views.
    pub fn title_contains(&self, filter: &str) -> bool {
        self.title.to_lowercase().contains(&filter.to_lowercase())
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("data_len", &self.data.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.data == other.data
            && self.created_at == other.created_at
    }
}

impl Eq for Snapshot {}

fn validated_title(title: &str) -> Result<String, SnapshotError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SnapshotError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
