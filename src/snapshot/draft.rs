/// Mutable draft collected from the user before a create or edit is
/// confirmed. Converting into a [`Snapshot`](super::Snapshot) validates the
/// title.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDraft {
    pub title: String,
    pub description: String,
    pub data: Vec<u8>,
}

impl SnapshotDraft {
    pub fn new(title: impl Into<String>) -> Self {
        SnapshotDraft {
            title: title.into(),
            description: String::new(),
            data: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}
