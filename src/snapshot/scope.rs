use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key partitioning snapshot stores.
///
/// Each scope owns its own collection of snapshots and, from the registry's
/// perspective, has at most one active manager instance at a time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope(String);

impl Scope {
    pub fn new(key: impl Into<String>) -> Self {
        Scope(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(key: &str) -> Self {
        Scope(key.to_string())
    }
}

impl From<String> for Scope {
    fn from(key: String) -> Self {
        Scope(key)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
