use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A versioned property attached to a path.
///
/// Values are kept both as raw bytes (binary-safe round trip) and as a
/// lossy text rendering for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name, e.g. `svn:eol-style`.
    pub name: String,
    /// The path the property is set on.
    pub path: PathBuf,
    /// Raw property value.
    pub raw: Vec<u8>,
}

impl Property {
    /// Build a property record from the raw bytes of a value.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, raw: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            raw,
        }
    }

    /// The value as text, with invalid UTF-8 replaced.
    pub fn value(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }

    /// The value as raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.raw
    }
}
