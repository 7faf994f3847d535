use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of node a path refers to in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A regular file.
    File,
    /// A directory.
    Dir,
    /// Absent node.
    None,
    /// The kind could not be determined.
    Unknown,
}

impl NodeKind {
    /// Map the tool's textual node kind (`file`, `dir`, ...) to a variant.
    ///
    /// Unrecognized labels become [`NodeKind::Unknown`] rather than an
    /// error; the listing and info outputs are allowed to omit or extend
    /// this field.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "file" => NodeKind::File,
            "dir" | "directory" => NodeKind::Dir,
            "none" => NodeKind::None,
            _ => NodeKind::Unknown,
        }
    }

    /// Probe the local filesystem for the kind of `path`.
    pub fn of_local_path(path: &std::path::Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => NodeKind::Dir,
            Ok(meta) if meta.is_file() => NodeKind::File,
            Ok(_) => NodeKind::Unknown,
            Err(_) => NodeKind::Unknown,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Dir => write!(f, "dir"),
            NodeKind::None => write!(f, "none"),
            NodeKind::Unknown => write!(f, "unknown"),
        }
    }
}
