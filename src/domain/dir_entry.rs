use super::node_kind::NodeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a repository directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name relative to the listed directory.
    pub path: String,
    /// File or directory.
    pub node_kind: NodeKind,
    /// Size in bytes; zero for directories and when unreported.
    pub size: u64,
    /// Revision of the last change.
    pub last_changed_revision: Option<u64>,
    /// Date of the last change.
    pub last_changed_date: Option<DateTime<Utc>>,
    /// Author of the last change.
    pub last_commit_author: Option<String>,
    /// Whether the entry carries properties. The pinned listing format
    /// does not report this, so it is always `false` today.
    pub has_props: bool,
}
