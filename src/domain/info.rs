use super::lock::Lock;
use super::node_kind::NodeKind;
use super::svn_url::SvnUrl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-path metadata reported by the `info` command.
///
/// Every field except the path is optional: the tool omits blocks for
/// schedule-add items, URLs for detached targets and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// The path the block describes, as printed by the tool.
    pub path: PathBuf,
    /// Repository URL of the item.
    pub url: Option<SvnUrl>,
    /// Root URL of the repository.
    pub repository_root: Option<SvnUrl>,
    /// UUID of the repository.
    pub repository_uuid: Option<String>,
    /// Working-copy revision.
    pub revision: Option<u64>,
    /// Node kind.
    pub node_kind: NodeKind,
    /// Scheduling state (`normal`, `add`, `delete`, ...).
    pub schedule: Option<String>,
    /// Author of the last change.
    pub last_commit_author: Option<String>,
    /// Revision of the last change.
    pub last_changed_revision: Option<u64>,
    /// Date of the last change.
    pub last_changed_date: Option<DateTime<Utc>>,
    /// Copy source URL for items scheduled with history.
    pub copied_from_url: Option<SvnUrl>,
    /// Copy source revision for items scheduled with history.
    pub copied_from_revision: Option<u64>,
    /// Checksum of the pristine text.
    pub checksum: Option<String>,
    /// Lock on the item, if any.
    pub lock: Option<Lock>,
    /// Pristine base file left behind by a conflict.
    pub conflict_old: Option<PathBuf>,
    /// Incoming file left behind by a conflict.
    pub conflict_new: Option<PathBuf>,
    /// Local working file left behind by a conflict.
    pub conflict_working: Option<PathBuf>,
}

impl Info {
    /// An info record for `path` with every optional field absent.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            url: None,
            repository_root: None,
            repository_uuid: None,
            revision: None,
            node_kind: NodeKind::Unknown,
            schedule: None,
            last_commit_author: None,
            last_changed_revision: None,
            last_changed_date: None,
            copied_from_url: None,
            copied_from_revision: None,
            checksum: None,
            lock: None,
            conflict_old: None,
            conflict_new: None,
            conflict_working: None,
        }
    }
}
