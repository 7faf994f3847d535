use super::lock::Lock;
use super::node_kind::NodeKind;
use super::svn_url::SvnUrl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Working-copy state of an item, as reported in a status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Does not exist.
    None,
    /// Exists, with no local changes.
    Normal,
    /// Text or properties were modified locally.
    Modified,
    /// Scheduled for addition.
    Added,
    /// Scheduled for deletion.
    Deleted,
    /// Not a versioned item in this working copy.
    Unversioned,
    /// Under version control, but missing from disk.
    Missing,
    /// Was deleted and then re-added.
    Replaced,
    /// Local modifications received repository modifications.
    Merged,
    /// Local modifications conflict with repository modifications.
    Conflicted,
    /// An unversioned item is in the way of the versioned one.
    Obstructed,
    /// Explicitly ignored.
    Ignored,
    /// A directory with an incomplete entries list.
    Incomplete,
    /// Populated by an externals definition.
    External,
    /// Held by a working-copy lock.
    Locked,
}

impl StatusKind {
    /// Map a status-column character to a kind.
    ///
    /// The mapping is pinned to the classic `svn status` column alphabet;
    /// an unlisted character yields `None` so callers can decide whether
    /// that is fatal.
    pub fn from_status_char(c: char) -> Option<StatusKind> {
        match c {
            ' ' => Some(StatusKind::Normal),
            'A' => Some(StatusKind::Added),
            'C' => Some(StatusKind::Conflicted),
            'D' => Some(StatusKind::Deleted),
            'G' => Some(StatusKind::Merged),
            'I' => Some(StatusKind::Ignored),
            'L' => Some(StatusKind::Locked),
            'M' => Some(StatusKind::Modified),
            'R' => Some(StatusKind::Replaced),
            'X' => Some(StatusKind::External),
            '?' => Some(StatusKind::Unversioned),
            '!' => Some(StatusKind::Missing),
            '~' => Some(StatusKind::Obstructed),
            _ => None,
        }
    }

    /// Whether this kind denotes a versioned resource.
    pub fn is_managed(self) -> bool {
        !matches!(
            self,
            StatusKind::Unversioned | StatusKind::None | StatusKind::Ignored
        )
    }

    /// Whether a resource of this kind has a repository counterpart.
    pub fn has_remote(self) -> bool {
        self.is_managed() && self != StatusKind::Added
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusKind::None => "non-svn",
            StatusKind::Normal => "normal",
            StatusKind::Modified => "modified",
            StatusKind::Added => "added",
            StatusKind::Deleted => "deleted",
            StatusKind::Unversioned => "unversioned",
            StatusKind::Missing => "missing",
            StatusKind::Replaced => "replaced",
            StatusKind::Merged => "merged",
            StatusKind::Conflicted => "conflicted",
            StatusKind::Obstructed => "obstructed",
            StatusKind::Ignored => "ignored",
            StatusKind::Incomplete => "incomplete",
            StatusKind::External => "external",
            StatusKind::Locked => "locked",
        };
        write!(f, "{label}")
    }
}

/// Full status of a versioned working-copy item.
///
/// Composed from a `status` line and the matching `info` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedStatus {
    /// Absolute path of the item.
    pub path: PathBuf,
    /// Content state.
    pub text_status: StatusKind,
    /// Property state.
    pub prop_status: StatusKind,
    /// Whether the item was scheduled with history.
    pub copied: bool,
    /// Repository URL of the item.
    pub url: Option<SvnUrl>,
    /// Working-copy revision.
    pub revision: Option<u64>,
    /// Revision of the last change.
    pub last_changed_revision: Option<u64>,
    /// Date of the last change.
    pub last_changed_date: Option<DateTime<Utc>>,
    /// Author of the last change.
    pub last_commit_author: Option<String>,
    /// Node kind reported by the tool.
    pub node_kind: NodeKind,
    /// Source URL when the item was copied.
    pub copied_from_url: Option<SvnUrl>,
    /// Repository lock on the item, if any.
    pub lock: Option<Lock>,
    /// Pristine base file left behind by a conflict.
    pub conflict_old: Option<PathBuf>,
    /// Incoming file left behind by a conflict.
    pub conflict_new: Option<PathBuf>,
    /// Local working file left behind by a conflict.
    pub conflict_working: Option<PathBuf>,
}

/// Status of a path, versioned or not.
///
/// A path outside version control is a distinct variant rather than a
/// partially-filled record: it structurally cannot carry a URL, revision
/// or last-changed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// A versioned item with full metadata.
    Managed(ManagedStatus),
    /// A path the tool does not track.
    Unmanaged {
        /// Absolute path of the item.
        path: PathBuf,
        /// Whether the path is explicitly ignored (a path can be both
        /// unversioned and ignored).
        ignored: bool,
    },
}

impl Status {
    /// Build the status of an untracked path.
    pub fn unmanaged(path: impl Into<PathBuf>, ignored: bool) -> Self {
        Status::Unmanaged {
            path: path.into(),
            ignored,
        }
    }

    /// The path this status describes.
    pub fn path(&self) -> &Path {
        match self {
            Status::Managed(status) => &status.path,
            Status::Unmanaged { path, .. } => path,
        }
    }

    /// Content state; `Unversioned` or `Ignored` for unmanaged paths.
    pub fn text_status(&self) -> StatusKind {
        match self {
            Status::Managed(status) => status.text_status,
            Status::Unmanaged { ignored: true, .. } => StatusKind::Ignored,
            Status::Unmanaged { .. } => StatusKind::Unversioned,
        }
    }

    /// Property state; an unmanaged path cannot pretend to have one.
    pub fn prop_status(&self) -> StatusKind {
        match self {
            Status::Managed(status) => status.prop_status,
            Status::Unmanaged { .. } => StatusKind::None,
        }
    }

    /// Working-copy revision, absent for unmanaged paths.
    pub fn revision(&self) -> Option<u64> {
        match self {
            Status::Managed(status) => status.revision,
            Status::Unmanaged { .. } => None,
        }
    }

    /// Repository URL, absent for unmanaged paths.
    pub fn url(&self) -> Option<&SvnUrl> {
        match self {
            Status::Managed(status) => status.url.as_ref(),
            Status::Unmanaged { .. } => None,
        }
    }

    /// Node kind; unknown for unmanaged paths.
    pub fn node_kind(&self) -> NodeKind {
        match self {
            Status::Managed(status) => status.node_kind,
            Status::Unmanaged { .. } => NodeKind::Unknown,
        }
    }

    /// Whether the item is under version control.
    pub fn is_managed(&self) -> bool {
        matches!(self, Status::Managed(_))
    }

    /// Whether the item carries local work that a commit would send.
    pub fn is_ready_for_commit(&self) -> bool {
        let text = self.text_status();
        matches!(
            text,
            StatusKind::Modified
                | StatusKind::Added
                | StatusKind::Deleted
                | StatusKind::Replaced
                | StatusKind::Conflicted
        ) || matches!(
            self.prop_status(),
            StatusKind::Modified | StatusKind::Conflicted
        ) || (!text.is_managed() && text != StatusKind::Ignored)
    }

    /// Whether the item carries local changes a revert would undo.
    pub fn is_ready_for_revert(&self) -> bool {
        let text = self.text_status();
        matches!(
            text,
            StatusKind::Modified
                | StatusKind::Added
                | StatusKind::Deleted
                | StatusKind::Missing
                | StatusKind::Replaced
                | StatusKind::Conflicted
        ) || matches!(
            self.prop_status(),
            StatusKind::Modified | StatusKind::Conflicted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_char_mapping() {
        assert_eq!(StatusKind::from_status_char(' '), Some(StatusKind::Normal));
        assert_eq!(StatusKind::from_status_char('M'), Some(StatusKind::Modified));
        assert_eq!(
            StatusKind::from_status_char('?'),
            Some(StatusKind::Unversioned)
        );
        assert_eq!(StatusKind::from_status_char('~'), Some(StatusKind::Obstructed));
        assert_eq!(StatusKind::from_status_char('Z'), None);
    }

    #[test]
    fn test_managed_predicates() {
        assert!(StatusKind::Normal.is_managed());
        assert!(StatusKind::Added.is_managed());
        assert!(!StatusKind::Unversioned.is_managed());
        assert!(!StatusKind::Ignored.is_managed());
        assert!(!StatusKind::None.is_managed());

        assert!(StatusKind::Normal.has_remote());
        assert!(!StatusKind::Added.has_remote());
    }

    #[test]
    fn test_unmanaged_carries_no_repository_fields() {
        let status = Status::unmanaged("/tmp/outside.txt", false);
        assert_eq!(status.text_status(), StatusKind::Unversioned);
        assert_eq!(status.prop_status(), StatusKind::None);
        assert_eq!(status.revision(), None);
        assert_eq!(status.url(), None);
        assert_eq!(status.node_kind(), NodeKind::Unknown);
        assert!(!status.is_managed());

        let ignored = Status::unmanaged("/tmp/outside.txt", true);
        assert_eq!(ignored.text_status(), StatusKind::Ignored);
    }

    #[test]
    fn test_commit_and_revert_readiness() {
        let unversioned = Status::unmanaged("/tmp/new.txt", false);
        assert!(unversioned.is_ready_for_commit());
        assert!(!unversioned.is_ready_for_revert());

        let ignored = Status::unmanaged("/tmp/scratch", true);
        assert!(!ignored.is_ready_for_commit());
    }
}
