use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a revision did to a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// The path was added.
    Added,
    /// The path was deleted.
    Deleted,
    /// The path content was modified.
    Modified,
    /// The path was replaced (deleted and re-added in one revision).
    Replaced,
}

impl ChangeAction {
    /// Map the single-letter action code from verbose log output.
    pub fn from_code(code: char) -> Option<ChangeAction> {
        match code {
            'A' => Some(ChangeAction::Added),
            'D' => Some(ChangeAction::Deleted),
            'M' => Some(ChangeAction::Modified),
            'R' => Some(ChangeAction::Replaced),
            _ => None,
        }
    }

    /// The single-letter code the tool prints for this action.
    pub fn code(self) -> char {
        match self {
            ChangeAction::Added => 'A',
            ChangeAction::Deleted => 'D',
            ChangeAction::Modified => 'M',
            ChangeAction::Replaced => 'R',
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single path touched by a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedPath {
    /// Repository path, as printed (leading slash included).
    pub path: String,
    /// What happened to the path.
    pub action: ChangeAction,
    /// Source path when the change was a copy.
    pub copy_src_path: Option<String>,
    /// Source revision when the change was a copy.
    pub copy_src_revision: Option<u64>,
}

/// One entry of the commit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// The revision the entry describes.
    pub revision: u64,
    /// Commit author; absent for revisions committed anonymously.
    pub author: Option<String>,
    /// Commit timestamp.
    pub date: Option<DateTime<Utc>>,
    /// Commit message.
    pub message: String,
    /// Paths changed in the revision, in the order the tool emitted
    /// them. Empty unless change paths were requested.
    pub changed_paths: Vec<ChangedPath>,
}
