use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Description of a repository lock held on a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// The user holding the lock.
    pub owner: String,
    /// The locked item.
    pub path: PathBuf,
    /// The token issued when the lock was taken.
    pub token: Option<String>,
    /// The comment supplied with the lock operation.
    pub comment: Option<String>,
    /// When the lock was created.
    pub created: Option<DateTime<Utc>>,
    /// When the lock will expire, if it does.
    pub expires: Option<DateTime<Utc>>,
}
