use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a revision string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid revision: '{0}'")]
pub struct RevisionParseError(pub String);

/// An immutable point-in-time identifier for repository state.
///
/// A revision is either a non-negative number, one of the keywords the
/// `svn` client understands, or a date. `Display` produces exactly the
/// textual syntax accepted by `-r`, and `FromStr` parses it back, so
/// `r.to_string().parse::<Revision>()` round-trips for every value.
///
/// # Examples
///
/// ```
/// use svncmd::domain::revision::Revision;
///
/// assert_eq!(Revision::Head.to_string(), "HEAD");
/// assert_eq!("42".parse::<Revision>().unwrap(), Revision::Number(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Revision {
    /// A committed revision number.
    Number(u64),
    /// The latest revision in the repository.
    Head,
    /// The pristine base revision of a working-copy item.
    Base,
    /// The current working-copy content.
    Working,
    /// The last revision in which an item changed.
    Committed,
    /// The revision just before the last committed one.
    Previous,
    /// The last revision at or before the given instant.
    Date(DateTime<Utc>),
}

/// Date format used inside `{...}` revision arguments.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl Revision {
    /// Serialized form of `revision`, defaulting to `HEAD` when absent.
    ///
    /// The command line treats a missing revision as "latest", so every
    /// argument-building site funnels through this helper.
    pub fn arg_or_head(revision: Option<&Revision>) -> String {
        revision.map_or_else(|| "HEAD".to_string(), Revision::to_string)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Number(n) => write!(f, "{n}"),
            Revision::Head => write!(f, "HEAD"),
            Revision::Base => write!(f, "BASE"),
            Revision::Working => write!(f, "WORKING"),
            Revision::Committed => write!(f, "COMMITTED"),
            Revision::Previous => write!(f, "PREV"),
            Revision::Date(date) => write!(f, "{{{}}}", date.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for Revision {
    type Err = RevisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "HEAD" => return Ok(Revision::Head),
            "BASE" => return Ok(Revision::Base),
            "WORKING" => return Ok(Revision::Working),
            "COMMITTED" => return Ok(Revision::Committed),
            "PREV" | "PREVIOUS" => return Ok(Revision::Previous),
            _ => {}
        }
        if let Some(inner) = trimmed.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            let parsed = NaiveDateTime::parse_from_str(inner, DATE_FORMAT)
                .map_err(|_| RevisionParseError(s.to_string()))?;
            return Ok(Revision::Date(parsed.and_utc()));
        }
        trimmed
            .parse::<u64>()
            .map(Revision::Number)
            .map_err(|_| RevisionParseError(s.to_string()))
    }
}

impl From<u64> for Revision {
    fn from(number: u64) -> Self {
        Revision::Number(number)
    }
}

/// A pair of revisions joined by `:`, as accepted by `-r A:B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// Start of the range.
    pub from: Revision,
    /// End of the range.
    pub to: Revision,
}

impl RevisionRange {
    /// Create a range from `from` to `to`.
    pub fn new(from: Revision, to: Revision) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}
