use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Errors raised while validating a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvnUrlError {
    /// The string is not a well-formed URL.
    #[error("invalid URL format: {0}")]
    InvalidFormat(String),

    /// The URL scheme is not one the Subversion client accepts.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// A validated repository URL.
///
/// Accepts the schemes understood by the Subversion client
/// (`http`, `https`, `svn`, `svn+ssh`, `file`) and normalizes away a
/// trailing slash so URL equality matches path equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SvnUrl(Url);

const ACCEPTED_SCHEMES: &[&str] = &["http", "https", "svn", "svn+ssh", "file"];

impl SvnUrl {
    /// Parse and validate `input` as a repository URL.
    pub fn parse(input: &str) -> Result<Self, SvnUrlError> {
        let trimmed = input.trim().trim_end_matches('/');
        let url =
            Url::parse(trimmed).map_err(|e| SvnUrlError::InvalidFormat(format!("{input}: {e}")))?;
        if !ACCEPTED_SCHEMES.contains(&url.scheme()) {
            return Err(SvnUrlError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(Self(url))
    }

    /// The URL as a string, without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// The last path segment, e.g. `trunk` for `svn://host/repo/trunk`.
    pub fn last_path_segment(&self) -> Option<String> {
        self.0
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
    }

    /// The URL one path segment up, or `None` at the repository host root.
    pub fn parent(&self) -> Option<SvnUrl> {
        let mut parent = self.0.clone();
        {
            let mut segments = parent.path_segments_mut().ok()?;
            segments.pop_if_empty().pop();
        }
        let candidate = SvnUrl(parent);
        if candidate.as_str() == self.as_str() {
            return None;
        }
        Some(candidate)
    }

    /// Append a path segment, producing a child URL.
    pub fn join_segment(&self, segment: &str) -> Result<SvnUrl, SvnUrlError> {
        let mut child = self.0.clone();
        child
            .path_segments_mut()
            .map_err(|_| SvnUrlError::InvalidFormat(self.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(SvnUrl(child))
    }
}

impl fmt::Display for SvnUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SvnUrl {
    type Err = SvnUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SvnUrl::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_svn_schemes() {
        for url in [
            "http://svn.example.com/repo",
            "https://svn.example.com/repo/trunk",
            "svn://10.110.1.24/repo/project/trunk",
            "svn+ssh://host/repo",
            "file:///var/svn/repo",
        ] {
            assert!(SvnUrl::parse(url).is_ok(), "should accept {url}");
        }
    }

    #[test]
    fn test_rejects_foreign_schemes() {
        assert_eq!(
            SvnUrl::parse("git://host/repo"),
            Err(SvnUrlError::UnsupportedScheme("git".to_string()))
        );
        assert!(matches!(
            SvnUrl::parse("not a url"),
            Err(SvnUrlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let url = SvnUrl::parse("svn://host/repo/trunk/").unwrap();
        assert_eq!(url.to_string(), "svn://host/repo/trunk");
    }

    #[test]
    fn test_parent_and_last_segment() {
        let url = SvnUrl::parse("svn://host/repo/project/trunk").unwrap();
        assert_eq!(url.last_path_segment().as_deref(), Some("trunk"));
        let parent = url.parent().unwrap();
        assert_eq!(parent.to_string(), "svn://host/repo/project");

        let root = SvnUrl::parse("svn://host").unwrap();
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_join_segment() {
        let url = SvnUrl::parse("svn://host/repo").unwrap();
        let child = url.join_segment("branches").unwrap();
        assert_eq!(child.to_string(), "svn://host/repo/branches");
    }

    #[test]
    fn test_serde_round_trip() {
        let url = SvnUrl::parse("https://svn.example.com/repo").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        let back: SvnUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
    }
}
