use super::svn_url::SvnUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Something an operation can aim at: a working-copy path or a
/// repository URL.
///
/// Commands such as `log`, `list` and `cat` accept both forms; the
/// adapter passes either through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// A local working-copy path.
    Path(PathBuf),
    /// A repository URL.
    Url(SvnUrl),
}

impl Target {
    /// The argument string handed to the command line.
    pub fn as_arg(&self) -> String {
        match self {
            Target::Path(path) => path.display().to_string(),
            Target::Url(url) => url.to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Path(path)
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::Path(path.to_path_buf())
    }
}

impl From<SvnUrl> for Target {
    fn from(url: SvnUrl) -> Self {
        Target::Url(url)
    }
}

impl From<&SvnUrl> for Target {
    fn from(url: &SvnUrl) -> Self {
        Target::Url(url.clone())
    }
}
