use regex::Regex;
use std::time::Duration;
use thiserror::Error;

/// Error type for every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum SvnError {
    /// The external tool could not be started at all.
    #[error("failed to launch '{executable}': {source}")]
    Launch {
        /// The executable that was invoked.
        executable: String,
        /// The underlying spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and exited with a nonzero status.
    ///
    /// Carries the full stderr so callers can distinguish failure modes
    /// by pattern (see [`SvnError::classification`]).
    #[error("command '{command}' exited with status {exit_code}: {stderr}")]
    Command {
        /// The command line that was executed (password redacted).
        command: String,
        /// Exit code of the process, `-1` when terminated by a signal.
        exit_code: i32,
        /// Complete captured stderr.
        stderr: String,
    },

    /// Captured output did not match the expected grammar.
    #[error("unexpected {context} output: {message}")]
    Parse {
        /// Which command family was being parsed.
        context: &'static str,
        /// What was wrong with the output.
        message: String,
    },

    /// A configured deadline or bounded poll expired.
    #[error("operation timed out after {waited:?}")]
    Timeout {
        /// How long the operation waited before giving up.
        waited: Duration,
    },

    /// A local filesystem operation failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O failure.
        #[from]
        source: std::io::Error,
    },
}

/// How a nonzero tool exit should be interpreted.
///
/// The tool signals every failure the same way (exit code plus prose on
/// stderr), so this classification is a pinned pattern table over the
/// stderr text of the tool version the parsers are pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Another operation holds a lock on the target; transient,
    /// the only retryable kind.
    LockContention,
    /// The target path is not part of a working copy.
    NotWorkingCopy,
    /// The server rejected the supplied credentials.
    Authentication,
    /// Anything else.
    Generic,
}

/// Classify raw stderr text against the known failure patterns.
///
/// First match wins; unmatched text is [`FailureKind::Generic`].
pub fn classify_stderr(stderr: &str) -> FailureKind {
    const TABLE: &[(FailureKind, &str)] = &[
        (
            FailureKind::LockContention,
            r"Attempted to lock an already-locked dir",
        ),
        (FailureKind::LockContention, r"is already locked"),
        (FailureKind::LockContention, r"Working copy .* locked"),
        (FailureKind::NotWorkingCopy, r"is not a working copy"),
        (FailureKind::Authentication, r"authorization failed"),
        (FailureKind::Authentication, r"Could not authenticate"),
    ];
    for (kind, pattern) in TABLE {
        if Regex::new(pattern).unwrap().is_match(stderr) {
            return *kind;
        }
    }
    FailureKind::Generic
}

impl SvnError {
    /// Create a command-failure error.
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Command {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a parse error for the given command family.
    pub fn parse_error(context: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            context,
            message: message.into(),
        }
    }

    /// Create a launch error.
    pub fn launch(executable: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            executable: executable.into(),
            source,
        }
    }

    /// Create a timeout error.
    pub fn timeout(waited: Duration) -> Self {
        Self::Timeout { waited }
    }

    /// Classification of this failure; `Generic` for anything that is
    /// not a command failure.
    pub fn classification(&self) -> FailureKind {
        match self {
            SvnError::Command { stderr, .. } => classify_stderr(stderr),
            _ => FailureKind::Generic,
        }
    }

    /// Whether this is the transient "target already locked" failure.
    pub fn is_lock_contention(&self) -> bool {
        self.classification() == FailureKind::LockContention
    }

    /// Whether the tool reported the target is not a working copy.
    pub fn is_not_working_copy(&self) -> bool {
        self.classification() == FailureKind::NotWorkingCopy
    }

    /// Whether the tool emitted a warning rather than a hard failure.
    ///
    /// Some operations (notably `add` on an already-versioned item)
    /// exit nonzero with a `svn: warning:` prefix and are treated as
    /// successful by callers.
    pub fn is_warning(&self) -> bool {
        matches!(self, SvnError::Command { stderr, .. }
            if stderr.trim_start().starts_with("svn: warning:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lock_contention() {
        assert_eq!(
            classify_stderr("svn: Attempted to lock an already-locked dir\nsvn: ..."),
            FailureKind::LockContention
        );
        assert_eq!(
            classify_stderr("svn: warning: Path '/x' is already locked by user 'bob'"),
            FailureKind::LockContention
        );
        assert_eq!(
            classify_stderr("svn: Working copy '/tmp/wc' locked"),
            FailureKind::LockContention
        );
    }

    #[test]
    fn test_classify_not_working_copy() {
        assert_eq!(
            classify_stderr("svn: '/tmp/elsewhere' is not a working copy"),
            FailureKind::NotWorkingCopy
        );
    }

    #[test]
    fn test_classify_authentication() {
        assert_eq!(
            classify_stderr("svn: PROPFIND of '/repo': authorization failed"),
            FailureKind::Authentication
        );
    }

    #[test]
    fn test_classify_generic() {
        assert_eq!(
            classify_stderr("svn: File not found: revision 3, path '/x'"),
            FailureKind::Generic
        );
        assert_eq!(classify_stderr(""), FailureKind::Generic);
    }

    #[test]
    fn test_error_predicates() {
        let contention =
            SvnError::command_failed("svn ci", 1, "svn: Attempted to lock an already-locked dir");
        assert!(contention.is_lock_contention());
        assert!(!contention.is_not_working_copy());

        let parse = SvnError::parse_error("log", "missing root element");
        assert_eq!(parse.classification(), FailureKind::Generic);
    }

    #[test]
    fn test_warning_detection() {
        let warn = SvnError::command_failed("svn add", 1, "svn: warning: 'x' is already under version control");
        assert!(warn.is_warning());
        let hard = SvnError::command_failed("svn add", 1, "svn: Working copy '/wc' locked");
        assert!(!hard.is_warning());
    }
}
