use crate::common::PollPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Bounded retry parameters for operations subject to transient lock
/// contention (commit and lock acquisition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub attempts: u32,
    /// Pause between attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 50,
            interval: Duration::from_millis(100),
        }
    }
}

/// Client configuration.
///
/// The executable name is fixed when the client is built, not supplied
/// per call. Credentials are passed to the tool only when non-empty.
///
/// # Examples
///
/// ```
/// use svncmd::adapter::config::SvnConfig;
///
/// let config = SvnConfig::new()
///     .with_credentials("alice", "secret")
///     .with_config_dir("/home/alice/.subversion-alt");
/// assert_eq!(config.executable, "svn");
/// ```
#[derive(Debug, Clone)]
pub struct SvnConfig {
    /// Name or path of the tool executable.
    pub executable: String,
    /// Username for `--username`; omitted when empty.
    pub username: Option<String>,
    /// Password for `--password`; omitted when empty.
    pub password: Option<String>,
    /// Directory for `--config-dir`; omitted when unset.
    pub config_dir: Option<PathBuf>,
    /// Retry bounds for lock contention.
    pub retry: RetryPolicy,
    /// Polling bounds for filesystem create latency.
    pub poll: PollPolicy,
    /// Optional per-invocation deadline. No deadline by default: a
    /// hung tool blocks its caller, who may instead cancel by dropping
    /// the operation future.
    pub timeout: Option<Duration>,
}

impl Default for SvnConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SvnConfig {
    /// Configuration with the default `svn` executable.
    pub fn new() -> Self {
        Self {
            executable: "svn".to_string(),
            username: None,
            password: None,
            config_dir: None,
            retry: RetryPolicy::default(),
            poll: PollPolicy::default(),
            timeout: None,
        }
    }

    /// Use a specific executable name or path.
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Authenticate as `username`/`password`.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Read tool configuration from `dir` instead of the default.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Override the lock-contention retry bounds.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the filesystem polling bounds.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Kill invocations that run longer than `deadline`.
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.timeout = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SvnConfig::new();
        assert_eq!(config.executable, "svn");
        assert_eq!(config.username, None);
        assert_eq!(config.retry.attempts, 50);
        assert_eq!(config.retry.interval, Duration::from_millis(100));
        assert_eq!(config.poll.attempts, 50);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_builder_chain() {
        let config = SvnConfig::new()
            .with_executable("/opt/svn/bin/svn")
            .with_credentials("alice", "secret")
            .with_retry(RetryPolicy {
                attempts: 3,
                interval: Duration::from_millis(10),
            })
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.executable, "/opt/svn/bin/svn");
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
