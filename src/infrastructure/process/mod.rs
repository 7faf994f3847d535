//! Subprocess invoker: spawns the external tool, captures its output in
//! full and converts nonzero exits into typed failures.

use crate::common::{SvnError, SvnResult};
use async_trait::async_trait;
use std::borrow::Cow;
use std::process::Stdio;
use tokio::process::Command;

/// Output captured from one tool invocation that exited successfully.
///
/// Both streams are kept as raw bytes; several commands (`cat`,
/// `propget`) produce binary data that must survive untouched.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    /// Complete standard output.
    pub stdout: Vec<u8>,
    /// Complete standard error (warnings can land here on success).
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Standard output as text, with invalid UTF-8 replaced.
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Standard error as text, with invalid UTF-8 replaced.
    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// The seam between the client facade and the operating system.
///
/// The production implementation is [`SvnProcess`]; tests substitute a
/// scripted or mocked runner to simulate tool behavior without a
/// Subversion installation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `executable` with `args`, blocking until it exits.
    ///
    /// Returns the captured output on exit code zero. A nonzero exit is
    /// [`SvnError::Command`] carrying the exit code and full stderr; a
    /// spawn failure is [`SvnError::Launch`]. This layer never retries.
    async fn run(&self, executable: &str, args: &[String]) -> SvnResult<CapturedOutput>;
}

/// Production runner over [`tokio::process::Command`].
#[derive(Debug, Default, Clone)]
pub struct SvnProcess;

impl SvnProcess {
    /// Create a new process runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SvnProcess {
    async fn run(&self, executable: &str, args: &[String]) -> SvnResult<CapturedOutput> {
        tracing::debug!(executable, ?args, "spawning");
        let output = Command::new(executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SvnError::launch(executable, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let exit_code = output.status.code().unwrap_or(-1);
            tracing::debug!(exit_code, "tool exited nonzero");
            return Err(SvnError::command_failed(
                format!("{} {}", executable, args.join(" ")),
                exit_code,
                stderr,
            ));
        }

        Ok(CapturedOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_output_text_views() {
        let output = CapturedOutput {
            stdout: b"At revision 4.\n".to_vec(),
            stderr: Vec::new(),
        };
        assert_eq!(output.stdout_text(), "At revision 4.\n");
        assert_eq!(output.stderr_text(), "");
    }

    #[tokio::test]
    async fn test_launch_failure_is_typed() {
        let runner = SvnProcess::new();
        let err = runner
            .run("definitely-not-an-executable-9f2c", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SvnError::Launch { .. }));
    }
}
