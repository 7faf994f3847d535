//! Shared test doubles: a scripted process runner and a recording
//! listener, so client behavior can be driven without a Subversion
//! installation.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use svncmd::domain::NodeKind;
use svncmd::infrastructure::process::{CapturedOutput, ProcessRunner};
use svncmd::{NotifyListener, SvnError, SvnResult};

/// Route test logs through `RUST_LOG` like the production crate does.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

enum ScriptedResponse {
    Ok(Vec<u8>),
    CommandError { exit_code: i32, stderr: String },
}

/// A process runner that replays a scripted sequence of responses and
/// records every invocation for later assertions.
#[derive(Default)]
pub struct ScriptedRunner {
    script: Mutex<VecDeque<(String, ScriptedResponse)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful invocation of `verb` producing `stdout`.
    pub fn push_ok(&self, verb: &str, stdout: &str) {
        self.script.lock().unwrap().push_back((
            verb.to_string(),
            ScriptedResponse::Ok(stdout.as_bytes().to_vec()),
        ));
    }

    /// Queue a failing invocation of `verb`.
    pub fn push_err(&self, verb: &str, exit_code: i32, stderr: &str) {
        self.script.lock().unwrap().push_back((
            verb.to_string(),
            ScriptedResponse::CommandError {
                exit_code,
                stderr: stderr.to_string(),
            },
        ));
    }

    /// Argument vectors of every invocation so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, executable: &str, args: &[String]) -> SvnResult<CapturedOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        let (expected_verb, response) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected invocation: {executable} {args:?}"));
        assert_eq!(
            args.first().map(String::as_str),
            Some(expected_verb.as_str()),
            "unexpected verb in {args:?}"
        );
        match response {
            ScriptedResponse::Ok(stdout) => Ok(CapturedOutput {
                stdout,
                stderr: Vec::new(),
            }),
            ScriptedResponse::CommandError { exit_code, stderr } => Err(SvnError::command_failed(
                format!("{executable} {}", args.join(" ")),
                exit_code,
                stderr,
            )),
        }
    }
}

/// A listener that records every event it receives.
#[derive(Default)]
pub struct RecordingListener {
    pub notified: Mutex<Vec<PathBuf>>,
    pub revisions: Mutex<Vec<u64>>,
    pub completed: Mutex<Vec<String>>,
    pub command_lines: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notified_paths(&self) -> Vec<PathBuf> {
        self.notified.lock().unwrap().clone()
    }

    pub fn revisions_seen(&self) -> Vec<u64> {
        self.revisions.lock().unwrap().clone()
    }
}

impl NotifyListener for RecordingListener {
    fn log_command_line(&self, command_line: &str) {
        self.command_lines
            .lock()
            .unwrap()
            .push(command_line.to_string());
    }

    fn log_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn log_revision(&self, revision: u64, _path: Option<&Path>) {
        self.revisions.lock().unwrap().push(revision);
    }

    fn log_completed(&self, message: &str) {
        self.completed.lock().unwrap().push(message.to_string());
    }

    fn on_notify(&self, path: &Path, _kind: NodeKind) {
        self.notified.lock().unwrap().push(path.to_path_buf());
    }
}
