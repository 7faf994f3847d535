use super::listener::{NotifyListener, SvnCommandKind};
use super::progress::{ProgressLine, ProgressScanner};
use crate::domain::NodeKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct HandlerState {
    command: SvnCommandKind,
    parse_progress: bool,
    base_dir: Option<PathBuf>,
    log_enabled: bool,
}

impl Default for HandlerState {
    fn default() -> Self {
        Self {
            command: SvnCommandKind::Undefined,
            parse_progress: false,
            base_dir: None,
            log_enabled: true,
        }
    }
}

/// Fans command output out to registered listeners.
///
/// The handler owns the per-invocation context (current command,
/// whether output is progress notifications, the base directory used
/// to relativize paths) and the listener registry. The registry is
/// mutex-guarded so registration and removal are safe while other
/// threads drive operations on the same adapter.
#[derive(Default)]
pub struct NotificationHandler {
    listeners: Mutex<Vec<Arc<dyn NotifyListener>>>,
    state: Mutex<HandlerState>,
    scanner: ProgressScanner,
}

impl std::fmt::Debug for NotificationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHandler")
            .field("listeners", &self.listeners.lock().unwrap().len())
            .field("state", &self.state.lock().unwrap())
            .finish()
    }
}

impl NotificationHandler {
    /// Create a handler with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(&self, listener: Arc<dyn NotifyListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Remove a previously registered listener (identity comparison).
    pub fn remove(&self, listener: &Arc<dyn NotifyListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    fn each<F: Fn(&dyn NotifyListener)>(&self, f: F) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            f(listener.as_ref());
        }
    }

    /// Reset per-invocation state and announce the command to
    /// listeners.
    pub fn set_command(&self, command: SvnCommandKind, output_is_notification: bool) {
        {
            let mut state = self.state.lock().unwrap();
            state.command = command;
            state.parse_progress = output_is_notification;
        }
        self.each(|l| l.set_command(command));
    }

    /// The command currently in flight.
    pub fn command(&self) -> SvnCommandKind {
        self.state.lock().unwrap().command
    }

    /// Set the directory notification paths are relativized against.
    pub fn set_base_dir(&self, base_dir: Option<PathBuf>) {
        self.state.lock().unwrap().base_dir = base_dir;
    }

    /// Suppress `log_message`/`log_completed`/`log_command_line`
    /// events (errors still go through).
    pub fn disable_log(&self) {
        self.state.lock().unwrap().log_enabled = false;
    }

    /// Re-enable suppressed log events.
    pub fn enable_log(&self) {
        self.state.lock().unwrap().log_enabled = true;
    }

    fn log_enabled(&self) -> bool {
        self.state.lock().unwrap().log_enabled
    }

    /// Forward the executed command line to listeners.
    pub fn log_command_line(&self, command_line: &str) {
        if self.log_enabled() {
            self.each(|l| l.log_command_line(command_line));
        }
    }

    /// Forward an error message to listeners. Never suppressed.
    pub fn log_error(&self, message: &str) {
        self.each(|l| l.log_error(message));
    }

    /// Forward a completion revision to listeners.
    pub fn log_revision(&self, revision: u64, path: Option<&Path>) {
        self.each(|l| l.log_revision(revision, path));
    }

    /// Tell listeners the state of `path` changed.
    ///
    /// Used both by the progress scanner and by operations the tool is
    /// silent about (property changes, conflict resolution), where the
    /// facade must notify by hand.
    pub fn notify_change(&self, path: &Path) {
        let kind = NodeKind::of_local_path(path);
        let delivered = self.relativize(path);
        self.each(|l| l.on_notify(&delivered, kind));
    }

    fn relativize(&self, path: &Path) -> PathBuf {
        let state = self.state.lock().unwrap();
        match &state.base_dir {
            Some(base) => pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf()),
            None => path.to_path_buf(),
        }
    }

    /// Digest the captured output of a finished command.
    ///
    /// Always forwards every line but the last as `log_message` and the
    /// last as `log_completed`. When the current command's output was
    /// flagged as notifications, additionally scans each line with the
    /// progress grammar: recognized item lines produce `on_notify`,
    /// recognized completion lines produce `log_revision`. Lines the
    /// grammar does not recognize are skipped; scanning is never fatal.
    ///
    /// Returns the last revision observed in the output, which callers
    /// thread through as their own result rather than keeping shared
    /// state.
    pub fn notify_from_output(&self, output: &str) -> Option<u64> {
        let lines: Vec<&str> = output
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        if let Some((last, head)) = lines.split_last() {
            if self.log_enabled() {
                for line in head {
                    self.each(|l| l.log_message(line));
                }
                self.each(|l| l.log_completed(last));
            }
        }

        if !self.state.lock().unwrap().parse_progress {
            return None;
        }

        let mut last_revision = None;
        for line in &lines {
            match self.scanner.scan(line) {
                Some(ProgressLine::Item { path, .. }) => {
                    self.notify_change(&path);
                }
                Some(ProgressLine::Completion { revision }) => {
                    self.log_revision(revision, None);
                    last_revision = Some(revision);
                }
                None => {
                    tracing::trace!(line, "skipped unrecognized output line");
                }
            }
        }
        last_revision
    }
}
