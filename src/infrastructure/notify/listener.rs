use crate::domain::NodeKind;
use std::fmt;
use std::path::Path;

/// The command a notification batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SvnCommandKind {
    /// No command in flight.
    Undefined,
    /// `add`
    Add,
    /// `annotate`
    Annotate,
    /// `cat`
    Cat,
    /// `co`
    Checkout,
    /// `cleanup`
    Cleanup,
    /// `ci`
    Commit,
    /// `cp`
    Copy,
    /// `diff`
    Diff,
    /// `export`
    Export,
    /// `import`
    Import,
    /// `info`
    Info,
    /// `list`
    List,
    /// `lock`
    Lock,
    /// `log`
    Log,
    /// `merge`
    Merge,
    /// `mkdir`
    Mkdir,
    /// `mv`
    Move,
    /// `propdel`
    Propdel,
    /// `propget`
    Propget,
    /// `proplist`
    Proplist,
    /// `propset`
    Propset,
    /// `rm`
    Remove,
    /// `resolved`
    Resolved,
    /// `revert`
    Revert,
    /// `status`
    Status,
    /// `sw`
    Switch,
    /// `unlock`
    Unlock,
    /// `up`
    Update,
}

impl fmt::Display for SvnCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            SvnCommandKind::Undefined => "?",
            SvnCommandKind::Add => "add",
            SvnCommandKind::Annotate => "annotate",
            SvnCommandKind::Cat => "cat",
            SvnCommandKind::Checkout => "co",
            SvnCommandKind::Cleanup => "cleanup",
            SvnCommandKind::Commit => "ci",
            SvnCommandKind::Copy => "cp",
            SvnCommandKind::Diff => "diff",
            SvnCommandKind::Export => "export",
            SvnCommandKind::Import => "import",
            SvnCommandKind::Info => "info",
            SvnCommandKind::List => "list",
            SvnCommandKind::Lock => "lock",
            SvnCommandKind::Log => "log",
            SvnCommandKind::Merge => "merge",
            SvnCommandKind::Mkdir => "mkdir",
            SvnCommandKind::Move => "mv",
            SvnCommandKind::Propdel => "propdel",
            SvnCommandKind::Propget => "propget",
            SvnCommandKind::Proplist => "proplist",
            SvnCommandKind::Propset => "propset",
            SvnCommandKind::Remove => "rm",
            SvnCommandKind::Resolved => "resolved",
            SvnCommandKind::Revert => "revert",
            SvnCommandKind::Status => "status",
            SvnCommandKind::Switch => "sw",
            SvnCommandKind::Unlock => "unlock",
            SvnCommandKind::Update => "up",
        };
        write!(f, "{verb}")
    }
}

/// Observer of command progress.
///
/// All methods default to no-ops so implementors pick only the events
/// they care about. Implementations must be cheap and non-blocking:
/// they are called synchronously while an operation is completing.
pub trait NotifyListener: Send + Sync {
    /// A new command is about to run.
    fn set_command(&self, _kind: SvnCommandKind) {}

    /// A plain output line from the running command.
    fn log_message(&self, _message: &str) {}

    /// The command line being executed (password redacted).
    fn log_command_line(&self, _command_line: &str) {}

    /// The command reported an error.
    fn log_error(&self, _message: &str) {}

    /// The command completed against `revision`.
    fn log_revision(&self, _revision: u64, _path: Option<&Path>) {}

    /// The final output line of a command.
    fn log_completed(&self, _message: &str) {}

    /// The state of `path` changed (added, updated, reverted, ...).
    fn on_notify(&self, _path: &Path, _kind: NodeKind) {}
}
