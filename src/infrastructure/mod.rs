//! Infrastructure layer: everything that touches the outside world or
//! interprets its output.
//!
//! - [`process`]: spawning the external tool and capturing its output
//! - [`notify`]: dispatching progress notifications to listeners
//! - [`parsers`]: pure functions from captured output to domain records

pub mod notify;
pub mod parsers;
pub mod process;

pub use notify::{NotificationHandler, NotifyListener, SvnCommandKind};
pub use process::{CapturedOutput, ProcessRunner, SvnProcess};
