//! Shared utilities: the error taxonomy, result alias and bounded-wait
//! primitive used across the crate.

pub mod error;
pub mod result;
pub mod wait;

pub use error::{classify_stderr, FailureKind, SvnError};
pub use result::SvnResult;
pub use wait::PollPolicy;
