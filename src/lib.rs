//! # svncmd - Typed adapter for the Subversion command-line client
//!
//! `svncmd` turns abstract repository operations (checkout, commit,
//! status, log, diff, property management, locking, merging) into
//! invocations of the external `svn` executable, captures and
//! classifies its textual/XML output, and exposes the result as a
//! typed domain model while dispatching progress notifications to
//! registered observers.
//!
//! It expects `svn` to be on the path (or configured explicitly); it
//! does not speak the Subversion wire protocols itself.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use svncmd::{SvnClient, SvnConfig};
//! use svncmd::domain::{Revision, Target};
//!
//! # async fn example() -> svncmd::SvnResult<()> {
//! let client = SvnClient::new(
//!     SvnConfig::new().with_credentials("alice", "secret"),
//! );
//!
//! // Typed history access.
//! let url = "svn://host/repo/trunk".parse().unwrap();
//! for entry in client
//!     .get_log_messages(&Target::Url(url), Some(&Revision::Number(1)), None, true)
//!     .await?
//! {
//!     println!("r{} by {:?}", entry.revision, entry.author);
//! }
//!
//! // Status never fails on unversioned paths.
//! let status = client.get_single_status("/tmp/somewhere".as_ref()).await?;
//! println!("{}", status.text_status());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The crate is layered leaf-first:
//!
//! - [`domain`]: immutable value records ([`domain::Revision`],
//!   [`domain::Status`], [`domain::LogMessage`], ...)
//! - [`common`]: the error taxonomy and bounded-wait primitive
//! - [`infrastructure`]: the process invoker, the notification
//!   dispatcher and the pure output parsers
//! - [`adapter`]: configuration and the [`SvnClient`] facade
//!
//! Control flow is synchronous per call: each operation spawns exactly
//! one child process and awaits it. Operations are cancelled by
//! dropping their future; [`SvnConfig::with_timeout`] arms an optional
//! per-invocation deadline.
//!
//! ## Error handling
//!
//! Every failure is a [`SvnError`]. Nonzero tool exits preserve the
//! exit code and full stderr, and [`SvnError::classification`] maps
//! the stderr text through an explicit pattern table
//! ([`common::FailureKind`]) so callers can tell lock contention,
//! missing working copies and authentication failures apart. Only lock
//! contention is retried (commit and lock acquisition, bounded by
//! [`adapter::config::RetryPolicy`]); only "not a working copy" is
//! downgraded, and only for status queries.
//!
//! ## Output format pinning
//!
//! The parsers and the progress-line grammar are pinned to one tool
//! version's output format. Format drift in the external tool is a
//! known fragility: it surfaces as parse errors or missing
//! notifications rather than silently degraded data.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod adapter;
pub mod common;
pub mod domain;
pub mod infrastructure;

// Re-export the types nearly every consumer touches.
pub use crate::adapter::{RetryPolicy, SvnClient, SvnConfig};
pub use crate::common::{FailureKind, PollPolicy, SvnError, SvnResult};
pub use crate::infrastructure::notify::{NotifyListener, SvnCommandKind};
