//! Domain model: the value records produced by parsers and returned by
//! the client facade.
//!
//! Every type here is immutable data with structural equality; nothing
//! performs I/O or holds on to the invocation that produced it.

pub mod annotations;
pub mod dir_entry;
pub mod info;
pub mod lock;
pub mod log_message;
pub mod node_kind;
pub mod property;
pub mod revision;
pub mod status;
pub mod svn_url;
pub mod target;

pub use annotations::{AnnotationLine, Annotations};
pub use dir_entry::DirEntry;
pub use info::Info;
pub use lock::Lock;
pub use log_message::{ChangeAction, ChangedPath, LogMessage};
pub use node_kind::NodeKind;
pub use property::Property;
pub use revision::{Revision, RevisionRange};
pub use status::{ManagedStatus, Status, StatusKind};
pub use svn_url::{SvnUrl, SvnUrlError};
pub use target::Target;
