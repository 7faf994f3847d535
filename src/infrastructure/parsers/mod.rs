//! Pure parsers mapping captured tool output to domain records.
//!
//! Each function takes the raw text of one command family and returns
//! an ordered sequence of records, with no side effects and no retry
//! logic. The grammars are pinned to one tool version's output format;
//! when the tool drifts, these parsers fail loudly (or default the
//! affected optional field) rather than guessing.

pub mod annotate;
pub mod info;
pub mod list;
pub mod log;
pub mod proplist;
pub mod status;
mod xml;

pub use annotate::parse_annotations;
pub use info::parse_info_parts;
pub use list::parse_list;
pub use log::parse_log;
pub use proplist::parse_property_names;
pub use status::{compose_statuses, parse_status_parts, StatusPart};

use chrono::{DateTime, Utc};

/// Parse the ISO-8601 timestamps used in XML output
/// (`2006-01-01T12:00:00.000000Z`).
pub(crate) fn parse_xml_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Parse the labeled timestamps used in plain-text output
/// (`2006-03-21 14:53:24 +0100 (Tue, 21 Mar 2006)`).
///
/// Only the machine-readable prefix is consumed; the parenthesized
/// human-readable tail is ignored.
pub(crate) fn parse_info_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    let prefix = trimmed.split(" (").next().unwrap_or(trimmed);
    DateTime::parse_from_str(prefix, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
