use super::xml;
use super::parse_xml_date;
use crate::common::{SvnError, SvnResult};
use crate::domain::{ChangeAction, ChangedPath, LogMessage};

/// Parse `log --xml` output into log entries, in document order
/// (newest first, as the tool emits them).
///
/// Change paths are present only when the verbose flag asked for them.
/// An unknown action code is a hard [`SvnError::Parse`]: inventing an
/// action would corrupt downstream change tracking.
pub fn parse_log(xml_text: &str) -> SvnResult<Vec<LogMessage>> {
    let root = xml::parse_document(xml_text).map_err(|e| SvnError::parse_error("log", e))?;
    if root.name != "log" {
        return Err(SvnError::parse_error(
            "log",
            format!("unexpected root element <{}>", root.name),
        ));
    }

    let mut messages = Vec::new();
    for entry in root.children_named("logentry") {
        let revision = entry
            .attr("revision")
            .and_then(|r| r.parse::<u64>().ok())
            .ok_or_else(|| SvnError::parse_error("log", "logentry without a revision number"))?;

        let mut changed_paths = Vec::new();
        if let Some(paths) = entry.child("paths") {
            for path in paths.children_named("path") {
                let code = path
                    .attr("action")
                    .and_then(|a| a.chars().next())
                    .ok_or_else(|| {
                        SvnError::parse_error("log", format!("path without action in r{revision}"))
                    })?;
                let action = ChangeAction::from_code(code).ok_or_else(|| {
                    SvnError::parse_error(
                        "log",
                        format!("unknown action code '{code}' in r{revision}"),
                    )
                })?;
                changed_paths.push(ChangedPath {
                    path: path.text.clone(),
                    action,
                    copy_src_path: path.attr("copyfrom-path").map(str::to_string),
                    copy_src_revision: path.attr("copyfrom-rev").and_then(|r| r.parse().ok()),
                });
            }
        }

        messages.push(LogMessage {
            revision,
            author: entry.child_text("author").map(str::to_string),
            date: entry.child_text("date").and_then(parse_xml_date),
            message: entry.child_text("msg").unwrap_or("").to_string(),
            changed_paths,
        });
    }
    Ok(messages)
}
