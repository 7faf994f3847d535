use super::parse_xml_date;
use super::xml;
use crate::common::{SvnError, SvnResult};
use crate::domain::{DirEntry, NodeKind};

/// Parse `list --xml` output into directory entries.
///
/// Only structural breakage (bad XML, wrong root) fails; a missing
/// optional field defaults to absent or zero, since the tool omits
/// sizes for directories and commit data for pre-history entries.
pub fn parse_list(xml_text: &str) -> SvnResult<Vec<DirEntry>> {
    let root = xml::parse_document(xml_text).map_err(|e| SvnError::parse_error("list", e))?;
    if root.name != "lists" {
        return Err(SvnError::parse_error(
            "list",
            format!("unexpected root element <{}>", root.name),
        ));
    }

    let mut entries = Vec::new();
    for list in root.children_named("list") {
        for entry in list.children_named("entry") {
            let commit = entry.child("commit");
            entries.push(DirEntry {
                path: entry.child_text("name").unwrap_or("").to_string(),
                node_kind: entry
                    .attr("kind")
                    .map(NodeKind::from_label)
                    .unwrap_or(NodeKind::Unknown),
                size: entry
                    .child_text("size")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(0),
                last_changed_revision: commit
                    .and_then(|c| c.attr("revision"))
                    .and_then(|r| r.parse().ok()),
                last_changed_date: commit
                    .and_then(|c| c.child_text("date"))
                    .and_then(parse_xml_date),
                last_commit_author: commit
                    .and_then(|c| c.child_text("author"))
                    .map(str::to_string),
                has_props: false,
            });
        }
    }
    Ok(entries)
}
