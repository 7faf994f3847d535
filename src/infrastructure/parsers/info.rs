use super::parse_info_date;
use crate::common::{SvnError, SvnResult};
use crate::domain::{Info, Lock, NodeKind};
use std::path::PathBuf;

/// Split labeled `info` output into one record per target.
///
/// Blocks are separated by blank lines; each block is `Key: value`
/// lines. The key set is pinned to one tool version; unknown keys are
/// ignored so informational additions do not break the parse, but a
/// block without a `Path` line is malformed.
pub fn parse_info_parts(output: &str) -> SvnResult<Vec<Info>> {
    let mut infos = Vec::new();
    for block in output.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }
        infos.push(parse_block(&lines)?);
    }
    Ok(infos)
}

fn parse_block(lines: &[&str]) -> SvnResult<Info> {
    let mut path: Option<PathBuf> = None;
    let mut info = Info::empty("");
    let mut lock_owner: Option<String> = None;
    let mut lock_token: Option<String> = None;
    let mut lock_created = None;
    let mut lock_expires = None;
    let mut lock_comment: Option<String> = None;

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        index += 1;
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Path" => path = Some(PathBuf::from(value)),
            "URL" | "Url" => info.url = value.parse().ok(),
            "Repository Root" => info.repository_root = value.parse().ok(),
            "Repository UUID" => info.repository_uuid = Some(value.to_string()),
            "Revision" => info.revision = value.parse().ok(),
            "Node Kind" => info.node_kind = NodeKind::from_label(value),
            "Schedule" => info.schedule = Some(value.to_string()),
            "Last Changed Author" => info.last_commit_author = Some(value.to_string()),
            "Last Changed Rev" => info.last_changed_revision = value.parse().ok(),
            "Last Changed Date" => info.last_changed_date = parse_info_date(value),
            "Copied From URL" => info.copied_from_url = value.parse().ok(),
            "Copied From Rev" => info.copied_from_revision = value.parse().ok(),
            "Checksum" => info.checksum = Some(value.to_string()),
            "Conflict Previous Base File" => info.conflict_old = Some(PathBuf::from(value)),
            "Conflict Previous Working File" => info.conflict_working = Some(PathBuf::from(value)),
            "Conflict Current Base File" => info.conflict_new = Some(PathBuf::from(value)),
            "Lock Token" => lock_token = Some(value.to_string()),
            "Lock Owner" => lock_owner = Some(value.to_string()),
            "Lock Created" => lock_created = parse_info_date(value),
            "Lock Expires" => lock_expires = parse_info_date(value),
            key if key.starts_with("Lock Comment") => {
                // The comment body is the remaining lines of the block.
                lock_comment = Some(lines[index..].join("\n"));
                index = lines.len();
            }
            _ => {}
        }
    }

    let path = path.ok_or_else(|| {
        SvnError::parse_error("info", format!("block missing Path: '{}'", lines[0]))
    })?;
    info.path = path.clone();
    if let Some(owner) = lock_owner {
        info.lock = Some(Lock {
            owner,
            path,
            token: lock_token,
            comment: lock_comment,
            created: lock_created,
            expires: lock_expires,
        });
    }
    Ok(info)
}
