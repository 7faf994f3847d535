use crate::common::{SvnError, SvnResult};
use crate::domain::{Info, ManagedStatus, Status, StatusKind};
use std::path::PathBuf;

/// One tokenized line of verbose status output.
///
/// Carries only what the status columns say; repository metadata comes
/// from the matching info block when the two are composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPart {
    /// The path, exactly as printed by the tool.
    pub path: PathBuf,
    /// Content state (first column).
    pub text_status: StatusKind,
    /// Property state (second column).
    pub prop_status: StatusKind,
    /// Third column: item is locked in the working copy.
    pub wc_locked: bool,
    /// Fourth column: item is scheduled with history.
    pub copied: bool,
    /// Fifth column: item is switched relative to its parent.
    pub switched: bool,
    /// Working revision, when the verbose columns carried one.
    pub revision: Option<u64>,
}

/// Footer and chatter lines the status command may append; not items.
fn is_noise_line(line: &str) -> bool {
    line.starts_with("Status against revision")
        || line.starts_with("Performing status on external item")
}

/// Tokenize verbose (`-v`) status output into one part per path.
///
/// The column grammar is pinned: six positional state characters, then
/// for versioned items the working revision, last-changed revision and
/// author, then the path. Unversioned and ignored lines carry only the
/// path. An unknown state character is a [`SvnError::Parse`].
pub fn parse_status_parts(output: &str) -> SvnResult<Vec<StatusPart>> {
    let mut parts = Vec::new();
    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || is_noise_line(line) {
            continue;
        }

        let (flags, rest) = split_columns(line);
        let mut chars = flags.chars();
        let text_char = chars.next().unwrap_or(' ');
        let prop_char = chars.next().unwrap_or(' ');
        let wc_locked = chars.next() == Some('L');
        let copied = chars.next() == Some('+');
        let switched = chars.next() == Some('S');

        let text_status = StatusKind::from_status_char(text_char).ok_or_else(|| {
            SvnError::parse_error("status", format!("unknown state character in '{line}'"))
        })?;
        let prop_status = StatusKind::from_status_char(prop_char).ok_or_else(|| {
            SvnError::parse_error("status", format!("unknown state character in '{line}'"))
        })?;

        let (revision, path) = if text_status.is_managed() {
            split_verbose_fields(rest)
        } else {
            (None, rest.trim().to_string())
        };
        if path.is_empty() {
            return Err(SvnError::parse_error(
                "status",
                format!("missing path in '{line}'"),
            ));
        }

        parts.push(StatusPart {
            path: PathBuf::from(path),
            text_status,
            prop_status,
            wc_locked,
            copied,
            switched,
            revision,
        });
    }
    Ok(parts)
}

/// Split a line into the six-character state column block and the rest.
fn split_columns(line: &str) -> (&str, &str) {
    // The state columns are ASCII by construction, so a byte index is a
    // character boundary here.
    if line.len() > 6 {
        line.split_at(6)
    } else {
        (line, "")
    }
}

/// Extract `(working revision, path)` from the verbose field block.
///
/// Versioned rows normally read `REV LASTREV AUTHOR PATH`; rows for
/// externals and other column-less variants degrade to path-only, so a
/// block that does not fit the four-field shape is taken as a bare
/// path rather than rejected.
fn split_verbose_fields(rest: &str) -> (Option<u64>, String) {
    let spans = token_spans(rest, 3);
    if spans.len() == 3 {
        let wc_rev = &rest[spans[0].0..spans[0].1];
        let last_rev = &rest[spans[1].0..spans[1].1];
        // The path is everything after the author token, preserving any
        // internal spaces.
        let path = rest[spans[2].1..].trim();
        if is_revision_token(wc_rev) && is_revision_token(last_rev) && !path.is_empty() {
            return (wc_rev.parse::<u64>().ok(), path.to_string());
        }
    }
    (None, rest.trim().to_string())
}

/// Byte spans of the first `count` whitespace-separated tokens.
fn token_spans(s: &str, count: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(token_start) = start.take() {
                spans.push((token_start, i));
                if spans.len() == count {
                    return spans;
                }
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(token_start) = start {
        spans.push((token_start, s.len()));
    }
    spans
}

/// Revision columns print a number, or `-`/`?` for items without one.
fn is_revision_token(token: &str) -> bool {
    token == "-" || token == "?" || token.chars().all(|c| c.is_ascii_digit())
}

/// Compose status parts with their info blocks into full records.
///
/// The join key is the printed path. Parts describing unversioned or
/// ignored paths, and parts with no matching info block, become the
/// distinct unmanaged variant rather than half-filled records.
pub fn compose_statuses(parts: &[StatusPart], infos: &[Info]) -> Vec<Status> {
    parts
        .iter()
        .map(|part| {
            if !part.text_status.is_managed() {
                return Status::unmanaged(
                    part.path.clone(),
                    part.text_status == StatusKind::Ignored,
                );
            }
            match infos.iter().find(|info| info.path == part.path) {
                Some(info) => Status::Managed(ManagedStatus {
                    path: part.path.clone(),
                    text_status: part.text_status,
                    prop_status: part.prop_status,
                    copied: part.copied,
                    url: info.url.clone(),
                    revision: info.revision.or(part.revision),
                    last_changed_revision: info.last_changed_revision,
                    last_changed_date: info.last_changed_date,
                    last_commit_author: info.last_commit_author.clone(),
                    node_kind: info.node_kind,
                    copied_from_url: info.copied_from_url.clone(),
                    lock: info.lock.clone(),
                    conflict_old: info.conflict_old.clone(),
                    conflict_new: info.conflict_new.clone(),
                    conflict_working: info.conflict_working.clone(),
                }),
                None => Status::unmanaged(part.path.clone(), false),
            }
        })
        .collect()
}
