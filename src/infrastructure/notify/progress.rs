use regex::Regex;
use std::path::PathBuf;

/// Per-item action code of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    /// Item added (`A`).
    Add,
    /// Item deleted (`D`).
    Delete,
    /// Item content updated (`U`).
    Update,
    /// Update produced a conflict (`C`).
    Conflict,
    /// Local and repository changes merged (`G`).
    Merge,
    /// Item already existed (`E`).
    Exists,
    /// Item replaced (`R`).
    Replace,
}

impl ProgressAction {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(ProgressAction::Add),
            'D' => Some(ProgressAction::Delete),
            'U' => Some(ProgressAction::Update),
            'C' => Some(ProgressAction::Conflict),
            'G' => Some(ProgressAction::Merge),
            'E' => Some(ProgressAction::Exists),
            'R' => Some(ProgressAction::Replace),
            _ => None,
        }
    }
}

/// One recognized progress line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressLine {
    /// A per-item line: action column(s) followed by the path.
    Item {
        /// The touched path, as printed by the tool.
        path: PathBuf,
        /// Content action.
        action: ProgressAction,
        /// Property action, when a second column was present.
        prop_action: Option<ProgressAction>,
    },
    /// A completion line carrying the resulting revision.
    Completion {
        /// The revision the command completed against.
        revision: u64,
    },
}

/// Best-effort scanner for the progress lines long-running commands
/// print.
///
/// The grammar is a fixed prefix of positional action columns followed
/// by a path, plus a closed set of completion sentences. It is pinned
/// to one tool version's output; a line that fits neither shape is not
/// an error, it is simply skipped. Loosening the grammar to chase
/// output drift hides real format changes, so drift should surface as
/// missing notifications, never as bogus ones.
#[derive(Debug)]
pub struct ProgressScanner {
    item: Regex,
    completion: Regex,
}

impl Default for ProgressScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressScanner {
    /// Build a scanner with the pinned grammar.
    pub fn new() -> Self {
        Self {
            // Action column, optional property column, at least one
            // space, then the path.
            item: Regex::new(r"^([ADUCGER])([ADUCGER ])?\s+(\S.*)$").unwrap(),
            completion: Regex::new(
                r"^(?:Updated to|At|Checked out|Committed|Exported) revision (\d+)\.",
            )
            .unwrap(),
        }
    }

    /// Interpret one output line; `None` when the line is not a
    /// recognized progress line.
    pub fn scan(&self, line: &str) -> Option<ProgressLine> {
        let line = line.trim_end_matches('\r');
        if let Some(caps) = self.completion.captures(line) {
            let revision = caps[1].parse::<u64>().ok()?;
            return Some(ProgressLine::Completion { revision });
        }
        let caps = self.item.captures(line)?;
        let action = ProgressAction::from_code(caps[1].chars().next()?)?;
        let prop_action = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .and_then(ProgressAction::from_code);
        Some(ProgressLine::Item {
            path: PathBuf::from(&caps[3]),
            action,
            prop_action,
        })
    }
}
