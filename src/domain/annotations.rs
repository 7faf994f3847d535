use serde::{Deserialize, Serialize};

/// One annotated source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationLine {
    /// Revision that last touched the line; absent for local edits.
    pub revision: Option<u64>,
    /// Author of that revision; absent for local edits.
    pub author: Option<String>,
    /// The original line text.
    pub text: String,
}

/// Per-line authorship of a file, indexed by zero-based line number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    lines: Vec<AnnotationLine>,
}

impl Annotations {
    /// Build annotations from parsed lines.
    pub fn new(lines: Vec<AnnotationLine>) -> Self {
        Self { lines }
    }

    /// Number of annotated lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the file had no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The annotation for line `index`, counted from zero.
    pub fn line(&self, index: usize) -> Option<&AnnotationLine> {
        self.lines.get(index)
    }

    /// Iterate over all lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationLine> {
        self.lines.iter()
    }
}
