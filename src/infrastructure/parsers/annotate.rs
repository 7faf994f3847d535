use crate::common::{SvnError, SvnResult};
use crate::domain::{AnnotationLine, Annotations};

/// Parse `annotate` output: one line per source line, prefixed with
/// the revision and author columns.
///
/// Lines not yet committed print `-` in both columns. The text starts
/// one space after the author column and is preserved verbatim,
/// including leading whitespace of the original source line.
pub fn parse_annotations(output: &str) -> SvnResult<Annotations> {
    let mut lines = Vec::new();
    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        lines.push(parse_line(line)?);
    }
    Ok(Annotations::new(lines))
}

fn parse_line(line: &str) -> SvnResult<AnnotationLine> {
    let after_indent = line.trim_start();
    let offset = line.len() - after_indent.len();

    let (rev_token, after_rev) = split_token(line, offset);
    let revision = match rev_token {
        "-" => None,
        token => Some(token.parse::<u64>().map_err(|_| {
            SvnError::parse_error("annotate", format!("bad revision column in '{line}'"))
        })?),
    };

    let author_start = skip_spaces(line, after_rev);
    let (author_token, after_author) = split_token(line, author_start);
    let author = match author_token {
        "" | "-" => None,
        token => Some(token.to_string()),
    };

    // A single separator space; everything after it is source text.
    let text_start = (after_author + 1).min(line.len());
    Ok(AnnotationLine {
        revision,
        author,
        text: line[text_start..].to_string(),
    })
}

fn split_token(line: &str, start: usize) -> (&str, usize) {
    let rest = &line[start..];
    let end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    (&rest[..end], start + end)
}

fn skip_spaces(line: &str, start: usize) -> usize {
    let rest = &line[start..];
    let skipped = rest.len() - rest.trim_start().len();
    start + skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_lines_in_order() {
        let output = "\
     4      alice int main(void) {
     4      alice     return 0;
     5        bob }
";
        let annotations = parse_annotations(output).unwrap();
        assert_eq!(annotations.len(), 3);
        let first = annotations.line(0).unwrap();
        assert_eq!(first.revision, Some(4));
        assert_eq!(first.author.as_deref(), Some("alice"));
        assert_eq!(first.text, "int main(void) {");
        // Source indentation after the separator space survives.
        assert_eq!(annotations.line(1).unwrap().text, "    return 0;");
        assert_eq!(annotations.line(2).unwrap().revision, Some(5));
    }

    #[test]
    fn test_uncommitted_lines_have_no_attribution() {
        let output = "     -          - still local\n";
        let annotations = parse_annotations(output).unwrap();
        let line = annotations.line(0).unwrap();
        assert_eq!(line.revision, None);
        assert_eq!(line.author, None);
        assert_eq!(line.text, "still local");
    }

    #[test]
    fn test_bad_revision_column_fails() {
        let err = parse_annotations("  abc   alice text\n").unwrap_err();
        assert!(matches!(err, SvnError::Parse { context: "annotate", .. }));
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_annotations("").unwrap().is_empty());
    }
}
