use crate::common::SvnResult;

/// Extract property names from `proplist` output.
///
/// The format is a `Properties on '...':` header per target followed by
/// one indented name per line. Values are not part of this output; the
/// caller retrieves each one with a separate binary-safe `propget`.
pub fn parse_property_names(output: &str) -> SvnResult<Vec<String>> {
    let mut names = Vec::new();
    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with("Properties on '") {
            continue;
        }
        let name = line.strip_prefix("  ").unwrap_or_else(|| line.trim());
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
