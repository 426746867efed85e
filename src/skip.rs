//! `; nice65: <options>` on the first line of a file.

use indexmap::IndexSet;

const MARKER: &str = "nice65:";

/// Options listed in a leading `; nice65:` comment, lowercased and in the
/// order written. `None` when the line is not such a comment.
pub fn options(first_line: &str) -> Option<IndexSet<String>> {
    let rest = first_line.trim_start_matches([' ', '\t']).strip_prefix(';')?;
    let rest = rest.trim_start();
    let head = rest.get(..MARKER.len())?;
    if !head.eq_ignore_ascii_case(MARKER) {
        return None;
    }
    let options: IndexSet<String> = rest[MARKER.len()..]
        .to_ascii_lowercase()
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Some(options)
}

/// Whether the file must be left byte-for-byte untouched.
pub fn skip_requested(first_line: &str) -> bool {
    match options(first_line) {
        Some(options) => {
            tracing::debug!("nice65 options: {options:?}");
            options.contains("ignore")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_option_lists() {
        let parsed = options("  ;  NICE65: Foo,ignore  bar").unwrap();
        assert_eq!(
            parsed.iter().collect::<Vec<_>>(),
            vec!["foo", "ignore", "bar"]
        );
        assert!(options("; nice65:").unwrap().is_empty());
        assert!(options("; nice 65: ignore").is_none());
        assert!(options("lda #1 ; nice65: ignore").is_none());
        assert!(options("").is_none());
    }

    #[test]
    fn ignore_is_detected_in_any_case() {
        assert!(skip_requested("; nice65: ignore"));
        assert!(skip_requested(";Nice65:IGNORE"));
        assert!(skip_requested("\t; nice65: tabs, ignore"));
        assert!(!skip_requested("; nice65: ignored"));
        assert!(!skip_requested("; nice65: keep"));
        assert!(!skip_requested("; just a comment"));
    }
}
