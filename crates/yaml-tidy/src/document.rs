//! yaml document markers
//!
//! Every normalized document starts with `---\n` and ends with `\n...\n`.
pub const START_MARKER: &str = "---";
pub const END_MARKER: &str = "...";

/// Add missing start and end markers
///
/// Existing markers are never duplicated and applying this twice gives the same text as applying
/// it once.
pub fn normalize(text: &str) -> String {
    let with_start = ensure_start_marker(text);
    ensure_end_marker(&with_start)
}

fn ensure_start_marker(text: &str) -> String {
    if text.starts_with("---\n") {
        return text.to_owned();
    }

    let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));
    if first_line.trim_end() == START_MARKER {
        return format!("{START_MARKER}\n{rest}");
    }

    format!("{START_MARKER}\n{}", skip_leading_blank_lines(text))
}

fn ensure_end_marker(text: &str) -> String {
    if text.ends_with("\n...\n") {
        return text.to_owned();
    }

    let trimmed = text.trim_end();
    if trimmed.ends_with("\n...") {
        return format!("{trimmed}\n");
    }

    format!("{trimmed}\n{END_MARKER}\n")
}

/// Drop whitespace-only lines at the top, keeping the indentation of the first real line
fn skip_leading_blank_lines(text: &str) -> &str {
    let content_start = text.len() - text.trim_start().len();
    match text[..content_start].rfind('\n') {
        Some(newline) => &text[newline + 1..],
        None => text,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adds_both_markers() {
        assert_eq!(normalize("- hosts: all\n"), "---\n- hosts: all\n...\n");
    }

    #[test]
    fn keeps_existing_markers() {
        let text = "---\n- hosts: all\n...\n";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn trims_trailing_whitespace_before_end_marker() {
        assert_eq!(
            normalize("---\n- hosts: all\n\n   \n\n"),
            "---\n- hosts: all\n...\n"
        );
    }

    #[test]
    fn end_marker_without_final_newline() {
        assert_eq!(normalize("---\na: 1\n..."), "---\na: 1\n...\n");
        assert_eq!(normalize("---\na: 1\n...  \n\n"), "---\na: 1\n...\n");
    }

    #[test]
    fn start_marker_with_trailing_whitespace() {
        assert_eq!(normalize("---  \na: 1\n"), "---\na: 1\n...\n");
        assert_eq!(normalize("---"), "---\n...\n");
    }

    #[test]
    fn leading_blank_lines_are_dropped() {
        assert_eq!(normalize("\n  \n  a: 1\n"), "---\n  a: 1\n...\n");
    }

    #[test]
    fn empty_document() {
        assert_eq!(normalize(""), "---\n...\n");
        assert_eq!(normalize("\n\n"), "---\n...\n");
    }

    #[test]
    fn idempotent() {
        for text in [
            "",
            "---",
            "...",
            "a: 1",
            "\n\n a: 1\n\n",
            "---\na: 1\n...",
            "--- # comment\na: 1\n",
        ] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "input: {text:?}");
        }
    }
}
