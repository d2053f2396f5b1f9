//! Sanitising transcript text before it reaches the terminal
//!
//! Sender names and dates are printed by `stats` and `convert`. They come
//! from the export file, so escape sequences embedded in them are removed
//! with [`strip_ansi_codes`] first. Markdown output files are not touched.

use std::sync::LazyLock;

use regex::Regex;

static CSI_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("BUG: hardcoded CSI regex is invalid")
});

/// Removes ANSI CSI sequences and other control characters
///
/// Tabs and newlines survive.
///
/// # Examples
///
/// ```
/// use mht_chat_md::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mAlice\x1b[0m"), "Alice");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    CSI_SEQUENCE
        .replace_all(text, "")
        .chars()
        .filter(|&ch| !ch.is_control() || ch == '\t' || ch == '\n')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_colors_and_cursor_moves() {
        assert_eq!(strip_ansi_codes("\x1b[1m\x1b[31m张三\x1b[0m (1)"), "张三 (1)");
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H2024-01-01"), "2024-01-01");
    }

    #[test]
    fn test_strips_bare_controls() {
        assert_eq!(strip_ansi_codes("bell\x07 back\x08 cr\r"), "bell back cr");
    }

    #[test]
    fn test_keeps_plain_text() {
        assert_eq!(strip_ansi_codes("Bob (12345)\tok\n"), "Bob (12345)\tok\n");
        assert_eq!(strip_ansi_codes(""), "");
    }
}
