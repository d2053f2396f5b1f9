/// Tokens that markdown (or the wiki-link/callout dialect layered on it) would
/// interpret, in the order they are replaced
const ESCAPED_TOKENS: [&str; 8] = ["---", "===", "[", "]", "<", "#", "~~", "*"];

/// Backslash-escape every markup-significant token in plain message text
///
/// Each character of a matched token gets its own backslash, so `---`
/// becomes `\-\-\-`.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = text.to_string();
    for token in ESCAPED_TOKENS {
        if escaped.contains(token) {
            escaped = escaped.replace(token, &backslash_each(token));
        }
    }
    escaped
}

/// Escape a piece of output unless it spans more than one line break
///
/// Longer pieces are structural markup (merged lists) whose markers must
/// survive as written.
pub fn escape_unless_multiline(text: &str) -> String {
    if text.matches('\n').count() > 1 {
        text.to_string()
    } else {
        escape_markdown(text)
    }
}

fn backslash_each(token: &str) -> String {
    let mut out = String::with_capacity(token.len() * 2);
    for ch in token.chars() {
        out.push('\\');
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_brackets_emphasis_and_rules() {
        assert_eq!(escape_markdown("a [b] *c* --- text"), r"a \[b\] \*c\* \-\-\- text");
    }

    #[test]
    fn test_escapes_headings_html_and_strikethrough() {
        assert_eq!(escape_markdown("# title <b> ~~gone~~"), r"\# title \<b> \~\~gone\~\~");
        assert_eq!(escape_markdown("==="), r"\=\=\=");
    }

    #[test]
    fn test_short_runs_are_left_alone() {
        assert_eq!(escape_markdown("a-b == c ~ d"), "a-b == c ~ d");
    }

    #[test]
    fn test_multiline_markup_is_left_alone() {
        assert_eq!(escape_unless_multiline("* a [x]\n>> * b"), "\\* a \\[x\\]\n>> \\* b");
        assert_eq!(escape_unless_multiline("- [a]\n>> - b\n>> - c"), "- [a]\n>> - b\n>> - c");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(escape_markdown("hello 你好"), "hello 你好");
        assert_eq!(escape_markdown(""), "");
    }
}
