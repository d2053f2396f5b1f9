use std::mem;

use crate::render::piece::Piece;

/// Indentation that makes markdown treat a line as verbatim code
pub const CODE_INDENT: &str = "    ";

/// Leading spaces at which a message is rendered as a code block
pub const MIN_CODE_INDENT: usize = CODE_INDENT.len();

enum CodeLine<'a> {
    Code(String),
    Image(&'a str),
}

/// Largest run of leading spaces over all text pieces; all-space text counts as 0
pub fn max_leading_spaces(pieces: &[Piece]) -> usize {
    pieces
        .iter()
        .filter_map(Piece::as_text)
        .map(|text| {
            let indent = text.len() - text.trim_start_matches(' ').len();
            if indent == text.len() { 0 } else { indent }
        })
        .max()
        .unwrap_or(0)
}

/// Render `pieces` as an indented code block if any line is indented enough
///
/// Returns `None` when no text piece has [`MIN_CODE_INDENT`] leading spaces,
/// in which case the caller renders normally. Otherwise every line is
/// written as `{prefix}    {line}` after a blank quoted line, text is kept
/// verbatim, and images are lifted onto their own unindented line between
/// blank quoted lines so they do not end up inside the code.
pub fn try_render_code_block(pieces: &[Piece], prefix: &str) -> Option<String> {
    if max_leading_spaces(pieces) < MIN_CODE_INDENT {
        return None;
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut line_open = false;
    let mut after_image = false;

    for piece in pieces {
        match piece {
            Piece::Text(text) | Piece::Block(text) => {
                current.push_str(text);
                line_open = true;
                after_image = false;
            }
            Piece::Break => {
                // The image already ended its own line
                if after_image {
                    after_image = false;
                    continue;
                }
                lines.push(CodeLine::Code(mem::take(&mut current)));
                line_open = false;
            }
            Piece::Image(link) => {
                if line_open {
                    lines.push(CodeLine::Code(mem::take(&mut current)));
                    line_open = false;
                }
                lines.push(CodeLine::Image(link));
                after_image = true;
            }
        }
    }
    if line_open {
        lines.push(CodeLine::Code(current));
    }

    let blank = format!("{}\n", prefix);
    let mut out = blank.clone();
    let mut last_blank = true;
    let total = lines.len();

    for (index, line) in lines.into_iter().enumerate() {
        match line {
            CodeLine::Code(text) => {
                out.push_str(prefix);
                out.push_str(CODE_INDENT);
                out.push_str(&text);
                out.push('\n');
                last_blank = false;
            }
            CodeLine::Image(link) => {
                if !last_blank {
                    out.push_str(&blank);
                }
                out.push_str(prefix);
                out.push_str(link);
                out.push('\n');
                last_blank = false;
                if index + 1 < total {
                    out.push_str(&blank);
                    last_blank = true;
                }
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Piece {
        Piece::Text(s.to_string())
    }

    #[test]
    fn test_max_leading_spaces() {
        assert_eq!(max_leading_spaces(&[text("    foo"), text("  bar")]), 4);
        assert_eq!(max_leading_spaces(&[text("        "), text(" x")]), 1);
        assert_eq!(max_leading_spaces(&[Piece::Break]), 0);
    }

    #[test]
    fn test_shallow_indent_is_not_code() {
        assert!(try_render_code_block(&[text("  foo"), Piece::Break, text(" bar")], ">> ").is_none());
    }

    #[test]
    fn test_renders_indented_lines() {
        let pieces = [text("fn main() {"), Piece::Break, text("    run();"), Piece::Break, text("}")];
        assert_eq!(
            try_render_code_block(&pieces, ">> ").unwrap(),
            ">> \n>>     fn main() {\n>>         run();\n>>     }\n"
        );
    }

    #[test]
    fn test_segments_without_break_share_a_line() {
        let pieces = [text("    foo"), text("  bar")];
        assert_eq!(try_render_code_block(&pieces, ">> ").unwrap(), ">> \n>>         foo  bar\n");
    }

    #[test]
    fn test_images_get_their_own_line() {
        let pieces = [
            text("    a"),
            Piece::Image("![[x.png]]".to_string()),
            Piece::Break,
            text("    b"),
        ];
        assert_eq!(
            try_render_code_block(&pieces, ">> ").unwrap(),
            ">> \n>>         a\n>> \n>> ![[x.png]]\n>> \n>>         b\n"
        );
    }

    #[test]
    fn test_text_is_not_escaped() {
        let pieces = [text("    *ptr = [0];")];
        assert_eq!(try_render_code_block(&pieces, ">> ").unwrap(), ">> \n>>         *ptr = [0];\n");
    }
}
