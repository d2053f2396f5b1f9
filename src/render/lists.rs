//! Re-joins list items that the chat client split across separate lines.
//!
//! A message typed as
//!
//! ```text
//! - milk
//! - eggs
//! ```
//!
//! arrives as `["- milk", Break, "- eggs"]`. Rendered naively every break turns
//! into a paragraph break, so the items are merged into one [`Piece::Block`]
//! whose lines sit directly under each other.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::piece::Piece;

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\. ").expect("BUG: hardcoded numbered list regex is invalid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    ListItem,
    Blank,
    Other,
}

/// `- item` / `* item`
pub fn bullet_kind(piece: &Piece) -> LineKind {
    match piece {
        Piece::Text(text) if text.starts_with("- ") || text.starts_with("* ") => {
            LineKind::ListItem
        }
        Piece::Break => LineKind::Blank,
        _ => LineKind::Other,
    }
}

/// `1. item`
pub fn numbered_kind(piece: &Piece) -> LineKind {
    match piece {
        Piece::Text(text) if NUMBERED_ITEM.is_match(text) => LineKind::ListItem,
        Piece::Break => LineKind::Blank,
        _ => LineKind::Other,
    }
}

/// Merge runs of `ListItem, (Blank, ListItem)*` into single blocks
///
/// Merged lines are joined by a newline plus `prefix` so they stay inside
/// the surrounding quote. Item text is copied raw; escaping is left to the
/// writer. With at most one list item the pieces are returned untouched,
/// as is an item that no other item follows.
pub fn collapse_lists(pieces: Vec<Piece>, line_kind: fn(&Piece) -> LineKind, prefix: &str) -> Vec<Piece> {
    let list_items = pieces.iter().filter(|p| line_kind(p) == LineKind::ListItem).count();
    if list_items <= 1 {
        return pieces;
    }

    let mut collapsed = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        if line_kind(&pieces[i]) != LineKind::ListItem {
            collapsed.push(pieces[i].clone());
            i += 1;
            continue;
        }

        let mut block = item_text(&pieces[i]).to_string();
        let mut merged = false;
        while i + 2 < pieces.len()
            && line_kind(&pieces[i + 1]) == LineKind::Blank
            && line_kind(&pieces[i + 2]) == LineKind::ListItem
        {
            block.push('\n');
            block.push_str(prefix);
            block.push_str(item_text(&pieces[i + 2]));
            merged = true;
            i += 2;
        }

        collapsed.push(if merged { Piece::Block(block) } else { pieces[i].clone() });
        i += 1;
    }

    collapsed
}

fn item_text(piece: &Piece) -> &str {
    piece.as_text().unwrap_or_default()
}
