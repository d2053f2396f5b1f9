use crate::indexer::ImageTable;
use crate::models::MessageSegment;
use crate::render::images::resolve_image;

/// A message segment on its way to markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Plain message text
    Text(String),
    /// Line break between pieces
    Break,
    /// Resolved image embed or placeholder; written verbatim
    Image(String),
    /// Merged list lines, joined with their quote prefix
    Block(String),
}

impl Piece {
    /// Convert extracted segments, resolving images and normalising non-breaking spaces
    pub fn from_segments(segments: &[MessageSegment], images: &ImageTable) -> Vec<Piece> {
        segments
            .iter()
            .map(|segment| match segment {
                MessageSegment::Text(text) => Piece::Text(text.replace('\u{a0}', " ")),
                MessageSegment::LineBreak => Piece::Break,
                MessageSegment::Image { source_id } => Piece::Image(resolve_image(images, source_id)),
            })
            .collect()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Piece::Text(text) => Some(text),
            _ => None,
        }
    }
}
