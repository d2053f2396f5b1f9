use log::debug;

use crate::indexer::ImageTable;

/// Label shown for images whose file is missing ("image no longer valid")
pub const BROKEN_IMAGE_LABEL: &str = "图片已失效";

/// Embed link for a local image file, or a broken-link placeholder
///
/// Lookups never fail; an identifier without a matching file renders as
/// `[[ID|图片已失效]]`.
pub fn resolve_image(images: &ImageTable, source_id: &str) -> String {
    let id = source_id.to_uppercase();
    match images.get(&id) {
        Some(file) => format!("![[{}]]", file),
        None => {
            debug!("No local file for image {}", id);
            format!("[[{}|{}]]", id, BROKEN_IMAGE_LABEL)
        }
    }
}
