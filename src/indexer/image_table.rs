use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use walkdir::WalkDir;

/// Upper-cased file stem to local file name
///
/// Built once per run from the image directory and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    files: HashMap<String, String>,
}

impl ImageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file_name` under `stem`; a later file with the same stem wins
    pub fn insert(&mut self, stem: &str, file_name: &str) {
        if let Some(previous) = self.files.insert(stem.to_uppercase(), file_name.to_string()) {
            debug!("Image {} replaces {} for stem {}", file_name, previous, stem);
        }
    }

    /// Look up an identifier that is already upper-cased
    pub fn get(&self, id: &str) -> Option<&str> {
        self.files.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Index the regular files directly inside `dir` by stem
///
/// Subdirectories are not descended into and symlinks are skipped. Entries
/// are visited in file-name order so duplicate stems resolve the same way on
/// every platform.
///
/// # Errors
///
/// Returns an error if `dir` or one of its entries cannot be read. Files
/// whose names are not valid UTF-8 are skipped with a warning.
pub fn build_image_table(dir: &Path) -> Result<ImageTable> {
    let mut table = ImageTable::new();

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read image directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let (Some(stem), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            warn!("Skipping image with non UTF-8 name: {}", path.display());
            continue;
        };

        table.insert(stem, file_name);
    }

    debug!("Indexed {} images in {}", table.len(), dir.display());
    Ok(table)
}
