use std::fs::{self, File};
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};

/// Checks that the image directory exists and is a directory
///
/// # Errors
///
/// Returns an error if the path is missing or names something other than a
/// directory.
pub fn validate_image_dir(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Image directory not found: {}", path.display()))?;
    if !metadata.is_dir() {
        bail!("Image path is not a directory: {}", path.display());
    }
    Ok(())
}

/// Creates `path` (and its parents) when absent
///
/// # Errors
///
/// Returns an error if something other than a directory already exists at
/// `path`, or if the directory cannot be created.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => bail!("Output path exists and is not a directory: {}", path.display()),
        Err(_) => fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory: {}", path.display())),
    }
}

/// Rejects names that would place a file outside its directory
///
/// Date text comes straight from the transcript and becomes a file name, so
/// it must be a single normal path component.
///
/// # Errors
///
/// Returns an error for empty names, separators, or `.`/`..` components.
pub fn validate_file_stem(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Empty document name");
    }
    if name.contains(['/', '\\']) {
        bail!("Document name contains a path separator: {:?}", name);
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("Document name is not a plain file name: {:?}", name),
    }
}

/// Opens an input document for streaming
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))
}
