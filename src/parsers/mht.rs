//! Splits a `.mht` chat archive into its HTML transcript(s) and image attachments.
//!
//! The archive is MIME multipart. Parts are read line by line; HTML parts can be
//! very large and are streamed straight to disk, image parts are buffered and
//! base64-decoded. Images are renamed to `UPPERCASE(stem).ext` so the renderer's
//! case-normalised lookup finds them.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info, warn};
use regex::bytes::Regex;

use crate::utils::validate_file_stem;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"boundary="(.*)"$"#).expect("BUG: hardcoded boundary regex is invalid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    Html,
    Jpeg,
    Png,
    Gif,
    Unknown,
}

impl PartKind {
    fn from_content_type(value: &str) -> Self {
        match value {
            "text/html" => Self::Html,
            "image/jpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/gif" => Self::Gif,
            _ => Self::Unknown,
        }
    }

    fn image_extension(self) -> Option<&'static str> {
        match self {
            Self::Jpeg => Some("jpg"),
            Self::Png => Some("png"),
            Self::Gif => Some("gif"),
            Self::Html | Self::Unknown => None,
        }
    }
}

#[derive(Debug)]
struct PartHeader {
    kind: PartKind,
    location: String,
    encoding: String,
}

/// What an extraction run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub html_files: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
    pub skipped_parts: usize,
}

/// Extract every HTML and image part of the archive at `mht_path`
///
/// Both output directories must already exist.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or has no multipart
/// boundary, or if writing an output file fails.
pub fn extract_mht(mht_path: &Path, html_dir: &Path, attachment_dir: &Path) -> Result<ExtractReport> {
    let file = File::open(mht_path)
        .with_context(|| format!("Failed to open archive: {}", mht_path.display()))?;
    extract_parts(BufReader::new(file), html_dir, attachment_dir)
}

/// Extract from any buffered reader; see [`extract_mht`]
pub fn extract_parts<R: BufRead>(
    mut reader: R,
    html_dir: &Path,
    attachment_dir: &Path,
) -> Result<ExtractReport> {
    skip_utf8_bom(&mut reader)?;

    let mut report = ExtractReport::default();
    let mut line = Vec::new();

    let delimiter = find_delimiter(&mut reader, &mut line)?;
    let terminator = [delimiter.as_slice(), b"--"].concat();

    // Skip the preamble up to the first part
    loop {
        if !read_line(&mut reader, &mut line)? {
            return Ok(report);
        }
        if line.starts_with(&delimiter) {
            break;
        }
    }

    loop {
        if line == terminator {
            break;
        }

        let Some(mut header) = read_part_header(&mut reader, &mut line)? else {
            break;
        };

        if let Some(ext) = header.kind.image_extension()
            && !header.location.is_empty()
        {
            header.location = normalized_image_name(&header.location, ext);
        }

        let at_end = if header.kind == PartKind::Html {
            let name = format!("index-{}.html", report.html_files.len() + 1);
            let path = html_dir.join(name);
            let at_end = stream_html_part(&mut reader, &mut line, &delimiter, &path)?;
            info!("Wrote html to {}", path.display());
            report.html_files.push(path);
            at_end
        } else {
            let mut content = Vec::new();
            let at_end = read_part_body(&mut reader, &mut line, &delimiter, &mut content)?;
            match write_image_part(&header, &content, attachment_dir)? {
                Some(path) => {
                    info!("Wrote image ({}) to {}", report.images.len() + 1, path.display());
                    report.images.push(path);
                }
                None => report.skipped_parts += 1,
            }
            at_end
        };

        if at_end {
            break;
        }
    }

    Ok(report)
}

fn skip_utf8_bom<R: BufRead>(reader: &mut R) -> Result<()> {
    let buf = reader.fill_buf().context("Failed to read archive")?;
    if buf.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(())
}

/// Reads one line without its terminator; `false` at end of input
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> Result<bool> {
    line.clear();
    let read = reader.read_until(b'\n', line).context("Failed to read archive")?;
    if read == 0 {
        return Ok(false);
    }
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    Ok(true)
}

fn find_delimiter<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> Result<Vec<u8>> {
    while read_line(reader, line)? {
        if let Some(captures) = BOUNDARY_REGEX.captures(line) {
            let boundary = captures.get(1).map(|m| m.as_bytes()).unwrap_or_default();
            return Ok([b"--".as_slice(), boundary].concat());
        }
    }
    bail!("No multipart boundary found in archive")
}

/// Parses `Key: Value` lines up to the first line without a colon
fn read_part_header<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> Result<Option<PartHeader>> {
    let mut header =
        PartHeader { kind: PartKind::Unknown, location: String::new(), encoding: String::new() };

    loop {
        if !read_line(reader, line)? {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(line);
        let Some((key, value)) = text.split_once(':') else {
            break;
        };

        let value = value.trim();
        match key.trim() {
            "Content-Type" => header.kind = PartKind::from_content_type(value),
            "Content-Location" => header.location = value.to_string(),
            "Content-Transfer-Encoding" => header.encoding = value.to_string(),
            other => debug!("Ignoring part header {}", other),
        }
    }

    Ok(Some(header))
}

/// Copies body lines to `path` until the next delimiter; `true` at end of input
///
/// Line terminators are dropped, so text wrapped across source lines comes
/// out on one line.
fn stream_html_part<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    delimiter: &[u8],
    path: &Path,
) -> Result<bool> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create html file: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let at_end = loop {
        if !read_line(reader, line)? {
            break true;
        }
        if line.starts_with(delimiter) {
            break false;
        }
        out.write_all(line)
            .with_context(|| format!("Failed to write html file: {}", path.display()))?;
    };

    out.flush().with_context(|| format!("Failed to write html file: {}", path.display()))?;
    Ok(at_end)
}

/// Concatenates body lines until the next delimiter; `true` at end of input
fn read_part_body<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    delimiter: &[u8],
    content: &mut Vec<u8>,
) -> Result<bool> {
    loop {
        if !read_line(reader, line)? {
            return Ok(true);
        }
        if line.starts_with(delimiter) {
            return Ok(false);
        }
        content.extend_from_slice(line);
    }
}

fn write_image_part(header: &PartHeader, content: &[u8], dir: &Path) -> Result<Option<PathBuf>> {
    if header.kind.image_extension().is_none() {
        debug!("Skipping part with unsupported content type ({})", header.location);
        return Ok(None);
    }
    if !header.encoding.is_empty() && header.encoding != "base64" {
        warn!("Skipping image {} with unsupported encoding {}", header.location, header.encoding);
        return Ok(None);
    }
    if header.location.is_empty() {
        warn!("Skipping image part without Content-Location");
        return Ok(None);
    }
    if let Err(e) = validate_file_stem(&header.location) {
        warn!("Skipping image with unsafe Content-Location: {:#}", e);
        return Ok(None);
    }

    let compact: Vec<u8> = content.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = match STANDARD.decode(&compact) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Skipping image {} with invalid base64 body: {}", header.location, e);
            return Ok(None);
        }
    };

    let path = dir.join(&header.location);
    fs::write(&path, bytes).with_context(|| format!("Failed to write image: {}", path.display()))?;
    Ok(Some(path))
}

/// `{ab-12}.dat` + `jpg` -> `{AB-12}.jpg`
fn normalized_image_name(location: &str, ext: &str) -> String {
    let stem = match location.rfind('.') {
        Some(dot) => &location[..dot],
        None => location,
    };
    format!("{}.{}", stem.to_uppercase(), ext)
}
