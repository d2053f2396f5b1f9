use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::validate_file_stem;

/// Destination for the per-date documents of a conversion run
///
/// Exactly one document is open at a time; it is handed back through
/// [`close`](DocumentSink::close) before the next one is opened.
pub trait DocumentSink {
    type Writer: Write;

    fn open(&mut self, date: &str) -> Result<Self::Writer>;

    fn close(&mut self, date: &str, mut writer: Self::Writer) -> Result<()> {
        writer.flush().with_context(|| format!("Failed to flush document for {}", date))
    }
}

/// Writes `{dir}/{date}.{extension}` files
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    extension: String,
}

impl DirectorySink {
    pub fn new(dir: &Path, extension: &str) -> Self {
        Self { dir: dir.to_path_buf(), extension: extension.to_string() }
    }

    pub fn document_path(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", date, self.extension))
    }
}

impl DocumentSink for DirectorySink {
    type Writer = BufWriter<File>;

    fn open(&mut self, date: &str) -> Result<Self::Writer> {
        validate_file_stem(date)?;
        let path = self.document_path(date);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(BufWriter::new(file))
    }
}

/// Keeps rendered documents in memory, in the order they were closed
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub documents: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, date: &str) -> Option<&str> {
        self.documents.iter().find(|(d, _)| d == date).map(|(_, text)| text.as_str())
    }
}

impl DocumentSink for MemorySink {
    type Writer = Vec<u8>;

    fn open(&mut self, _date: &str) -> Result<Self::Writer> {
        Ok(Vec::new())
    }

    fn close(&mut self, date: &str, writer: Self::Writer) -> Result<()> {
        let text = String::from_utf8(writer).context("Rendered document is not UTF-8")?;
        self.documents.push((date.to_string(), text));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_directory_sink_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path(), "md");

        let mut writer = sink.open("2024-01-01").unwrap();
        writer.write_all(b"> hi\n").unwrap();
        sink.close("2024-01-01", writer).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("2024-01-01.md")).unwrap(), "> hi\n");
    }

    #[test]
    fn test_directory_sink_rejects_path_like_dates() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path(), "md");
        assert!(sink.open("../escape").is_err());
        assert!(sink.open("2024/01/01").is_err());
    }

    #[test]
    fn test_memory_sink_collects_documents() {
        let mut sink = MemorySink::new();
        let mut writer = sink.open("d1").unwrap();
        writer.extend_from_slice("你好".as_bytes());
        sink.close("d1", writer).unwrap();

        assert_eq!(sink.document("d1"), Some("你好"));
        assert_eq!(sink.document("d2"), None);
    }
}
