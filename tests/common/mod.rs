//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Sender of one-to-one system notices
pub const PERSONAL_SYSTEM: &str = "系统消息(10000)";

/// Builder for exported HTML transcripts
pub struct TranscriptBuilder {
    rows: Vec<String>,
}

impl TranscriptBuilder {
    /// Start a transcript with the usual title, group and target header rows
    pub fn new() -> Self {
        Self { rows: Vec::new() }
            .row("<tr><td><div style=padding-left:10px;><b>消息记录</b></div></td></tr>")
            .row("<tr><td><div style=padding-left:10px;>消息分组:我的好友</div></td></tr>")
            .row("<tr><td><div style=padding-left:10px;>消息对象:Alice</div></td></tr>")
    }

    /// Start a transcript without header rows
    pub fn bare() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a raw `<tr>` fragment
    pub fn row(mut self, row: &str) -> Self {
        self.rows.push(row.to_string());
        self
    }

    /// Append a date row
    pub fn date(self, date: &str) -> Self {
        let row = format!(
            "<tr><td style=border-bottom-width:1px;><b>日期: {}</b></td></tr>",
            date
        );
        self.row(&row)
    }

    /// Append a message with raw content-cell markup
    pub fn message(self, sender: &str, time: &str, content: &str) -> Self {
        let row = message_row(sender, time, content);
        self.row(&row)
    }

    /// Append a message whose lines are separated by `<br>`
    pub fn text(self, sender: &str, time: &str, lines: &[&str]) -> Self {
        let content = format!("<font style=\"font-size:10pt;\">{}</font>", lines.join("<br>"));
        self.message(sender, time, &content)
    }

    /// Append a one-to-one system notice
    pub fn system(self, time: &str, text: &str) -> Self {
        self.message(PERSONAL_SYSTEM, time, &format!("<font>{}</font>", text))
    }

    /// Render the whole document
    pub fn build(&self) -> String {
        format!(
            "<html><head><title>QQ Message</title></head><body><table width=100% cellspacing=0>\n{}\n</table></body></html>",
            self.rows.join("\n")
        )
    }
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A two-div message row as the export lays it out
pub fn message_row(sender: &str, time: &str, content: &str) -> String {
    format!(
        "<tr><td><div style=color:#42B475;padding-left:10px;><div style=float:left;margin-right:6px;>{}</div>{}</div><div style=padding-left:20px;>{}</div></td></tr>",
        sender, time, content
    )
}

/// Scratch directory with the input, image and output locations of a run
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("res")).expect("Failed to create image dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn image_dir(&self) -> PathBuf {
        self.path().join("res")
    }

    /// Not created up front; conversion creates it
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Write `index.html` and return its path
    pub fn with_transcript(&self, transcript: &TranscriptBuilder) -> PathBuf {
        self.write_file("index.html", transcript.build().as_bytes())
    }

    pub fn with_image(&self, name: &str) -> PathBuf {
        let path = self.image_dir().join(name);
        fs::write(&path, b"\x89PNG").expect("Failed to write image");
        path
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Contents of `{output}/{date}.md`
    pub fn document(&self, date: &str) -> String {
        fs::read_to_string(self.output_dir().join(format!("{}.md", date)))
            .expect("Failed to read output document")
    }

    /// Sorted file names in the output directory
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.output_dir())
            .expect("Failed to read output dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
