//! Data models shared by the parsing and rendering stages.
//!
//! - [`ClassifiedRecord`] - typed view of one `<tr>` row of the export
//! - [`MessageSegment`] - text, line break or image piece of a message cell
//! - [`ExportOptions`] - knobs for the renderer (extension, grouping gap)
//! - [`ExportReport`] / [`DateSummary`] - what a conversion run produced
//! - [`TranscriptStats`] - counts reported by the `stats` command

pub mod options;
pub mod record;
pub mod report;

pub use options::{DEFAULT_EXTENSION, DEFAULT_GAP_SECS, ExportOptions};
pub use record::{ClassifiedRecord, MessageSegment};
pub use report::{DateSummary, ExportReport, TranscriptStats};
