//! mht-chat-md - Convert exported chat transcripts into per-day markdown notes
//!
//! An exported transcript is one large HTML table. This library streams it
//! row by row and writes one markdown document per conversation date:
//!
//! - Tokenizing `<tr>` rows out of arbitrarily large documents ([`RowTokenizer`])
//! - Classifying rows into dates, headers, user messages and system notices
//! - Rendering messages as nested callouts grouped under time banners
//! - Linking images to a local image directory ([`ImageTable`])
//! - Splitting `.mht` archives into the HTML and images the converter reads
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! use mht_chat_md::{DirectorySink, ExportOptions, RowTokenizer, build_image_table, render_transcript};
//!
//! let images = build_image_table(Path::new("res"))?;
//! let mut sink = DirectorySink::new(Path::new("notes"), "md");
//! let input = File::open("index-1.html")?;
//! let report = render_transcript(RowTokenizer::from_reader(input), &images, &mut sink, ExportOptions::default())?;
//! println!("Exported {} dates", report.dates.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use indexer::{ImageTable, build_image_table, collect_stats};
pub use models::{ClassifiedRecord, ExportOptions, ExportReport, MessageSegment};
pub use parsers::{ClassifyError, RowTokenizer, classify_row, extract_mht};
pub use render::{DirectorySink, DocumentSink, MemorySink, StreamRenderer, render_transcript};
