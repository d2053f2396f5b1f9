//! Lookup tables and summaries built ahead of, or instead of, rendering
//!
//! # Error Handling Strategy
//!
//! - **Image directory**: Failing to read the directory or one of its entries aborts the
//!   run, since every image link would otherwise be wrong. Individual files with unusable
//!   names are skipped with a warning.
//!
//! - **Statistics**: Share the classifier's failure modes with conversion. Read errors and
//!   unrecognised system senders are fatal; everything else is counted or ignored.

pub mod image_table;
pub mod stats;

pub use image_table::{ImageTable, build_image_table};
pub use stats::collect_stats;
