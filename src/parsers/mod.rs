//! Parsers for exported chat archives
//!
//! # Error Handling Strategy
//!
//! The export is treated as trustworthy but possibly truncated:
//!
//! - **Stream truncation**: End of input in the middle of a tag or row silently ends the
//!   row stream. Rows read so far stay valid.
//!
//! - **Soft anomalies**: Rows that match no known layout classify as
//!   [`ClassifiedRecord::Unknown`](crate::models::ClassifiedRecord::Unknown) and are
//!   logged at debug level.
//!
//! - **Unknown system senders**: A `系统消息` sender with an unrecognised shape is a
//!   [`ClassifyError`]. Guessing would silently corrupt a whole day of transcript, so
//!   callers abort instead.
//!
//! - **I/O errors**: Propagated with `anyhow` context naming the file involved.

pub mod classifier;
pub mod mht;
pub mod tokenizer;

pub use classifier::{ClassifyError, classify_row, image_source_id};
pub use mht::{ExtractReport, extract_mht};
pub use tokenizer::{CharSource, RowTokenizer, Utf8Chars};
