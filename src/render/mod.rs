//! Markdown rendering of classified records
//!
//! # Error Handling Strategy
//!
//! Rendering itself is infallible; only the sink can fail:
//!
//! - **Sink failures**: Creating, writing or flushing a document is propagated with the
//!   date in context. The run stops at the first such error.
//!
//! - **Malformed records**: Unparsable times and system notices of an unexpected shape are
//!   logged with `warn!` and rendered best-effort or skipped, never fatal.
//!
//! - **Missing images**: Unresolved image identifiers render as a placeholder link and are
//!   only logged at debug level.

pub mod code_block;
pub mod escape;
pub mod images;
pub mod lists;
pub mod piece;
pub mod renderer;
pub mod sender;
pub mod sink;
pub mod timestamps;

pub use escape::{escape_markdown, escape_unless_multiline};
pub use images::resolve_image;
pub use renderer::{StreamRenderer, render_message_body, render_transcript};
pub use sender::format_sender;
pub use sink::{DirectorySink, DocumentSink, MemorySink};
pub use timestamps::format_banner_time;
