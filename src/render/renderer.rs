use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use log::{debug, info, warn};

use crate::indexer::ImageTable;
use crate::models::{ClassifiedRecord, DateSummary, ExportOptions, ExportReport, MessageSegment};
use crate::parsers::classify_row;
use crate::render::code_block::try_render_code_block;
use crate::render::escape::escape_unless_multiline;
use crate::render::lists::{bullet_kind, collapse_lists, numbered_kind};
use crate::render::piece::Piece;
use crate::render::sender::format_sender;
use crate::render::sink::DocumentSink;
use crate::render::timestamps::{format_banner_time, parse_clock, seconds_between};

/// Callout opening a time banner
pub const BANNER_CALLOUT: &str = "> [!abstract]";
/// Callout opening a sender block
pub const SENDER_CALLOUT: &str = ">> [!note]";
/// Quote prefix of time-bucket level lines
pub const RECORD_PREFIX: &str = "> ";
/// Quote prefix of lines inside a sender block
pub const MESSAGE_PREFIX: &str = ">> ";

struct ActiveDocument<W> {
    summary: DateSummary,
    writer: W,
    last_time: Option<NaiveTime>,
}

/// Drives classified rows into one markdown document per date
///
/// Date rows switch the active document; message rows are rendered into
/// it, grouped under a time banner whenever the gap to the previous
/// message reaches [`ExportOptions::gap_secs`]. Messages before the first
/// date row have nowhere to go and are discarded.
pub struct StreamRenderer<'a, S: DocumentSink> {
    images: &'a ImageTable,
    sink: &'a mut S,
    options: ExportOptions,
    active: Option<ActiveDocument<S::Writer>>,
    report: ExportReport,
    on_complete: Option<Box<dyn FnMut(&DateSummary) + 'a>>,
}

impl<'a, S: DocumentSink> StreamRenderer<'a, S> {
    pub fn new(images: &'a ImageTable, sink: &'a mut S, options: ExportOptions) -> Self {
        Self { images, sink, options, active: None, report: ExportReport::default(), on_complete: None }
    }

    /// Called with each date's summary right after its document is closed
    pub fn on_date_complete(mut self, callback: impl FnMut(&DateSummary) + 'a) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn active_date(&self) -> Option<&str> {
        self.active.as_ref().map(|doc| doc.summary.date.as_str())
    }

    /// Classify and render every fragment in order
    ///
    /// # Errors
    ///
    /// Fails on read errors, write errors, and on rows with an unrecognised
    /// system sender (see [`ClassifyError`](crate::parsers::ClassifyError)).
    pub fn render_fragments<I>(&mut self, fragments: I) -> Result<()>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        for fragment in fragments {
            let fragment = fragment.context("Failed to read transcript")?;
            let record = classify_row(&fragment).with_context(|| match self.active_date() {
                Some(date) => format!("Aborting export while rendering {}", date),
                None => "Aborting export before the first date".to_string(),
            })?;
            self.render_record(record)?;
        }
        Ok(())
    }

    pub fn render_record(&mut self, record: ClassifiedRecord) -> Result<()> {
        match record {
            ClassifiedRecord::DateMarker { date } => self.switch_date(&date),
            ClassifiedRecord::UserMessage { sender, time, segments } => {
                self.render_user(&sender, &time, &segments)
            }
            ClassifiedRecord::SystemNotice { time, segments } => self.render_system(&time, &segments),
            ClassifiedRecord::TitleMarker
            | ClassifiedRecord::GroupMarker { .. }
            | ClassifiedRecord::TargetMarker { .. }
            | ClassifiedRecord::Unknown => Ok(()),
        }
    }

    /// Close the last document and return what was exported
    pub fn finish(mut self) -> Result<ExportReport> {
        self.close_active()?;
        Ok(self.report)
    }

    fn switch_date(&mut self, date: &str) -> Result<()> {
        self.close_active()?;
        let writer = self.sink.open(date)?;
        debug!("Started document for {}", date);
        self.active = Some(ActiveDocument { summary: DateSummary::new(date), writer, last_time: None });
        Ok(())
    }

    fn close_active(&mut self) -> Result<()> {
        let Some(doc) = self.active.take() else {
            return Ok(());
        };

        self.sink.close(&doc.summary.date, doc.writer)?;
        info!(
            "Exported {}: {} messages, {} system notices",
            doc.summary.date, doc.summary.user_messages, doc.summary.system_notices
        );
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&doc.summary);
        }
        self.report.dates.push(doc.summary);
        Ok(())
    }

    fn render_user(&mut self, sender: &str, time: &str, segments: &[MessageSegment]) -> Result<()> {
        let images = self.images;
        let gap_secs = self.options.gap_secs;
        let Some(doc) = self.active.as_mut() else {
            self.report.discarded_records += 1;
            return Ok(());
        };

        let mut out = record_preamble(doc, time, gap_secs);
        out.push_str(&format!("{} {}\n", SENDER_CALLOUT, format_sender(sender)));
        out.push_str(&render_message_body(Piece::from_segments(segments, images), MESSAGE_PREFIX));

        write_document(doc, &out)?;
        doc.summary.user_messages += 1;
        Ok(())
    }

    fn render_system(&mut self, time: &str, segments: &[MessageSegment]) -> Result<()> {
        let images = self.images;
        let gap_secs = self.options.gap_secs;
        let Some(doc) = self.active.as_mut() else {
            self.report.discarded_records += 1;
            return Ok(());
        };

        let pieces = Piece::from_segments(segments, images);
        // Recall notices are one segment; shake and file notices put the text second
        let shown = match pieces.as_slice() {
            [only] => only,
            [_, second] => second,
            _ => {
                warn!(
                    "Skipping system notice at {} on {} with {} segments",
                    time,
                    doc.summary.date,
                    pieces.len()
                );
                return Ok(());
            }
        };
        let text = match shown {
            Piece::Text(text) | Piece::Block(text) => escape_unless_multiline(text),
            Piece::Image(markup) => markup.clone(),
            Piece::Break => String::new(),
        };

        let mut out = record_preamble(doc, time, gap_secs);
        out.push_str(&format!("{}<center><font color=\"gray\">{}</font></center>\n", RECORD_PREFIX, text));

        write_document(doc, &out)?;
        doc.summary.system_notices += 1;
        Ok(())
    }
}

/// Time banner (when due) and the quote separator written before every record
fn record_preamble<W>(doc: &mut ActiveDocument<W>, time: &str, gap_secs: i64) -> String {
    let clock = parse_clock(time);
    if clock.is_none() {
        warn!("Unparsable message time {:?} on {}", time, doc.summary.date);
    }

    let new_bucket = match (doc.last_time, clock) {
        (Some(last), Some(now)) => seconds_between(last, now) >= gap_secs,
        _ => true,
    };

    let mut out = String::new();
    if new_bucket {
        if doc.summary.time_banners > 0 {
            out.push('\n');
        }
        let label = clock.map(format_banner_time).unwrap_or_else(|| time.trim().to_string());
        out.push_str(&format!("{} {}\n", BANNER_CALLOUT, label));
        doc.summary.time_banners += 1;
    }
    out.push_str(RECORD_PREFIX);
    out.push('\n');

    doc.last_time = clock;
    out
}

fn write_document<W: Write>(doc: &mut ActiveDocument<W>, text: &str) -> Result<()> {
    doc.writer
        .write_all(text.as_bytes())
        .with_context(|| format!("Failed to write document for {}", doc.summary.date))
}

/// Body lines of a sender block
///
/// Indented messages become a code block. Otherwise split list items are
/// re-joined and each line break turns into a quoted paragraph break. Text
/// is escaped unless it spans more than one line, so merged lists of three
/// or more items keep their markers as typed.
pub fn render_message_body(pieces: Vec<Piece>, prefix: &str) -> String {
    if let Some(code) = try_render_code_block(&pieces, prefix) {
        return code;
    }

    let pieces = collapse_lists(pieces, bullet_kind, prefix);
    let pieces = collapse_lists(pieces, numbered_kind, prefix);

    let mut out = String::from(prefix);
    for piece in &pieces {
        match piece {
            Piece::Text(text) | Piece::Block(text) => out.push_str(&escape_unless_multiline(text)),
            Piece::Break => {
                out.push('\n');
                out.push_str(prefix);
                out.push('\n');
                out.push_str(prefix);
            }
            Piece::Image(markup) => out.push_str(markup),
        }
    }
    out.push('\n');
    out
}

/// Render a whole fragment stream into `sink`
pub fn render_transcript<I, S>(
    fragments: I,
    images: &ImageTable,
    sink: &mut S,
    options: ExportOptions,
) -> Result<ExportReport>
where
    I: IntoIterator<Item = io::Result<String>>,
    S: DocumentSink,
{
    let mut renderer = StreamRenderer::new(images, sink, options);
    renderer.render_fragments(fragments)?;
    renderer.finish()
}
