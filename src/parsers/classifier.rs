use std::sync::LazyLock;

use log::{debug, warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::models::{ClassifiedRecord, MessageSegment};

/// Label preceding the date text in date rows ("Date:")
pub const DATE_LABEL: &str = "日期:";
/// Text of the title row ("message log")
pub const TITLE_TEXT: &str = "消息记录";
/// Prefix of the group row ("message group:")
pub const GROUP_LABEL: &str = "消息分组:";
/// Prefix of the target row ("message target:")
pub const TARGET_LABEL: &str = "消息对象:";
/// Every system account sender starts with this ("system message")
pub const SYSTEM_SENDER_PREFIX: &str = "系统消息";
/// System account for one-to-one conversations
pub const PERSONAL_SYSTEM_SENDER: &str = "系统消息(10000)";
/// System account for group conversations
pub const GROUP_SYSTEM_SENDER: &str = "系统消息(1000000)";

const NBSP: char = '\u{a0}';

static CELL_DIV_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td > div").expect("BUG: hardcoded CSS selector 'td > div' is invalid")
});

static DIV_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div").expect("BUG: hardcoded CSS selector 'div' is invalid")
});

static FONT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("font").expect("BUG: hardcoded CSS selector 'font' is invalid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// A `系统消息` sender that matches none of the known system layouts
    #[error("unrecognized system message sender {sender:?}; refusing to guess its layout")]
    UnknownSystemSender { sender: String },
}

/// Structural kind of a node inside a message cell
enum CellNode<'a> {
    Text(&'a str),
    Bold(ElementRef<'a>),
    Font(ElementRef<'a>),
    Image(ElementRef<'a>),
    Other,
}

impl<'a> CellNode<'a> {
    fn of(node: ego_tree::NodeRef<'a, Node>) -> Self {
        match node.value() {
            Node::Text(text) => Self::Text(&**text),
            Node::Element(element) => {
                let Some(element_ref) = ElementRef::wrap(node) else {
                    return Self::Other;
                };
                match element.name() {
                    "b" => Self::Bold(element_ref),
                    "font" => Self::Font(element_ref),
                    "img" => Self::Image(element_ref),
                    _ => Self::Other,
                }
            }
            _ => Self::Other,
        }
    }
}

/// Classify one `<tr>` fragment and extract its payload
///
/// Rows are told apart by how many `div`s sit directly inside a `td`:
/// none for date rows, one for the title/group/target header rows and two
/// for messages (sender cell, content cell).
///
/// # Errors
///
/// Returns [`ClassifyError::UnknownSystemSender`] for a `系统消息` sender that
/// is not one of the known system accounts or notice layouts.
pub fn classify_row(fragment: &str) -> Result<ClassifiedRecord, ClassifyError> {
    // A bare <tr> is dropped by an HTML5 parser outside of table context
    let document = Html::parse_fragment(&format!("<table>{}</table>", fragment));
    let cells: Vec<ElementRef> = document.select(&CELL_DIV_SELECTOR).collect();

    match cells.as_slice() {
        [] => Ok(classify_date(&document)),
        [single] => Ok(classify_header(*single)),
        [sender_cell, content_cell] => classify_message(*sender_cell, *content_cell),
        _ => {
            debug!("Row with {} cell divs is not a known layout", cells.len());
            Ok(ClassifiedRecord::Unknown)
        }
    }
}

fn classify_date(document: &Html) -> ClassifiedRecord {
    let text: String = document.root_element().text().collect();
    let Some(after_label) = text.split(DATE_LABEL).nth(1) else {
        debug!("Row without cell divs has no {} label", DATE_LABEL);
        return ClassifiedRecord::Unknown;
    };

    let date = after_label.trim_start();
    if date.is_empty() {
        warn!("Skipping date row with empty date text");
        return ClassifiedRecord::Unknown;
    }

    ClassifiedRecord::DateMarker { date: date.to_string() }
}

fn classify_header(cell: ElementRef) -> ClassifiedRecord {
    let text: String = cell.text().collect();

    if text == TITLE_TEXT {
        ClassifiedRecord::TitleMarker
    } else if let Some(label) = text.strip_prefix(GROUP_LABEL) {
        ClassifiedRecord::GroupMarker { label: label.replace(NBSP, " ") }
    } else if let Some(label) = text.strip_prefix(TARGET_LABEL) {
        ClassifiedRecord::TargetMarker { label: label.replace(NBSP, " ") }
    } else {
        ClassifiedRecord::Unknown
    }
}

fn classify_message(
    sender_cell: ElementRef,
    content_cell: ElementRef,
) -> Result<ClassifiedRecord, ClassifyError> {
    let sender: String = sender_cell
        .select(&DIV_SELECTOR)
        .next()
        .map(|label| label.text().collect())
        .unwrap_or_default();
    let time = message_time(sender_cell);
    let segments = extract_segments(content_cell);

    if is_system_account(&sender) {
        return Ok(ClassifiedRecord::SystemNotice { time, segments: collapse_text(&segments) });
    }
    if is_window_shake_notice(&sender, &segments) || is_file_transfer_notice(&sender, &segments) {
        return Ok(ClassifiedRecord::SystemNotice { time, segments });
    }
    if sender.starts_with(SYSTEM_SENDER_PREFIX) {
        return Err(ClassifyError::UnknownSystemSender { sender });
    }

    Ok(ClassifiedRecord::UserMessage { sender, time, segments })
}

/// The sender cell is laid out as [label wrapper, time text, ...]
fn message_time(sender_cell: ElementRef) -> String {
    let Some(node) = sender_cell.children().nth(1) else {
        return String::new();
    };
    match CellNode::of(node) {
        CellNode::Text(text) => text.to_string(),
        _ => ElementRef::wrap(node).map(|e| e.text().collect()).unwrap_or_default(),
    }
}

fn extract_segments(content_cell: ElementRef) -> Vec<MessageSegment> {
    let mut segments = Vec::new();

    for child in content_cell.children() {
        let node = match CellNode::of(child) {
            CellNode::Bold(bold) => match bold.select(&FONT_SELECTOR).next() {
                Some(font) => CellNode::Font(font),
                None => continue,
            },
            other => other,
        };

        match node {
            CellNode::Font(font) => {
                for content in font.children() {
                    match content.value() {
                        Node::Text(text) => segments.push(MessageSegment::text(&**text)),
                        _ => segments.push(MessageSegment::LineBreak),
                    }
                }
            }
            CellNode::Image(image) => match image.value().attr("src") {
                Some(src) => segments.push(MessageSegment::image(image_source_id(src))),
                None => debug!("Skipping <img> without src"),
            },
            CellNode::Text(_) | CellNode::Bold(_) | CellNode::Other => {}
        }
    }

    segments
}

/// `src` without its file extension, upper-cased
pub fn image_source_id(src: &str) -> String {
    let name_start = src.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let stem = match src[name_start..].rfind('.') {
        // A leading dot names a hidden file rather than an extension
        Some(dot) if dot > 0 => &src[..name_start + dot],
        _ => src,
    };
    stem.to_uppercase()
}

fn is_system_account(sender: &str) -> bool {
    sender == PERSONAL_SYSTEM_SENDER || sender == GROUP_SYSTEM_SENDER
}

/// Window-shake notices carry a lone non-breaking space as sender.
/// Heuristic inferred from sample exports, not confirmed against the format.
fn is_window_shake_notice(sender: &str, segments: &[MessageSegment]) -> bool {
    sender == "\u{a0}" && segments.len() == 2
}

/// File-transfer notices carry an empty sender.
/// Heuristic inferred from sample exports, not confirmed against the format.
fn is_file_transfer_notice(sender: &str, segments: &[MessageSegment]) -> bool {
    sender.is_empty() && segments.len() == 2
}

/// Join all text into a single segment; line breaks join as nothing
fn collapse_text(segments: &[MessageSegment]) -> Vec<MessageSegment> {
    let joined: String = segments
        .iter()
        .filter_map(|segment| match segment {
            MessageSegment::Text(text) => Some(text.as_str()),
            MessageSegment::LineBreak | MessageSegment::Image { .. } => None,
        })
        .collect();
    vec![MessageSegment::Text(joined)]
}
