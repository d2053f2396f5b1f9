use serde::{Deserialize, Serialize};

/// One atomic piece of a message cell, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageSegment {
    Text(String),
    LineBreak,
    /// Image reference; `source_id` is the `src` stem, upper-cased
    Image { source_id: String },
}

impl MessageSegment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(source_id: impl Into<String>) -> Self {
        Self::Image { source_id: source_id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifiedRecord {
    DateMarker { date: String },
    TitleMarker,
    GroupMarker { label: String },
    TargetMarker { label: String },
    UserMessage { sender: String, time: String, segments: Vec<MessageSegment> },
    SystemNotice { time: String, segments: Vec<MessageSegment> },
    Unknown,
}

impl ClassifiedRecord {
    /// Time of day (`HH:MM:SS`) for message records
    pub fn time(&self) -> Option<&str> {
        match self {
            Self::UserMessage { time, .. } | Self::SystemNotice { time, .. } => Some(time),
            _ => None,
        }
    }

    pub fn segments(&self) -> Option<&[MessageSegment]> {
        match self {
            Self::UserMessage { segments, .. } | Self::SystemNotice { segments, .. } => {
                Some(segments)
            }
            _ => None,
        }
    }
}
