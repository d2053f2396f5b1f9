use serde::{Deserialize, Serialize};

/// Counters for one exported date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSummary {
    pub date: String,
    pub user_messages: usize,
    pub system_notices: usize,
    pub time_banners: usize,
}

impl DateSummary {
    pub fn new(date: &str) -> Self {
        Self { date: date.to_string(), ..Self::default() }
    }
}

/// Result of a full conversion run, one entry per completed date in stream order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub dates: Vec<DateSummary>,
    /// Message records seen before the first date row
    pub discarded_records: usize,
}

/// Aggregate counts gathered by `stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptStats {
    pub fragments: usize,
    pub dates: usize,
    pub user_messages: usize,
    pub system_notices: usize,
    pub images: usize,
    pub senders: Vec<String>,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
