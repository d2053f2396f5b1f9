/// Default extension for rendered per-date documents
pub const DEFAULT_EXTENSION: &str = "md";

/// Messages at least this many seconds apart start a new time banner
pub const DEFAULT_GAP_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub extension: String,
    pub gap_secs: i64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { extension: DEFAULT_EXTENSION.to_string(), gap_secs: DEFAULT_GAP_SECS }
    }
}
