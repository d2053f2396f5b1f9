use std::sync::LazyLock;

use regex::Regex;

static EMAIL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*)<([^<>\s]+@[^<>\s]+)>$").expect("BUG: hardcoded email regex is invalid")
});

static NUMBER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*)\((\d+)\)$").expect("BUG: hardcoded account regex is invalid")
});

/// Display form of a raw sender label
///
/// `Alice<alice@x.com>` and `Bob(12345)` become `Alice (alice@x.com)` and
/// `Bob (12345)`; anything else is returned unchanged.
pub fn format_sender(sender: &str) -> String {
    for pattern in [&*EMAIL_SUFFIX, &*NUMBER_SUFFIX] {
        if let Some(captures) = pattern.captures(sender) {
            return format!("{} ({})", &captures[1], &captures[2]);
        }
    }
    sender.to_string()
}
