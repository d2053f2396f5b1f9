use chrono::{NaiveTime, Timelike};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Parse a transcript clock value (`HH:MM:SS`)
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M:%S").ok()
}

/// Seconds from `begin` to `end`, wrapping past midnight
///
/// An `end` earlier than `begin` counts forward through midnight, so
/// `23:59:00 -> 00:00:30` is 90 seconds while `10:00 -> 09:59` is nearly a day.
pub fn seconds_between(begin: NaiveTime, end: NaiveTime) -> i64 {
    end.signed_duration_since(begin).num_seconds().rem_euclid(SECONDS_PER_DAY)
}

/// Banner label: period of day followed by a 12-hour clock, e.g. `下午 03:04`
pub fn format_banner_time(time: NaiveTime) -> String {
    let period = match time.hour() {
        0..=5 => "凌晨",
        6..=11 => "上午",
        12..=17 => "下午",
        _ => "晚上",
    };
    format!("{} {}", period, time.format("%I:%M"))
}
