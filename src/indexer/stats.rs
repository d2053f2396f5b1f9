use std::collections::BTreeSet;
use std::io;

use anyhow::{Context, Result};

use crate::models::{ClassifiedRecord, MessageSegment, TranscriptStats};
use crate::parsers::classify_row;
use crate::render::format_sender;

/// Tokenize and classify a transcript without rendering it
///
/// Senders are reported in their display form, sorted and de-duplicated.
///
/// # Errors
///
/// Fails on read errors and on unrecognised system sender layouts, exactly
/// like a conversion run would.
pub fn collect_stats<I>(fragments: I) -> Result<TranscriptStats>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut stats = TranscriptStats::default();
    let mut senders = BTreeSet::new();

    for fragment in fragments {
        let fragment = fragment.context("Failed to read transcript")?;
        stats.fragments += 1;

        match classify_row(&fragment)? {
            ClassifiedRecord::DateMarker { date } => {
                stats.dates += 1;
                if stats.first_date.is_none() {
                    stats.first_date = Some(date.clone());
                }
                stats.last_date = Some(date);
            }
            ClassifiedRecord::UserMessage { sender, segments, .. } => {
                stats.user_messages += 1;
                stats.images += count_images(&segments);
                senders.insert(format_sender(&sender));
            }
            ClassifiedRecord::SystemNotice { segments, .. } => {
                stats.system_notices += 1;
                stats.images += count_images(&segments);
            }
            ClassifiedRecord::TitleMarker
            | ClassifiedRecord::GroupMarker { .. }
            | ClassifiedRecord::TargetMarker { .. }
            | ClassifiedRecord::Unknown => {}
        }
    }

    stats.senders = senders.into_iter().collect();
    Ok(stats)
}

fn count_images(segments: &[MessageSegment]) -> usize {
    segments.iter().filter(|s| matches!(s, MessageSegment::Image { .. })).count()
}
