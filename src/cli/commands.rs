use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};

use crate::indexer::{build_image_table, collect_stats};
use crate::models::{DEFAULT_EXTENSION, DEFAULT_GAP_SECS, ExportOptions, TranscriptStats};
use crate::parsers::{RowTokenizer, extract_mht};
use crate::render::{DirectorySink, StreamRenderer};
use crate::utils::{
    init_logging, open_input, prepare_output_dir, strip_ansi_codes, validate_file_stem,
    validate_image_dir,
};

#[derive(Parser)]
#[command(name = "mht-chat-md")]
#[command(version = "0.1.0")]
#[command(about = "Convert exported chat transcripts into per-day markdown notes", long_about = None)]
pub struct Cli {
    /// Log more (-v for progress, -vv for debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an HTML transcript into one markdown document per date
    Convert {
        /// Exported HTML transcript
        html: PathBuf,
        /// Directory holding the transcript's images
        image_dir: PathBuf,
        /// Directory receiving the documents (created if missing)
        output_dir: PathBuf,
        /// File extension of the documents
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
        /// Seconds of silence before a new time banner is started
        #[arg(long, default_value_t = DEFAULT_GAP_SECS, value_parser = clap::value_parser!(i64).range(1..))]
        gap_secs: i64,
    },
    /// Split an .mht archive into HTML documents and image files
    Extract {
        /// The .mht archive
        mht: PathBuf,
        /// Directory receiving the HTML documents
        #[arg(short = 'H', long = "html-dir", default_value = "html")]
        html_dir: PathBuf,
        /// Directory receiving the images
        #[arg(short = 'A', long = "attachment-dir", default_value = "res")]
        attachment_dir: PathBuf,
    },
    /// Show statistics about an HTML transcript
    Stats {
        /// Exported HTML transcript
        html: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Convert { html, image_dir, output_dir, extension, gap_secs }) => {
            convert(&html, &image_dir, &output_dir, ExportOptions { extension, gap_secs })?;
        }
        Some(Commands::Extract { mht, html_dir, attachment_dir }) => {
            extract(&mht, &html_dir, &attachment_dir)?;
        }
        Some(Commands::Stats { html, json }) => {
            show_stats(&html, json)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn convert(html: &Path, image_dir: &Path, output_dir: &Path, options: ExportOptions) -> Result<()> {
    validate_image_dir(image_dir)?;
    prepare_output_dir(output_dir)?;
    validate_file_stem(&options.extension).context("Invalid output extension")?;

    let input = open_input(html)?;
    let images = build_image_table(image_dir)?;
    info!("Found {} images in {}", images.len(), image_dir.display());

    let mut sink = DirectorySink::new(output_dir, &options.extension);
    let mut renderer = StreamRenderer::new(&images, &mut sink, options)
        .on_date_complete(|summary| println!("{} 已导出", strip_ansi_codes(&summary.date)));
    renderer
        .render_fragments(RowTokenizer::from_reader(input))
        .with_context(|| format!("Failed to convert {}", html.display()))?;
    let report = renderer.finish()?;

    if report.discarded_records > 0 {
        warn!("Discarded {} messages that appeared before the first date", report.discarded_records);
    }
    info!("Wrote {} documents to {}", report.dates.len(), output_dir.display());

    Ok(())
}

fn extract(mht: &Path, html_dir: &Path, attachment_dir: &Path) -> Result<()> {
    prepare_output_dir(html_dir)?;
    prepare_output_dir(attachment_dir)?;

    let report = extract_mht(mht, html_dir, attachment_dir)?;

    println!("Archive Extraction Summary");
    println!("==========================");
    println!("HTML documents: {}", report.html_files.len());
    for path in &report.html_files {
        println!("  {}", path.display());
    }
    println!("Images: {}", report.images.len());
    println!("Skipped parts: {}", report.skipped_parts);

    Ok(())
}

fn show_stats(html: &Path, json: bool) -> Result<()> {
    let input = open_input(html)?;
    let stats = collect_stats(RowTokenizer::from_reader(input))
        .with_context(|| format!("Failed to read transcript {}", html.display()))?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
        println!("{}", rendered);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

fn print_stats(stats: &TranscriptStats) {
    println!("Transcript Statistics");
    println!("=====================");
    println!("Row fragments: {}", stats.fragments);
    println!("Dates: {}", stats.dates);
    println!("  User messages: {}", stats.user_messages);
    println!("  System notices: {}", stats.system_notices);
    println!("  Image references: {}", stats.images);
    println!();

    if let Some(first) = &stats.first_date {
        println!("First date: {}", strip_ansi_codes(first));
    }
    if let Some(last) = &stats.last_date {
        println!("Last date: {}", strip_ansi_codes(last));
    }

    println!("Senders: {}", stats.senders.len());
    for sender in &stats.senders {
        println!("  {}", strip_ansi_codes(sender));
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::try_parse_from(["mht-chat-md", "convert", "a.html", "img", "out"]).unwrap();
        match cli.command {
            Some(Commands::Convert { extension, gap_secs, .. }) => {
                assert_eq!(extension, "md");
                assert_eq!(gap_secs, 300);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_gap_secs_must_be_positive() {
        assert!(
            Cli::try_parse_from(["mht-chat-md", "convert", "a", "b", "c", "--gap-secs", "0"]).is_err()
        );
    }

    #[test]
    fn test_extract_short_flags_and_verbosity() {
        let cli = Cli::try_parse_from(["mht-chat-md", "-vv", "extract", "x.mht", "-H", "h", "-A", "a"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Extract { html_dir, attachment_dir, .. }) => {
                assert_eq!(html_dir, PathBuf::from("h"));
                assert_eq!(attachment_dir, PathBuf::from("a"));
            }
            _ => panic!("expected extract"),
        }
    }
}
