/// End-to-end conversion tests through the library API
///
/// These tests write a transcript and image directory to disk, convert them
/// with a `DirectorySink` and check the produced documents byte for byte.
mod common;

use std::fs::File;

use common::{TranscriptBuilder, Workspace};
use mht_chat_md::{
    DirectorySink, ExportOptions, RowTokenizer, build_image_table, collect_stats,
    render_transcript,
};

fn convert(workspace: &Workspace, transcript: &TranscriptBuilder) -> mht_chat_md::ExportReport {
    let html = workspace.with_transcript(transcript);
    std::fs::create_dir_all(workspace.output_dir()).unwrap();

    let images = build_image_table(&workspace.image_dir()).unwrap();
    let mut sink = DirectorySink::new(&workspace.output_dir(), "md");
    let input = File::open(html).unwrap();
    render_transcript(RowTokenizer::from_reader(input), &images, &mut sink, ExportOptions::default())
        .unwrap()
}

#[test]
fn test_e2e_two_dates_with_images_and_notices() {
    let workspace = Workspace::new();
    workspace.with_image("{ABC-1}.png");

    let transcript = TranscriptBuilder::new()
        .date("2024-01-01")
        .text("Alice(10001)", "08:30:00", &["早上好"])
        .message(
            "Bob&lt;bob@example.com&gt;",
            "08:31:00",
            r#"<font>看图</font><img src="{abc-1}.jpg"><img src="missing.png">"#,
        )
        .system("08:40:00", "Alice撤回了一条消息")
        .date("2024-01-02")
        .text("Alice(10001)", "21:00:00", &["- milk", "- eggs"]);

    let report = convert(&workspace, &transcript);

    assert_eq!(workspace.output_files(), vec!["2024-01-01.md", "2024-01-02.md"]);
    assert_eq!(
        workspace.document("2024-01-01"),
        "> [!abstract] 上午 08:30\n\
> \n\
>> [!note] Alice (10001)\n\
>> 早上好\n\
> \n\
>> [!note] Bob (bob@example.com)\n\
>> 看图![[{ABC-1}.png]][[MISSING|图片已失效]]\n\
\n\
> [!abstract] 上午 08:40\n\
> \n\
> <center><font color=\"gray\">Alice撤回了一条消息</font></center>\n"
    );
    assert_eq!(
        workspace.document("2024-01-02"),
        "> [!abstract] 晚上 09:00\n> \n>> [!note] Alice (10001)\n>> - milk\n>> - eggs\n"
    );

    assert_eq!(report.dates.len(), 2);
    assert_eq!(report.dates[0].user_messages, 2);
    assert_eq!(report.dates[0].system_notices, 1);
    assert_eq!(report.dates[0].time_banners, 2);
    assert_eq!(report.discarded_records, 0);
}

#[test]
fn test_e2e_indented_message_becomes_code_block() {
    let workspace = Workspace::new();
    let transcript = TranscriptBuilder::new().date("2024-03-01").text(
        "Carol",
        "14:00:00",
        &["fn main() {", "&nbsp;&nbsp;&nbsp;&nbsp;println!(\"[hi]\");", "}"],
    );

    convert(&workspace, &transcript);

    assert_eq!(
        workspace.document("2024-03-01"),
        "> [!abstract] 下午 02:00\n\
> \n\
>> [!note] Carol\n\
>> \n\
>>     fn main() {\n\
>>         println!(\"[hi]\");\n\
>>     }\n"
    );
}

#[test]
fn test_e2e_markdown_syntax_is_escaped() {
    let workspace = Workspace::new();
    let transcript =
        TranscriptBuilder::new().date("2024-03-02").text("Dan", "03:15:00", &["# not a *heading* [x]"]);

    convert(&workspace, &transcript);

    assert!(workspace.document("2024-03-02").ends_with(">> \\# not a \\*heading\\* \\[x\\]\n"));
    assert!(workspace.document("2024-03-02").starts_with("> [!abstract] 凌晨 03:15\n"));
}

#[test]
fn test_e2e_stats_match_conversion() {
    let workspace = Workspace::new();
    let transcript = TranscriptBuilder::new()
        .date("2024-01-01")
        .text("Alice(1)", "08:00:00", &["a"])
        .text("Bob(2)", "08:00:05", &["b"])
        .date("2024-01-05")
        .text("Alice(1)", "09:00:00", &["c"])
        .system("09:00:01", "notice");
    let html = workspace.with_transcript(&transcript);

    let stats = collect_stats(RowTokenizer::from_reader(File::open(html).unwrap())).unwrap();

    assert_eq!(stats.dates, 2);
    assert_eq!(stats.user_messages, 3);
    assert_eq!(stats.system_notices, 1);
    assert_eq!(stats.senders, vec!["Alice (1)", "Bob (2)"]);
    assert_eq!(stats.first_date.as_deref(), Some("2024-01-01"));
    assert_eq!(stats.last_date.as_deref(), Some("2024-01-05"));
}

#[test]
fn test_e2e_header_rows_produce_no_output() {
    let workspace = Workspace::new();
    let report = convert(&workspace, &TranscriptBuilder::new());

    assert!(report.dates.is_empty());
    assert!(workspace.output_files().is_empty());
}
