use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mht_chat_md::{RowTokenizer, classify_row};

/// Generate a synthetic transcript with N message rows spread over days
fn generate_transcript(num_messages: usize) -> String {
    let mut doc = String::from("<html><body><table>\n");
    for i in 0..num_messages {
        if i % 200 == 0 {
            doc.push_str(&format!("<tr><td><b>日期: 2024-01-{:02}</b></td></tr>\n", (i / 200) % 28 + 1));
        }
        doc.push_str(&format!(
            "<tr><td><div style=color:#42B475;><div style=float:left;>User{}({})</div>{:02}:{:02}:00</div>\
<div><font style=\"font-size:10pt;\">message {} with <i>some</i> text<br>second line</font>\
<img src=\"{{{:08X}}}.jpg\"></div></td></tr>\n",
            i % 7,
            10000 + i % 7,
            (i / 60) % 24,
            i % 60,
            i,
            i
        ));
    }
    doc.push_str("</table></body></html>\n");
    doc
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_rows");

    for size in [100, 1_000, 10_000].iter() {
        let doc = generate_transcript(*size);

        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                RowTokenizer::from_reader(Cursor::new(black_box(doc.as_bytes()))).count()
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let doc = generate_transcript(1_000);
    let rows: Vec<String> = RowTokenizer::from_text(&doc).filter_map(Result::ok).collect();

    let mut group = c.benchmark_group("classify_rows");
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("1000_messages", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(classify_row(black_box(row)).unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_classify);
criterion_main!(benches);
