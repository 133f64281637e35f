//! Segmentation benchmarks.
//!
//! Run with: `cargo bench --bench segmenting`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use starchat::api::ChunkDecoder;
use starchat::markup::{format_span, segment};

/// Builds an answer with `sections` headed sections plus the usual cards.
fn long_answer(sections: usize) -> String {
    let mut text = String::from(
        "<div class=\"quick-answer-card\"><strong>Quick Answer:</strong> Yes, **after 2026**.</div>\n",
    );
    for i in 0..sections {
        text.push_str(&format!("## Career Analysis {i}\n"));
        text.push_str("1. Saturn in the *10th house* supports **steady** growth\n");
        text.push_str("2. Jupiter &amp; Venus favour travel &lt;soon&gt;\n");
        text.push_str("Plain paragraph with <b>markup</b> and an entity&nbsp;here.\n\n");
    }
    text.push_str("### Final Thoughts\nStay patient.\n");
    text.push_str(
        "<div class=\"follow-up-questions\"><ul><li>🔮 When will I travel?</li><li>✨ What remedies help?</li></ul></div>",
    );
    text
}

fn stream_for(text: &str) -> String {
    let mut body = String::new();
    for piece in text.as_bytes().chunks(64) {
        let piece = String::from_utf8_lossy(piece);
        body.push_str(&format!(
            "data: {}\n\n",
            serde_json::json!({"status": "chunk", "response": piece})
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for sections in [4, 32, 128] {
        let text = long_answer(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| segment(black_box(text)));
        });
    }
    group.finish();
}

fn bench_format_span(c: &mut Criterion) {
    let text = long_answer(32);
    c.bench_function("format_span_32", |b| b.iter(|| format_span(black_box(&text))));
}

fn bench_decode(c: &mut Criterion) {
    let body = stream_for(&long_answer(32));
    c.bench_function("decode_body_32", |b| {
        b.iter(|| ChunkDecoder::decode_body(black_box(&body), |_| {}));
    });
}

criterion_group!(benches, bench_segment, bench_format_span, bench_decode);
criterion_main!(benches);
