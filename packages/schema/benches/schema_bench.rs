use criterion::{black_box, criterion_group, criterion_main, Criterion};
use journal_schema::{validate_patch, validate_seed, PostRecord};
use serde_json::{json, Value};

fn journal_content(blocks: usize) -> Value {
    let blocks: Vec<Value> = (0..blocks)
        .map(|i| match i % 4 {
            0 => json!({ "type": "header", "data": { "text": format!("Section {}", i), "level": 2 } }),
            1 => json!({ "type": "paragraph", "data": { "text": "Lorem ipsum <b>dolor</b> sit amet" } }),
            2 => json!({ "type": "list", "data": { "style": "unordered", "items": ["a", "b", "c"] } }),
            _ => json!({ "type": "table", "data": { "withHeadings": true, "content": [["k", "v"], ["1", "2"]] } }),
        })
        .collect();

    json!({ "time": 1714557600000i64, "blocks": blocks, "version": "2.26.5" })
}

fn validate_small_seed(c: &mut Criterion) {
    let record = PostRecord::new("p", "t").with_content(journal_content(8));

    c.bench_function("validate_small_seed", |b| {
        b.iter(|| validate_seed(black_box(&record)))
    });
}

fn validate_large_patch(c: &mut Criterion) {
    let payload = json!({ "title": "Long entry", "content": journal_content(400) });

    c.bench_function("validate_large_patch", |b| {
        b.iter(|| validate_patch(black_box(&payload)))
    });
}

criterion_group!(benches, validate_small_seed, validate_large_patch);
criterion_main!(benches);
