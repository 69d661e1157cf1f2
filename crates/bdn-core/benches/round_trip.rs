use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bdn_core::{canonical_digest, format_document, parse_document};

const DOCUMENT: &str = include_str!("../../../tests/fixtures/conformance/valid/collections.bdn");

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_document", |b| {
        b.iter(|| parse_document(black_box(DOCUMENT.as_bytes())))
    });
}

fn bench_round_trip(c: &mut Criterion) {
    c.bench_function("parse_and_format", |b| {
        b.iter(|| {
            let component = parse_document(black_box(DOCUMENT.as_bytes())).unwrap();
            format_document(&component)
        })
    });
}

fn bench_digest(c: &mut Criterion) {
    let component = parse_document(DOCUMENT.as_bytes()).unwrap();
    c.bench_function("canonical_digest", |b| {
        b.iter(|| canonical_digest(black_box(&component)))
    });
}

criterion_group!(benches, bench_parse, bench_round_trip, bench_digest);
criterion_main!(benches);
