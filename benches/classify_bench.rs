//! Benchmarks for header classification
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use music_file_finder::content::Classifier;

fn headers() -> Vec<(&'static str, Vec<u8>)> {
    let pad = |sig: &[u8]| {
        let mut data = sig.to_vec();
        data.resize(512, 0);
        data
    };
    vec![
        ("mp3", pad(b"ID3\x04\x00\x00\x00\x00\x00\x21")),
        ("flac", pad(b"fLaC\x00\x00\x00\x22")),
        ("jpeg", pad(&[0xFF, 0xD8, 0xFF, 0xE0])),
        ("text", b"Lorem ipsum dolor sit amet ".repeat(20)),
    ]
}

fn benchmark_classifiers(c: &mut Criterion) {
    let headers = headers();

    for classifier in [Classifier::signature(), Classifier::mime()] {
        for (name, header) in &headers {
            c.bench_function(&format!("{}_{}", classifier.name(), name), |b| {
                b.iter(|| black_box(classifier.classify(black_box(header))))
            });
        }
    }
}

criterion_group!(benches, benchmark_classifiers);
criterion_main!(benches);
