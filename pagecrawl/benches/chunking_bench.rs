//! Benchmarks for normalization, chunking and extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecrawl::config::CrawlConfig;
use pagecrawl::extract::extract_page;
use pagecrawl::profiles::SiteProfile;
use pagecrawl::testing::fixtures;
use pagecrawl::text::{chunk_text, normalize};

fn sample_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|n| {
            format!(
                "  Paragraph {n}   starts here.\u{200B} It has a few sentences! Some ask questions? \
                 Others   just end.\r\n\r\n\r\n"
            )
        })
        .collect()
}

fn text_benchmark(c: &mut Criterion) {
    let raw = sample_text(200);
    let normalized = normalize(&raw);

    c.bench_function("normalize_200_paragraphs", |b| {
        b.iter(|| normalize(black_box(&raw)))
    });
    c.bench_function("chunk_200_paragraphs_1000", |b| {
        b.iter(|| chunk_text(black_box(&normalized), 1000))
    });
    c.bench_function("chunk_200_paragraphs_80", |b| {
        b.iter(|| chunk_text(black_box(&normalized), 80))
    });
}

fn extraction_benchmark(c: &mut Criterion) {
    let html = fixtures::long_article_page(100);
    let profile = SiteProfile::default();
    let config = CrawlConfig::default();

    c.bench_function("extract_long_article", |b| {
        b.iter(|| extract_page(black_box(&html), "https://bench.test/", &profile, &config))
    });
}

criterion_group!(benches, text_benchmark, extraction_benchmark);
criterion_main!(benches);
