//! Query engine benchmarks.
//!
//! A search evaluates the query once per record against the precomputed
//! lowercase haystack, so cost is linear in corpus size. These groups keep
//! an eye on the constant factor: tokenizing, phrase handling and grouping.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `evaluate` | One query against one haystack, by query shape |
//! | `search` | `MatchState::search` over 1k / 10k / 100k records |
//! | `filter` | `Corpus::apply_filter` with a time range and a query |
//!
//! # Key performance targets (aspirational, not enforced in CI yet)
//!
//! - Grouped search over 100k records: < 50 ms
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench search_bench
//! open target/criterion/report/index.html
//! ```

use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hitline_core::{
    evaluate, Corpus, FilterState, LogRecord, MatchState, Query, RecordFormat, TimeRange,
};

const TAGS: &[&str] = &["addToCart", "verifyPayment", "loadProfile", "applyCoupon", "dbQuery"];
const LEVELS: &[&str] = &["INFO", "INFO", "INFO", "WARN", "ERROR"];

fn corpus(n: usize) -> Corpus {
    let base = Utc.with_ymd_and_hms(2025, 10, 15, 7, 0, 0).unwrap();
    let records = (0..n)
        .map(|i| {
            let instant = base + Duration::milliseconds(i as i64 * 37);
            let ts = instant.format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
            let mut record = LogRecord::new(ts, instant, RecordFormat::FormatA);
            record.line.tag = Some(TAGS[i % TAGS.len()].to_string());
            record.line.level = Some(LEVELS[i % LEVELS.len()].to_string());
            record.line.service = Some("checkout".to_string());
            record.line.data = Some(format!("{{\"user\":\"user-{}\",\"amount\":{}}}", i % 97, i % 500));
            record.raw_message = Some(format!("payment attempt {i} for user-{}", i % 97));
            record
        })
        .collect();
    Corpus::from_records(records)
}

const QUERIES: &[(&str, &str)] = &[
    ("single_term", "verifypayment"),
    ("phrase", "\"payment attempt 42\""),
    ("and", "error AND verifypayment"),
    ("grouped", "(user-1 OR user-2) AND \"payment attempt\" AND error"),
];

// ---------------------------------------------------------------------------
// Single evaluation
// ---------------------------------------------------------------------------

fn evaluate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let haystack = r#"{"timestamp":"2025-10-15t07:33:22.667","format":"format_a","service":"checkout","level":"error","tag":"verifypayment","data":"{\"user\":\"user-2\"}","rawmessage":"payment attempt 42 for user-2"}"#;

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::new("one_shot", name), query, |b, query| {
            b.iter(|| evaluate(black_box(query), black_box(haystack)))
        });
        let parsed = Query::parse(query);
        group.bench_with_input(BenchmarkId::new("pre_parsed", name), &parsed, |b, parsed| {
            b.iter(|| parsed.matches(black_box(haystack)))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Corpus search
// ---------------------------------------------------------------------------

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    for n in [1_000usize, 10_000, 100_000] {
        let corpus = corpus(n);
        group.throughput(Throughput::Elements(n as u64));
        for (name, query) in QUERIES {
            group.bench_with_input(BenchmarkId::new(*name, n), &corpus, |b, corpus| {
                b.iter(|| MatchState::search(black_box(query), corpus, false).len())
            });
        }
    }

    group.finish();
}

fn filter_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let corpus = corpus(100_000);
    let filter = FilterState {
        time_range: TimeRange::parse(Some("2025-10-15T07:10"), Some("2025-10-15T07:40"))
            .expect("valid bounds"),
        search_query: "error OR warn".to_string(),
    };

    group.throughput(Throughput::Elements(100_000));
    group.bench_function("range_and_query_100k", |b| {
        b.iter(|| corpus.apply_filter(black_box(&filter)).len())
    });

    let range_only = FilterState {
        search_query: String::new(),
        ..filter.clone()
    };
    group.bench_function("range_only_100k", |b| {
        b.iter(|| corpus.apply_filter(black_box(&range_only)).len())
    });

    group.finish();
}

criterion_group!(benches, evaluate_bench, search_bench, filter_bench);
criterion_main!(benches);
