// Criterion benchmarks for the Stash text-heuristics hot paths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stash_api::core::{detect_intent, extract_budget, extract_locations, parse_lines, Matchmaker};
use stash_api::models::{Intent, Post};

const CONTENTS: &[&str] = &[
    "Subletting my room in Rathmines for the summer, €600/month",
    "Looking for a quiet study buddy near the city centre",
    "Giving away a desk lamp and kettle, moving out of Dublin 8",
    "Need a bike for commuting, budget €80-€120, Drumcondra area",
    "Selling textbooks for first year CS, €20 each",
];

fn create_post(id: usize, intent: Intent) -> Post {
    Post {
        id: format!("cp-{}", id),
        author: format!("Author {}", id),
        avatar: "AA".to_string(),
        content: CONTENTS[id % CONTENTS.len()].to_string(),
        tags: vec!["accommodation".to_string()],
        intent,
        ai_match: None,
        upvotes: 0,
        comments: vec![],
        created_at: "2026-08-01T10:00:00".to_string(),
    }
}

fn bench_intent_detection(c: &mut Criterion) {
    c.bench_function("detect_intent", |b| {
        b.iter(|| detect_intent(black_box("Subletting my room in Rathmines, €600/month, looking for a tidy flatmate")));
    });
}

fn bench_extraction(c: &mut Criterion) {
    let content = "Looking for a room in Rathmines or Dublin 2, budget €550-€650, 3 months";

    c.bench_function("extract_locations", |b| {
        b.iter(|| extract_locations(black_box(content)));
    });

    c.bench_function("extract_budget", |b| {
        b.iter(|| extract_budget(black_box(content)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matchmaker = Matchmaker::with_default_weights();
    let seeking = create_post(1, Intent::Seeking);

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 50, 100, 500].iter() {
        let candidates: Vec<Post> = (0..*candidate_count)
            .map(|i| create_post(i, Intent::Offering))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("best_match", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matchmaker.best_match(black_box(&seeking), black_box(&candidates)));
            },
        );
    }

    group.finish();
}

fn bench_receipt_parsing(c: &mut Criterion) {
    let lines: Vec<String> = [
        "TESCO EXPRESS",
        "TAX INVOICE",
        "05/06/2026",
        "14:32",
        "Milk 1L  EUR 1.65",
        "Bananas",
        "EUR 0.99",
        "Basmati Rice 1kg",
        "EUR",
        "4.50",
        "Eggs 12pk EUR 3.29",
        "Brown Bread EUR 1.19",
        "SUBTOTAL EUR 11.62",
        "TOTAL EUR 11.62",
        "VISA ****1234",
        "THANK YOU",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    c.bench_function("parse_receipt_lines", |b| {
        b.iter(|| parse_lines(black_box(&lines)));
    });
}

criterion_group!(
    benches,
    bench_intent_detection,
    bench_extraction,
    bench_matching,
    bench_receipt_parsing
);

criterion_main!(benches);
