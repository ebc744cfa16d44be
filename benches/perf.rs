use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use match_forecast::features::build_features;
use match_forecast::types::HeadToHeadMatch;
use match_forecast::{MatchContext, PredictionOrchestrator};

fn sample_context() -> MatchContext {
    let head_to_head = (0..20)
        .map(|i| HeadToHeadMatch {
            home_team: Some(if i % 2 == 0 { "Liverpool" } else { "Man City" }.to_string()),
            away_team: Some(if i % 2 == 0 { "Man City" } else { "Liverpool" }.to_string()),
            home_score: i % 4,
            away_score: (i + 1) % 3,
        })
        .collect();
    MatchContext::new("Liverpool", "Man City", "Premier League")
        .with_form(vec![1, 0, 1, 1, -1, 1, 0, 1, 1, 1], vec![0, 1, -1, 1, 1, 0, 0, 1, -1, 1])
        .with_head_to_head(head_to_head)
}

fn bench_build_features(c: &mut Criterion) {
    let ctx = sample_context();
    c.bench_function("build_features", |b| {
        b.iter(|| {
            let f = build_features(black_box(&ctx));
            black_box(f.form_diff);
        })
    });
}

fn bench_predict_match(c: &mut Criterion) {
    let orch = PredictionOrchestrator::rule_based();
    let ctx = sample_context();
    c.bench_function("predict_match", |b| {
        b.iter(|| {
            let pred = orch.predict_match(black_box("bench"), black_box(&ctx));
            black_box(pred.combined.confidence);
        })
    });
}

criterion_group!(benches, bench_build_features, bench_predict_match);
criterion_main!(benches);
