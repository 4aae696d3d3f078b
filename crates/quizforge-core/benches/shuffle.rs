use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizforge_core::engine::{EngineConfig, QuizEngine};
use quizforge_core::parser::builtin_bank;
use quizforge_core::shuffle::shuffle_questions;
use quizforge_core::traits::QuestionSource;

fn bench_shuffle(c: &mut Criterion) {
    let bank = builtin_bank().expect("builtin bank parses");
    let questions = bank.questions("c1").expect("c1 has questions").to_vec();

    let mut group = c.benchmark_group("shuffle");

    group.bench_function("ten_questions", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| shuffle_questions(black_box(&questions), &mut rng))
    });

    group.bench_function("engine_start", |b| {
        let mut engine = QuizEngine::seeded(EngineConfig::default(), 7);
        let now = chrono::Utc::now();
        b.iter(|| engine.start(black_box("s1"), black_box("c1"), &bank, now))
    });

    group.finish();
}

criterion_group!(benches, bench_shuffle);
criterion_main!(benches);
