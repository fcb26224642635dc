/// バッチ評価・TERシフト探索の性能ベンチマーク。
use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use transfer_eval::{
    capability::tokenizer::WhitespaceTokenizer,
    evaluation::{Evaluator, InputRecord},
    scoring::{MetricSuite, edit_distance::{ShiftLimits, edit_distance_with_shifts}},
};

const VOCABULARY: [&str; 12] = [
    "猫", "が", "寝", "て", "いる", "今日", "は", "晴れ", "です", "犬", "走る", "公園",
];

fn synthetic_sentence(seed: usize, length: usize) -> String {
    (0..length)
        .map(|i| VOCABULARY[(seed * 7 + i * 3 + i / 4) % VOCABULARY.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn synthetic_records(count: usize, length: usize) -> Vec<InputRecord> {
    (0..count)
        .map(|i| {
            InputRecord::new(
                synthetic_sentence(i, length),
                synthetic_sentence(i + 1, length),
                synthetic_sentence(i, length + 2),
            )
        })
        .collect()
}

fn bench_batch_evaluation(c: &mut Criterion) {
    let evaluator = Evaluator::new(Arc::new(WhitespaceTokenizer), MetricSuite::default());
    let records = synthetic_records(1000, 20);

    c.bench_function("evaluate_batch_1k_records", |b| {
        b.iter(|| {
            let report = evaluator
                .evaluate_batch(black_box(&records))
                .expect("batch evaluation");
            black_box(report.summary.record_count);
        });
    });
}

fn bench_ter_shifts(c: &mut Criterion) {
    for length in [40, 120] {
        let candidate: Vec<String> = synthetic_sentence(3, length)
            .split(' ')
            .map(ToString::to_string)
            .collect();
        let mut reference = candidate.clone();
        reference.rotate_left(13);

        c.bench_function(&format!("ter_shift_search_{length}_tokens"), |b| {
            b.iter(|| {
                let count = edit_distance_with_shifts(
                    black_box(&candidate),
                    &reference,
                    ShiftLimits::default(),
                );
                black_box(count.total());
            });
        });
    }
}

criterion_group!(benches, bench_batch_evaluation, bench_ter_shifts);
criterion_main!(benches);
