// 指標の値域・自己一致・単調性の性質テスト。
use rstest::rstest;
use transfer_eval::scoring::{
    MetricSuite, Segment,
    bleu::{BleuScorer, brevity_penalty},
    rouge::compute_rouge,
};

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(ToString::to_string).collect()
}

const PAIRS: [(&str, &str); 8] = [
    ("猫 が 寝 て いる", "猫 が 寝 て いる"),
    ("猫 が 眠っ て いる", "猫 が 寝 て いる"),
    ("the cat sat on the mat", "a cat is sitting on the mat"),
    ("a b c", "a b d"),
    ("b c a", "a b c"),
    ("x", "a b c d e f g"),
    ("the the the the the", "the cat"),
    ("", "a b"),
];

#[test]
fn every_metric_stays_in_range() {
    let suite = MetricSuite::default();
    for (candidate, reference) in PAIRS {
        let cand = tokens(candidate);
        let refr = tokens(reference);
        let set = suite
            .score(Segment::new(candidate, &cand), Segment::new(reference, &refr))
            .expect("score");

        let unit = |name: &str, value: f64| {
            assert!(
                (0.0..=1.0).contains(&value),
                "{name}={value} out of range for {candidate:?} vs {reference:?}"
            );
        };
        unit("BLEU", set.bleu);
        unit("METEOR", set.meteor);
        unit("ChrF", set.chrf);
        for rouge in [set.rouge.rouge1, set.rouge.rouge2, set.rouge.rouge_l] {
            unit("ROUGE precision", rouge.precision);
            unit("ROUGE recall", rouge.recall);
            unit("ROUGE fmeasure", rouge.fmeasure);
        }
        assert!(set.ter >= 0.0, "TER={} for {candidate:?}", set.ter);
    }
}

#[rstest]
#[case("猫 が 寝 て いる")]
#[case("the cat sat on the mat")]
#[case("a b")]
fn identical_pair_scores_perfectly(#[case] text: &str) {
    let seq = tokens(text);
    let segment = Segment::new(text, &seq);
    let set = MetricSuite::default().score(segment, segment).expect("score");

    assert!((set.bleu - 1.0).abs() < 1e-12, "BLEU={}", set.bleu);
    assert!((set.rouge.rouge1.fmeasure - 1.0).abs() < 1e-12);
    assert!((set.rouge.rouge2.fmeasure - 1.0).abs() < 1e-12);
    assert!((set.rouge.rouge_l.fmeasure - 1.0).abs() < 1e-12);
    assert!((set.meteor - 1.0).abs() < 1e-12, "METEOR={}", set.meteor);
    assert!(set.ter.abs() < 1e-12);
    assert!((set.chrf - 1.0).abs() < 1e-12, "ChrF={}", set.chrf);
}

#[test]
fn single_token_self_comparison_has_no_bigrams() {
    let seq = tokens("猫");
    let rouge = compute_rouge(&seq, &seq);
    assert!((rouge.rouge1.fmeasure - 1.0).abs() < 1e-12);
    assert!(rouge.rouge2.fmeasure.abs() < f64::EPSILON);
    assert!((BleuScorer::default().score(&seq, &seq) - 1.0).abs() < 1e-12);
}

#[test]
fn brevity_penalty_decreases_as_candidate_shrinks() {
    let reference_len = 10;
    let mut previous = brevity_penalty(reference_len, reference_len);
    assert!((previous - 1.0).abs() < f64::EPSILON);
    for candidate_len in (1..reference_len).rev() {
        let bp = brevity_penalty(candidate_len, reference_len);
        assert!(bp < previous, "BP({candidate_len}) = {bp} >= {previous}");
        previous = bp;
    }
    assert!(brevity_penalty(0, reference_len).abs() < f64::EPSILON);
}

#[test]
fn substitution_example_matches_hand_computation() {
    let cand = tokens("a b c");
    let refr = tokens("a b d");
    let set = MetricSuite::default()
        .score(Segment::new("a b c", &cand), Segment::new("a b d", &refr))
        .expect("score");

    let two_thirds = 2.0 / 3.0;
    assert!((set.rouge.rouge1.precision - two_thirds).abs() < 1e-12);
    assert!((set.rouge.rouge1.recall - two_thirds).abs() < 1e-12);
    assert!((set.rouge.rouge1.fmeasure - two_thirds).abs() < 1e-12);
    assert!((set.ter - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn shift_is_cheaper_than_plain_edits() {
    let cand = tokens("on the mat the cat sat");
    let refr = tokens("the cat sat on the mat");
    let set = MetricSuite::default()
        .score(Segment::new("", &cand), Segment::new("", &refr))
        .expect("score");
    // 1回のブロック移動で一致する
    assert!((set.ter - 1.0 / 6.0).abs() < 1e-12, "TER={}", set.ter);
}
