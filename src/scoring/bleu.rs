//! 文単位BLEU。

use super::ngram::{NGramTable, as_strs};

/// BLEUの最大n-gram次数。
pub const MAX_ORDER: usize = 4;

/// 文単位BLEUスコアラー。
///
/// - 有効次数: `min(4, 候補長, 参照長)`までを使い、有効次数で重みを等分する。
///   短い側の長さを超える次数は平滑化せず計算から外すため、4語未満の文でも
///   自己一致は1.0になる。
/// - フロア平滑化: 2次以上でクリップ済み一致数が0の次数は
///   `epsilon / 総数`を精度とする。
/// - 平滑化の例外: ユニグラムの一致が0件の場合は平滑化せず0を返す。
///   共通語彙のない文に正のスコアを与えないための扱いで、NLTKの
///   `sentence_bleu`と同じ結果になる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleuScorer {
    smoothing_epsilon: f64,
}

impl Default for BleuScorer {
    fn default() -> Self {
        Self {
            smoothing_epsilon: 0.1,
        }
    }
}

impl BleuScorer {
    #[must_use]
    pub fn new(smoothing_epsilon: f64) -> Self {
        Self { smoothing_epsilon }
    }

    #[must_use]
    pub fn score(&self, candidate: &[String], reference: &[String]) -> f64 {
        if candidate.is_empty() || reference.is_empty() {
            return 0.0;
        }
        let cand = as_strs(candidate);
        let refr = as_strs(reference);

        let effective_order = MAX_ORDER.min(cand.len()).min(refr.len());
        let mut log_precision_sum = 0.0;
        for n in 1..=effective_order {
            let cand_table = NGramTable::count(&cand, n);
            let ref_table = NGramTable::count(&refr, n);
            let clipped = cand_table.clipped_count(&ref_table);
            if n == 1 && clipped == 0 {
                return 0.0;
            }

            let total = cand_table.total().max(1) as f64;
            let precision = if clipped == 0 {
                self.smoothing_epsilon / total
            } else {
                clipped as f64 / total
            };
            log_precision_sum += precision.ln();
        }

        let weight = 1.0 / effective_order as f64;
        let bp = brevity_penalty(cand.len(), refr.len());
        (bp * (weight * log_precision_sum).exp()).clamp(0.0, 1.0)
    }
}

/// 候補文が参照文より短い場合の減点係数。
#[must_use]
pub fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
    if candidate_len == 0 {
        return 0.0;
    }
    if candidate_len >= reference_len {
        return 1.0;
    }
    (1.0 - reference_len as f64 / candidate_len as f64).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn identical_sentences_score_one() {
        let seq = tokens(&["猫", "が", "寝", "て", "いる"]);
        let score = BleuScorer::default().score(&seq, &seq);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_identical_sentences_score_one() {
        let seq = tokens(&["はい"]);
        let score = BleuScorer::default().score(&seq, &seq);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_sequences_score_zero() {
        let seq = tokens(&["a", "b"]);
        assert!(BleuScorer::default().score(&[], &seq).abs() < f64::EPSILON);
        assert!(BleuScorer::default().score(&seq, &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn no_unigram_overlap_scores_zero() {
        let cand = tokens(&["x", "y", "z"]);
        let refr = tokens(&["a", "b", "c"]);
        assert!(BleuScorer::default().score(&cand, &refr).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_order_counts_are_floor_smoothed() {
        let cand = tokens(&["a", "b", "c", "d"]);
        let refr = tokens(&["a", "b", "c", "e"]);
        let expected = (0.75_f64 * (2.0 / 3.0) * 0.5 * 0.1).powf(0.25);
        let score = BleuScorer::default().score(&cand, &refr);
        assert!((score - expected).abs() < 1e-12, "score={score}");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn short_candidate_uses_only_orders_it_can_form() {
        // 3語の候補では4-gramを平滑化せず、1〜3次の精度（すべて1）とBPのみで決まる
        let cand = tokens(&["a", "b", "c"]);
        let refr = tokens(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let score = BleuScorer::default().score(&cand, &refr);
        let expected = (1.0_f64 - 8.0 / 3.0).exp();
        assert!((score - expected).abs() < 1e-12, "score={score}");
        assert!((score - 0.188_876).abs() < 1e-6);
    }

    #[test]
    fn brevity_penalty_decreases_monotonically() {
        assert!((brevity_penalty(5, 5) - 1.0).abs() < f64::EPSILON);
        assert!((brevity_penalty(7, 5) - 1.0).abs() < f64::EPSILON);
        assert!(brevity_penalty(0, 5).abs() < f64::EPSILON);
        let mut previous = 1.0;
        for len in (1..5).rev() {
            let bp = brevity_penalty(len, 5);
            assert!(bp < previous, "bp({len})={bp} should be below {previous}");
            previous = bp;
        }
    }

    #[test]
    fn shorter_candidate_is_penalised() {
        let refr = tokens(&["a", "b", "c", "d", "e", "f"]);
        let full = BleuScorer::default().score(&refr, &refr);
        let truncated = BleuScorer::default().score(&refr[..4], &refr);
        assert!(truncated < full);
        assert!((truncated - brevity_penalty(4, 6)).abs() < 1e-12);
    }
}
