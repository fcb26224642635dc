//! 文字n-gram F値（chrF）。

use super::{ngram::NGramTable, ratio};

/// chrFスコアラー。
///
/// 生の文字列から空白を除いた文字列を対象に、次数`1..=char_order`の
/// 適合率・再現率を有効次数（どちらかにn-gramが存在する次数）で平均し、
/// βで重み付けしたF値にまとめる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChrfScorer {
    char_order: usize,
    beta: f64,
}

impl Default for ChrfScorer {
    fn default() -> Self {
        Self {
            char_order: 6,
            beta: 2.0,
        }
    }
}

impl ChrfScorer {
    #[must_use]
    pub fn new(char_order: usize, beta: f64) -> Self {
        Self { char_order, beta }
    }

    #[must_use]
    pub fn score(&self, candidate: &str, reference: &str) -> f64 {
        let cand = strip_whitespace(candidate);
        let refr = strip_whitespace(reference);
        if cand.is_empty() || refr.is_empty() {
            return 0.0;
        }

        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut orders = 0usize;
        for n in 1..=self.char_order {
            let cand_table = NGramTable::count(&cand, n);
            let ref_table = NGramTable::count(&refr, n);
            if cand_table.is_empty() && ref_table.is_empty() {
                continue;
            }
            let matching = cand_table.clipped_count(&ref_table);
            precision_sum += ratio(matching, cand_table.total());
            recall_sum += ratio(matching, ref_table.total());
            orders += 1;
        }
        if orders == 0 {
            return 0.0;
        }

        let precision = precision_sum / orders as f64;
        let recall = recall_sum / orders as f64;
        f_beta(precision, recall, self.beta).clamp(0.0, 1.0)
    }
}

fn strip_whitespace(text: &str) -> Vec<char> {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// `(1+β²)·P·R / (β²·P + R)`。両方0なら0。
#[must_use]
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let beta2 = beta * beta;
    let denominator = beta2 * precision + recall;
    if denominator <= 0.0 {
        return 0.0;
    }
    (1.0 + beta2) * precision * recall / denominator
}
