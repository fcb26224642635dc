//! ROUGE-1 / ROUGE-2 / ROUGE-L。

use serde::{Deserialize, Serialize};

use super::{
    harmonic_mean,
    lcs::lcs_length,
    ngram::{NGramTable, as_strs},
    ratio,
};

/// 適合率・再現率・F値の組。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl RougeScore {
    fn from_counts(overlap: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision = ratio(overlap, candidate_total);
        let recall = ratio(overlap, reference_total);
        Self {
            precision,
            recall,
            fmeasure: harmonic_mean(precision, recall),
        }
    }
}

/// ROUGE計算結果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    #[serde(rename = "ROUGE-1")]
    pub rouge1: RougeScore,
    #[serde(rename = "ROUGE-2")]
    pub rouge2: RougeScore,
    #[serde(rename = "ROUGE-L")]
    pub rouge_l: RougeScore,
}

/// トークン列同士のROUGEスコアを計算する。
#[must_use]
pub fn compute_rouge(candidate: &[String], reference: &[String]) -> RougeScores {
    RougeScores {
        rouge1: rouge_n(candidate, reference, 1),
        rouge2: rouge_n(candidate, reference, 2),
        rouge_l: rouge_l(candidate, reference),
    }
}

#[must_use]
pub fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> RougeScore {
    let cand = as_strs(candidate);
    let refr = as_strs(reference);
    let cand_table = NGramTable::count(&cand, n);
    let ref_table = NGramTable::count(&refr, n);
    let overlap = ref_table.clipped_count(&cand_table);
    RougeScore::from_counts(overlap, cand_table.total(), ref_table.total())
}

#[must_use]
pub fn rouge_l(candidate: &[String], reference: &[String]) -> RougeScore {
    let lcs = lcs_length(candidate, reference);
    RougeScore::from_counts(lcs, candidate.len(), reference.len())
}
