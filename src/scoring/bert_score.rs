//! トークン埋め込みの貪欲コサイン照合によるBERTScore。
use anyhow::{Result, ensure};

use super::harmonic_mean;
use crate::capability::embedding::{BertScore, EmbeddingScorer, TokenEncoder};

/// 任意の[`TokenEncoder`]の上でBERTScoreを計算する。
#[derive(Debug, Clone)]
pub struct GreedyEmbeddingScorer<E> {
    encoder: E,
}

impl<E> GreedyEmbeddingScorer<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }
}

impl<E: TokenEncoder> EmbeddingScorer for GreedyEmbeddingScorer<E> {
    fn score(&self, candidate: &[String], reference: &[String]) -> Result<BertScore> {
        if candidate.is_empty() || reference.is_empty() {
            return Ok(BertScore::default());
        }
        let candidate_vectors = self.encoder.encode(candidate)?;
        let reference_vectors = self.encoder.encode(reference)?;
        ensure!(
            candidate_vectors.len() == candidate.len() && reference_vectors.len() == reference.len(),
            "encoder returned {} / {} vectors for {} / {} tokens",
            candidate_vectors.len(),
            reference_vectors.len(),
            candidate.len(),
            reference.len()
        );
        Ok(greedy_match(&candidate_vectors, &reference_vectors))
    }
}

/// 各トークンを相手側で最も近いトークンに対応付け、その類似度を平均する。
#[must_use]
pub fn greedy_match(candidate: &[Vec<f32>], reference: &[Vec<f32>]) -> BertScore {
    if candidate.is_empty() || reference.is_empty() {
        return BertScore::default();
    }
    let precision = mean_best_similarity(candidate, reference);
    let recall = mean_best_similarity(reference, candidate);
    BertScore {
        f1: harmonic_mean(precision, recall),
        precision,
        recall,
    }
}

fn mean_best_similarity(from: &[Vec<f32>], to: &[Vec<f32>]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| {
            to.iter()
                .map(|b| f64::from(cosine_similarity(a, b)))
                .fold(0.0_f64, f64::max)
        })
        .sum();
    (total / from.len() as f64).clamp(0.0, 1.0)
}

/// Compute cosine similarity between two vectors.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
