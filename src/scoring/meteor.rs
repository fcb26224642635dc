//! METEOR。

use super::alignment::{Alignment, AlignmentMatcher};

/// 再現率の重み（`Fmean = P·R / (α·P + (1-α)·R)`）。
const ALPHA: f64 = 0.9;
/// 断片化ペナルティの指数。
const BETA: f64 = 3.0;
/// 断片化ペナルティの係数。
const GAMMA: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct MeteorScorer {
    matcher: AlignmentMatcher,
}

impl MeteorScorer {
    #[must_use]
    pub fn new(matcher: AlignmentMatcher) -> Self {
        Self { matcher }
    }

    #[must_use]
    pub fn score(&self, candidate: &[String], reference: &[String]) -> f64 {
        if candidate.is_empty() || reference.is_empty() {
            return 0.0;
        }
        let alignment = self.matcher.align(candidate, reference);
        meteor_from_alignment(&alignment, candidate.len(), reference.len())
    }
}

/// アラインメントからMETEORを計算する。
///
/// 両系列を完全に覆う1チャンクのアラインメントは断片化0として扱う。
#[must_use]
pub fn meteor_from_alignment(
    alignment: &Alignment,
    candidate_len: usize,
    reference_len: usize,
) -> f64 {
    let matches = alignment.matches();
    if matches == 0 || candidate_len == 0 || reference_len == 0 {
        return 0.0;
    }

    let precision = matches as f64 / candidate_len as f64;
    let recall = matches as f64 / reference_len as f64;
    let f_mean = precision * recall / (ALPHA * precision + (1.0 - ALPHA) * recall);

    let chunks = alignment.chunks();
    let fragmentation = if chunks == 1 && matches == candidate_len && matches == reference_len {
        0.0
    } else {
        chunks as f64 / matches as f64
    };
    let penalty = GAMMA * fragmentation.powf(BETA);

    (f_mean * (1.0 - penalty)).clamp(0.0, 1.0)
}
