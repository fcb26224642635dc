//! TER（Translation Edit Rate）。

use super::edit_distance::{ShiftLimits, edit_distance_with_shifts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerScorer {
    limits: ShiftLimits,
}

impl TerScorer {
    #[must_use]
    pub fn new(limits: ShiftLimits) -> Self {
        Self { limits }
    }

    /// `編集数 / max(1, 参照長)`。上限はない。
    #[must_use]
    pub fn score(&self, candidate: &[String], reference: &[String]) -> f64 {
        let edits = edit_distance_with_shifts(candidate, reference, self.limits).total();
        edits as f64 / reference.len().max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[rstest]
    #[case(&["a", "b", "c"], &["a", "b", "d"], 1.0 / 3.0)]
    #[case(&["猫", "が", "寝", "て", "いる"], &["猫", "が", "寝", "て", "いる"], 0.0)]
    #[case(&["b", "c", "a"], &["a", "b", "c"], 1.0 / 3.0)]
    #[case(&[], &["a", "b"], 1.0)]
    #[case(&["a", "b"], &[], 2.0)]
    #[case(&[], &[], 0.0)]
    #[case(&["a", "x", "y", "z"], &["a"], 3.0)]
    fn scores_edit_rate(#[case] cand: &[&str], #[case] refr: &[&str], #[case] expected: f64) {
        let score = TerScorer::default().score(&tokens(cand), &tokens(refr));
        assert!((score - expected).abs() < 1e-12, "score={score}");
    }
}
