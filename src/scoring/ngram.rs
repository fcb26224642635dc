//! n-gram出現回数テーブル（BLEU・ROUGE-N・chrFで共用）。

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// n-gramキー。chrFの既定次数6まではヒープ確保なしで収まる。
pub type NGram<T> = SmallVec<[T; 6]>;

/// 1系列・1次数分のn-gram出現回数。構築後は不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramTable<T: Eq + Hash> {
    counts: FxHashMap<NGram<T>, usize>,
    total: usize,
}

impl<T> NGramTable<T>
where
    T: Copy + Eq + Hash,
{
    /// 幅`n`の窓を系列上で滑らせて数える（折り返しなし）。
    ///
    /// 系列長が`n`未満、または`n == 0`の場合は空のテーブルを返す。
    #[must_use]
    pub fn count(sequence: &[T], n: usize) -> Self {
        let mut counts: FxHashMap<NGram<T>, usize> = FxHashMap::default();
        if n == 0 || sequence.len() < n {
            return Self { counts, total: 0 };
        }

        let mut total = 0usize;
        for window in sequence.windows(n) {
            *counts.entry(SmallVec::from_slice(window)).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// 出現したn-gramの総数（重複込み）。
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn get(&self, gram: &[T]) -> usize {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// `Σ min(self[g], other[g])`（`g`は`self`に現れるn-gram）。
    #[must_use]
    pub fn clipped_count(&self, other: &Self) -> usize {
        self.counts
            .iter()
            .map(|(gram, &count)| count.min(other.get(gram)))
            .sum()
    }
}

/// トークン列を`&str`のスライスとして借用する。
#[must_use]
pub fn as_strs(tokens: &[String]) -> Vec<&str> {
    tokens.iter().map(String::as_str).collect()
}
