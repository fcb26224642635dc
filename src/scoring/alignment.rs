//! METEOR用の段階的トークンアラインメント。
//!
//! 完全一致 → 語幹一致 → 同義語の順に照合する。各段階では候補文のトークンを
//! 先頭から走査し、未使用の参照トークンのうち最初に一致したものと対応付ける。
//! 一度使われた参照トークンは以降の照合に使われない。

use std::{borrow::Cow, sync::Arc};

use crate::capability::synonyms::SynonymLookup;

/// 照合段階。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Stem,
    Synonym,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    pub candidate: usize,
    pub reference: usize,
    pub tier: MatchTier,
}

/// 候補文インデックス昇順に並んだ対応の集合。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pairs: Vec<AlignedPair>,
}

impl Alignment {
    #[must_use]
    pub fn pairs(&self) -> &[AlignedPair] {
        &self.pairs
    }

    #[must_use]
    pub fn matches(&self) -> usize {
        self.pairs.len()
    }

    /// 両系列で連続している対応の極大連を数える。
    #[must_use]
    pub fn chunks(&self) -> usize {
        let mut chunks = 0usize;
        let mut previous: Option<&AlignedPair> = None;
        for pair in &self.pairs {
            let continues = previous.is_some_and(|prev| {
                pair.candidate == prev.candidate + 1 && pair.reference == prev.reference + 1
            });
            if !continues {
                chunks += 1;
            }
            previous = Some(pair);
        }
        chunks
    }
}

/// トークン列同士の貪欲アラインメントを構築する。
#[derive(Clone, Default)]
pub struct AlignmentMatcher {
    stem_enabled: bool,
    synonyms: Option<Arc<dyn SynonymLookup>>,
}

impl std::fmt::Debug for AlignmentMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentMatcher")
            .field("stem_enabled", &self.stem_enabled)
            .field("synonyms", &self.synonyms.is_some())
            .finish()
    }
}

impl AlignmentMatcher {
    #[must_use]
    pub fn new(stem_enabled: bool, synonyms: Option<Arc<dyn SynonymLookup>>) -> Self {
        Self {
            stem_enabled,
            synonyms,
        }
    }

    /// 完全一致のみで照合する。
    #[must_use]
    pub fn exact_only() -> Self {
        Self::new(false, None)
    }

    #[must_use]
    pub fn align(&self, candidate: &[String], reference: &[String]) -> Alignment {
        let mut candidate_used = vec![false; candidate.len()];
        let mut reference_used = vec![false; reference.len()];
        let mut pairs = Vec::new();

        for tier in self.tiers() {
            for (i, cand_token) in candidate.iter().enumerate() {
                if candidate_used[i] {
                    continue;
                }
                let found = reference.iter().enumerate().position(|(j, ref_token)| {
                    !reference_used[j] && self.is_match(tier, cand_token, ref_token)
                });
                if let Some(j) = found {
                    candidate_used[i] = true;
                    reference_used[j] = true;
                    pairs.push(AlignedPair {
                        candidate: i,
                        reference: j,
                        tier,
                    });
                }
            }
        }

        pairs.sort_by_key(|pair| pair.candidate);
        Alignment { pairs }
    }

    fn tiers(&self) -> Vec<MatchTier> {
        let mut tiers = vec![MatchTier::Exact];
        if self.stem_enabled {
            tiers.push(MatchTier::Stem);
        }
        if self.synonyms.is_some() {
            tiers.push(MatchTier::Synonym);
        }
        tiers
    }

    fn is_match(&self, tier: MatchTier, a: &str, b: &str) -> bool {
        match tier {
            MatchTier::Exact => a == b,
            MatchTier::Stem => stem(a) == stem(b),
            MatchTier::Synonym => self
                .synonyms
                .as_ref()
                .is_some_and(|lookup| lookup.are_synonyms(a, b)),
        }
    }
}

/// 英単語向けの簡易接尾辞除去。ASCII以外のトークンはそのまま語幹とみなす。
#[must_use]
pub fn stem(token: &str) -> Cow<'_, str> {
    if !token.is_ascii() {
        return Cow::Borrowed(token);
    }
    let lower = token.to_ascii_lowercase();
    if lower.len() > 3
        && let Some(base) = lower.strip_suffix("ies")
    {
        return Cow::Owned(format!("{base}y"));
    }
    if lower.len() > 4
        && let Some(base) = lower.strip_suffix("ing")
    {
        return Cow::Owned(undouble(base).to_string());
    }
    if lower.len() > 3
        && let Some(base) = lower.strip_suffix("ed")
    {
        return Cow::Owned(undouble(base).to_string());
    }
    if lower.len() > 3
        && !lower.ends_with("ss")
        && let Some(base) = lower.strip_suffix('s')
    {
        return Cow::Owned(base.to_string());
    }
    Cow::Owned(lower)
}

/// `runn` → `run`のように末尾の重子音を1つ落とす。
fn undouble(base: &str) -> &str {
    let bytes = base.as_bytes();
    match bytes {
        [.., a, b] if a == b && !matches!(*b, b'l' | b's' | b'z') && !b"aeiou".contains(b) => {
            &base[..base.len() - 1]
        }
        _ => base,
    }
}
