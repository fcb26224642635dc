//! 文単位の類似度指標と、それらを一括で適用する[`MetricSuite`]。
pub mod alignment;
pub mod bert_score;
pub mod bleu;
pub mod chrf;
pub mod edit_distance;
pub mod lcs;
pub mod meteor;
pub mod ngram;
pub mod rouge;
pub mod ter;

use std::{fmt, sync::Arc};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use self::{
    alignment::AlignmentMatcher,
    bleu::BleuScorer,
    chrf::ChrfScorer,
    edit_distance::ShiftLimits,
    meteor::MeteorScorer,
    rouge::{RougeScores, compute_rouge},
    ter::TerScorer,
};
use crate::capability::{
    embedding::{BertScore, EmbeddingScorer},
    synonyms::SynonymLookup,
};

/// 調和平均。両方0なら0。
#[must_use]
pub(crate) fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a + b <= 0.0 {
        0.0
    } else {
        (2.0 * a * b) / (a + b)
    }
}

/// 分母0を0として扱う比。
#[must_use]
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 指標パラメータ。baseline・proposedの両方で同一の値を使う。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringSettings {
    pub bleu_smoothing_epsilon: f64,
    pub chrf_char_order: usize,
    pub chrf_beta: f64,
    pub meteor_stem_enabled: bool,
    pub ter_limits: ShiftLimits,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            bleu_smoothing_epsilon: 0.1,
            chrf_char_order: 6,
            chrf_beta: 2.0,
            meteor_stem_enabled: true,
            ter_limits: ShiftLimits::default(),
        }
    }
}

/// 1組（候補文・参照文）に対する全指標の結果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(rename = "BLEU")]
    pub bleu: f64,
    #[serde(rename = "ROUGE")]
    pub rouge: RougeScores,
    #[serde(rename = "METEOR")]
    pub meteor: f64,
    #[serde(rename = "TER")]
    pub ter: f64,
    #[serde(rename = "BERTScore", default, skip_serializing_if = "Option::is_none")]
    pub bert_score: Option<BertScore>,
    #[serde(rename = "ChrF")]
    pub chrf: f64,
}

/// 集計対象の指標名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Bleu,
    Rouge,
    Meteor,
    Ter,
    BertScore,
    Chrf,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Bleu,
        Metric::Rouge,
        Metric::Meteor,
        Metric::Ter,
        Metric::BertScore,
        Metric::Chrf,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Bleu => "BLEU",
            Metric::Rouge => "ROUGE",
            Metric::Meteor => "METEOR",
            Metric::Ter => "TER",
            Metric::BertScore => "BERTScore",
            Metric::Chrf => "ChrF",
        }
    }

    /// 集計に使う代表値。ROUGEはROUGE-1のF値、BERTScoreはF1。
    #[must_use]
    pub fn representative(self, set: &MetricSet) -> Option<f64> {
        match self {
            Metric::Bleu => Some(set.bleu),
            Metric::Rouge => Some(set.rouge.rouge1.fmeasure),
            Metric::Meteor => Some(set.meteor),
            Metric::Ter => Some(set.ter),
            Metric::BertScore => set.bert_score.map(|score| score.f1),
            Metric::Chrf => Some(set.chrf),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 採点対象の1文。chrFは生テキスト、それ以外はトークン列を使う。
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub tokens: &'a [String],
}

impl<'a> Segment<'a> {
    #[must_use]
    pub fn new(text: &'a str, tokens: &'a [String]) -> Self {
        Self { text, tokens }
    }
}

/// 一度だけ構築し、全レコード・両条件で使い回すスコアラー群。
#[derive(Clone)]
pub struct MetricSuite {
    bleu: BleuScorer,
    meteor: MeteorScorer,
    ter: TerScorer,
    chrf: ChrfScorer,
    embedding: Option<Arc<dyn EmbeddingScorer>>,
}

impl fmt::Debug for MetricSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSuite")
            .field("bleu", &self.bleu)
            .field("meteor", &self.meteor)
            .field("ter", &self.ter)
            .field("chrf", &self.chrf)
            .field("embedding", &self.embedding.is_some())
            .finish()
    }
}

impl Default for MetricSuite {
    fn default() -> Self {
        Self::new(ScoringSettings::default(), None, None)
    }
}

impl MetricSuite {
    #[must_use]
    pub fn new(
        settings: ScoringSettings,
        synonyms: Option<Arc<dyn SynonymLookup>>,
        embedding: Option<Arc<dyn EmbeddingScorer>>,
    ) -> Self {
        let matcher = AlignmentMatcher::new(settings.meteor_stem_enabled, synonyms);
        Self {
            bleu: BleuScorer::new(settings.bleu_smoothing_epsilon),
            meteor: MeteorScorer::new(matcher),
            ter: TerScorer::new(settings.ter_limits),
            chrf: ChrfScorer::new(settings.chrf_char_order, settings.chrf_beta),
            embedding,
        }
    }

    /// BERTScoreを計算するかどうか。
    #[must_use]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// 全指標で候補文を参照文と比較する。
    ///
    /// # Errors
    /// 埋め込みスコアラーが失敗した場合のみエラーを返す。
    pub fn score(&self, candidate: Segment<'_>, reference: Segment<'_>) -> Result<MetricSet> {
        let bert_score = match &self.embedding {
            Some(scorer) => Some(scorer.score(candidate.tokens, reference.tokens)?),
            None => None,
        };

        Ok(MetricSet {
            bleu: self.bleu.score(candidate.tokens, reference.tokens),
            rouge: compute_rouge(candidate.tokens, reference.tokens),
            meteor: self.meteor.score(candidate.tokens, reference.tokens),
            ter: self.ter.score(candidate.tokens, reference.tokens),
            bert_score,
            chrf: self.chrf.score(candidate.text, reference.text),
        })
    }
}
