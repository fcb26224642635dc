//! レコードごとの二条件評価とバッチ処理。
use std::{fmt, sync::Arc};

use rayon::prelude::*;
use tracing::{debug, debug_span, info};

use super::{
    error::{Capability, EvaluationError},
    record::{EvaluationRecord, InputRecord},
    report::EvaluationReport,
    single::SingleReport,
};
use crate::{
    capability::tokenizer::Tokenize,
    scoring::{MetricSet, MetricSuite, Segment},
};

/// 分かち書き済みの3文。
struct TokenizedRecord {
    original: Vec<String>,
    transferred: Vec<String>,
    reference: Vec<String>,
}

/// トークナイザと指標群を束ね、レコードを評価する。
///
/// レコード間で共有する可変状態はなく、バッチはrayonで並列に評価する。
#[derive(Clone)]
pub struct Evaluator {
    tokenizer: Arc<dyn Tokenize>,
    suite: MetricSuite,
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("tokenizer", &"<dyn Tokenize>")
            .field("suite", &self.suite)
            .finish()
    }
}

impl Evaluator {
    #[must_use]
    pub fn new(tokenizer: Arc<dyn Tokenize>, suite: MetricSuite) -> Self {
        Self { tokenizer, suite }
    }

    #[must_use]
    pub fn suite(&self) -> &MetricSuite {
        &self.suite
    }

    /// 1レコードを評価する。baselineとproposedは同じ参照文・同じスコアラーで計算する。
    ///
    /// # Errors
    /// トークナイザ・埋め込みスコアラーが失敗した場合、レコード番号付きのエラーを返す。
    pub fn evaluate_record(
        &self,
        index: usize,
        record: &InputRecord,
    ) -> Result<EvaluationRecord, EvaluationError> {
        let span = debug_span!("evaluate_record", index);
        let _guard = span.enter();

        let tokens = self.tokenize_record(index, record)?;
        let reference = Segment::new(&record.reference, &tokens.reference);

        let baseline = self.score(
            index,
            Segment::new(&record.original, &tokens.original),
            reference,
        )?;
        let proposed = self.score(
            index,
            Segment::new(&record.transferred, &tokens.transferred),
            reference,
        )?;

        debug!(
            index,
            baseline_bleu = baseline.bleu,
            proposed_bleu = proposed.bleu,
            "record evaluated"
        );

        Ok(EvaluationRecord {
            original: record.original.clone(),
            transferred: record.transferred.clone(),
            reference: record.reference.clone(),
            baseline,
            proposed,
        })
    }

    /// バッチ全体を評価し、レコード一覧とサマリーを返す。
    ///
    /// レコードは並列に評価するが、結果は入力順に並べ、最も若い番号の
    /// 失敗を返す。サマリーは入力順に逐次加算するため並列度に依存しない。
    ///
    /// # Errors
    /// 0件の場合は[`EvaluationError::EmptyBatch`]、レコードの失敗はそのエラーを返す。
    pub fn evaluate_batch(
        &self,
        records: &[InputRecord],
    ) -> Result<EvaluationReport, EvaluationError> {
        if records.is_empty() {
            return Err(EvaluationError::EmptyBatch);
        }
        info!(records = records.len(), "evaluating batch");

        let results: Vec<Result<EvaluationRecord, EvaluationError>> = records
            .par_iter()
            .enumerate()
            .map(|(index, record)| self.evaluate_record(index, record))
            .collect();
        let evaluated = results
            .into_iter()
            .collect::<Result<Vec<EvaluationRecord>, EvaluationError>>()?;

        let report = EvaluationReport::assemble(evaluated)?;
        info!(
            records = report.summary.record_count,
            baseline_bleu = report.summary.bleu.baseline,
            proposed_bleu = report.summary.bleu.proposed,
            "batch evaluated"
        );
        Ok(report)
    }

    /// 1組だけを評価する（変換文 vs 参照文）。
    ///
    /// # Errors
    /// トークナイザ・埋め込みスコアラーが失敗した場合はエラーを返す。
    pub fn evaluate_single(&self, triplet: &InputRecord) -> Result<SingleReport, EvaluationError> {
        let transferred = self.tokenize(0, "transferred", &triplet.transferred)?;
        let reference = self.tokenize(0, "reference", &triplet.reference)?;
        let scores = self.score(
            0,
            Segment::new(&triplet.transferred, &transferred),
            Segment::new(&triplet.reference, &reference),
        )?;
        Ok(SingleReport {
            original: triplet.original.clone(),
            transferred: triplet.transferred.clone(),
            reference: triplet.reference.clone(),
            scores,
        })
    }

    fn tokenize_record(
        &self,
        index: usize,
        record: &InputRecord,
    ) -> Result<TokenizedRecord, EvaluationError> {
        Ok(TokenizedRecord {
            original: self.tokenize(index, "original", &record.original)?,
            transferred: self.tokenize(index, "transferred", &record.transferred)?,
            reference: self.tokenize(index, "reference", &record.reference)?,
        })
    }

    fn tokenize(
        &self,
        index: usize,
        field: &'static str,
        text: &str,
    ) -> Result<Vec<String>, EvaluationError> {
        let tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|source| EvaluationError::Capability {
                index,
                capability: Capability::Tokenizer,
                source: source.context(format!("failed to tokenize `{field}`")),
            })?;
        if tokens.is_empty() {
            debug!(index, field, "empty token sequence");
        }
        Ok(tokens)
    }

    fn score(
        &self,
        index: usize,
        candidate: Segment<'_>,
        reference: Segment<'_>,
    ) -> Result<MetricSet, EvaluationError> {
        self.suite
            .score(candidate, reference)
            .map_err(|source| EvaluationError::Capability {
                index,
                capability: Capability::Embedding,
                source,
            })
    }
}
