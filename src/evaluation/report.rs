//! レコード一覧と指標ごとの平均（サマリー）の組み立て。
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{error::EvaluationError, record::EvaluationRecord};
use crate::scoring::Metric;

/// 1指標の条件別平均。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub baseline: f64,
    pub proposed: f64,
}

/// 全レコードの平均。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub record_count: usize,
    #[serde(rename = "BLEU")]
    pub bleu: MetricSummary,
    #[serde(rename = "ROUGE")]
    pub rouge: MetricSummary,
    #[serde(rename = "METEOR")]
    pub meteor: MetricSummary,
    #[serde(rename = "TER")]
    pub ter: MetricSummary,
    #[serde(rename = "BERTScore", default, skip_serializing_if = "Option::is_none")]
    pub bert_score: Option<MetricSummary>,
    #[serde(rename = "ChrF")]
    pub chrf: MetricSummary,
}

impl SummaryReport {
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<MetricSummary> {
        match metric {
            Metric::Bleu => Some(self.bleu),
            Metric::Rouge => Some(self.rouge),
            Metric::Meteor => Some(self.meteor),
            Metric::Ter => Some(self.ter),
            Metric::BertScore => self.bert_score,
            Metric::Chrf => Some(self.chrf),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PairSum {
    baseline: f64,
    proposed: f64,
    count: usize,
}

/// 代表値の累積和。
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    sums: FxHashMap<Metric, PairSum>,
    records: usize,
}

impl SummaryAccumulator {
    pub fn push(&mut self, record: &EvaluationRecord) {
        self.records += 1;
        for metric in Metric::ALL {
            let (Some(baseline), Some(proposed)) = (
                metric.representative(&record.baseline),
                metric.representative(&record.proposed),
            ) else {
                continue;
            };
            let sum = self.sums.entry(metric).or_default();
            sum.baseline += baseline;
            sum.proposed += proposed;
            sum.count += 1;
        }
    }

    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// 全レコードに値がある指標だけ平均を返す。
    fn mean(&self, metric: Metric) -> Option<MetricSummary> {
        let sum = self.sums.get(&metric)?;
        if self.records == 0 || sum.count != self.records {
            return None;
        }
        let count = self.records as f64;
        Some(MetricSummary {
            baseline: sum.baseline / count,
            proposed: sum.proposed / count,
        })
    }

    /// # Errors
    /// レコードが0件の場合は[`EvaluationError::EmptyBatch`]を返す。
    pub fn finalize(&self) -> Result<SummaryReport, EvaluationError> {
        if self.records == 0 {
            return Err(EvaluationError::EmptyBatch);
        }
        Ok(SummaryReport {
            record_count: self.records,
            bleu: self.mean(Metric::Bleu).unwrap_or_default(),
            rouge: self.mean(Metric::Rouge).unwrap_or_default(),
            meteor: self.mean(Metric::Meteor).unwrap_or_default(),
            ter: self.mean(Metric::Ter).unwrap_or_default(),
            bert_score: self.mean(Metric::BertScore),
            chrf: self.mean(Metric::Chrf).unwrap_or_default(),
        })
    }
}

/// 評価結果一式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub records: Vec<EvaluationRecord>,
    pub summary: SummaryReport,
}

impl EvaluationReport {
    /// 入力順のレコード列からサマリーを計算して組み立てる。
    ///
    /// # Errors
    /// レコードが0件の場合は[`EvaluationError::EmptyBatch`]を返す。
    pub fn assemble(records: Vec<EvaluationRecord>) -> Result<Self, EvaluationError> {
        let mut accumulator = SummaryAccumulator::default();
        for record in &records {
            accumulator.push(record);
        }
        let summary = accumulator.finalize()?;
        Ok(Self { records, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        capability::embedding::BertScore,
        scoring::{
            MetricSet,
            rouge::{RougeScore, RougeScores},
        },
    };

    fn metric_set(value: f64, bert: Option<f64>) -> MetricSet {
        let rouge = RougeScore {
            precision: value,
            recall: value,
            fmeasure: value,
        };
        MetricSet {
            bleu: value,
            rouge: RougeScores {
                rouge1: rouge,
                rouge2: RougeScore::default(),
                rouge_l: rouge,
            },
            meteor: value,
            ter: 1.0 - value,
            bert_score: bert.map(|f1| BertScore {
                f1,
                precision: f1,
                recall: f1,
            }),
            chrf: value,
        }
    }

    fn record(baseline: f64, proposed: f64, bert: Option<f64>) -> EvaluationRecord {
        EvaluationRecord {
            original: "o".into(),
            transferred: "t".into(),
            reference: "r".into(),
            baseline: metric_set(baseline, bert),
            proposed: metric_set(proposed, bert),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let error = EvaluationReport::assemble(vec![]).expect_err("empty batch");
        assert!(matches!(error, EvaluationError::EmptyBatch));
    }

    #[test]
    fn means_are_per_condition() {
        let report = EvaluationReport::assemble(vec![
            record(0.25, 0.75, None),
            record(0.75, 1.0, None),
        ])
        .expect("report");
        let summary = report.summary;
        assert_eq!(summary.record_count, 2);
        assert!((summary.bleu.baseline - 0.5).abs() < 1e-12);
        assert!((summary.bleu.proposed - 0.875).abs() < 1e-12);
        assert!((summary.rouge.baseline - 0.5).abs() < 1e-12);
        assert!((summary.ter.proposed - 0.125).abs() < 1e-12);
        assert!(summary.bert_score.is_none());
    }

    #[test]
    fn bert_score_is_summarized_when_every_record_has_it() {
        let report = EvaluationReport::assemble(vec![
            record(0.5, 0.5, Some(0.5)),
            record(0.5, 0.5, Some(1.0)),
        ])
        .expect("report");
        let bert = report.summary.get(Metric::BertScore).expect("bert summary");
        assert!((bert.baseline - 0.75).abs() < 1e-12);
    }

    #[test]
    fn summary_serializes_with_metric_keys() {
        let report = EvaluationReport::assemble(vec![record(0.5, 0.5, None)]).expect("report");
        let value = serde_json::to_value(&report.summary).expect("serialize");
        for key in ["BLEU", "ROUGE", "METEOR", "TER", "ChrF"] {
            assert!(value[key]["baseline"].is_number(), "missing {key}");
            assert!(value[key]["proposed"].is_number(), "missing {key}");
        }
        assert!(value.get("BERTScore").is_none());
    }
}
