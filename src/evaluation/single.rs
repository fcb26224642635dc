//! 単発モードの結果表示。
use std::fmt;

use serde::Serialize;

use crate::scoring::MetricSet;

/// 変換文 vs 参照文の1組分のスコア。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleReport {
    pub original: String,
    pub transferred: String,
    pub reference: String,
    pub scores: MetricSet,
}

impl fmt::Display for SingleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original:    {}", self.original)?;
        writeln!(f, "Transferred: {}", self.transferred)?;
        writeln!(f, "Reference:   {}", self.reference)?;
        writeln!(f)?;

        let scores = &self.scores;
        writeln!(f, "BLEU:    {:.4}", scores.bleu)?;
        for (label, rouge) in [
            ("ROUGE-1", &scores.rouge.rouge1),
            ("ROUGE-2", &scores.rouge.rouge2),
            ("ROUGE-L", &scores.rouge.rouge_l),
        ] {
            writeln!(
                f,
                "{label}: P={:.4} R={:.4} F={:.4}",
                rouge.precision, rouge.recall, rouge.fmeasure
            )?;
        }
        writeln!(f, "METEOR:  {:.4}", scores.meteor)?;
        writeln!(f, "TER:     {:.4}", scores.ter)?;
        if let Some(bert) = &scores.bert_score {
            writeln!(
                f,
                "BERTScore: P={:.4} R={:.4} F1={:.4}",
                bert.precision, bert.recall, bert.f1
            )?;
        }
        write!(f, "ChrF:    {:.4}", scores.chrf)
    }
}
