//! 評価処理のエラー分類。
use std::fmt;

use thiserror::Error;

/// 外部能力の種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Tokenizer,
    Embedding,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokenizer => f.write_str("tokenizer"),
            Self::Embedding => f.write_str("embedding scorer"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    /// 入力がレコードのJSON配列でない。
    #[error("input document is not a JSON array of records: {0}")]
    InvalidDocument(String),
    /// 必須フィールドの欠落など。バッチ全体を拒否する。
    #[error("record {index} is malformed: {reason}")]
    MalformedInput { index: usize, reason: String },
    /// レコード0件ではサマリーを計算できない。
    #[error("cannot summarize an empty batch")]
    EmptyBatch,
    /// トークナイザ・埋め込みスコアラーの失敗。
    #[error("record {index}: {capability} failed: {source}")]
    Capability {
        index: usize,
        capability: Capability,
        #[source]
        source: anyhow::Error,
    },
}

impl EvaluationError {
    /// 失敗したレコードの番号（0始まり）。
    #[must_use]
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::MalformedInput { index, .. } | Self::Capability { index, .. } => Some(*index),
            Self::InvalidDocument(_) | Self::EmptyBatch => None,
        }
    }
}
