//! 入出力レコード。
use serde::{Deserialize, Serialize};

use crate::scoring::MetricSet;

/// 入力1行。`transfered` / `references`の旧綴りも読み込める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub original: String,
    #[serde(alias = "transfered")]
    pub transferred: String,
    #[serde(alias = "references")]
    pub reference: String,
}

impl InputRecord {
    #[must_use]
    pub fn new(
        original: impl Into<String>,
        transferred: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            original: original.into(),
            transferred: transferred.into(),
            reference: reference.into(),
        }
    }
}

/// 1行分の評価結果。構築後は変更しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub original: String,
    pub transferred: String,
    pub reference: String,
    /// 原文 vs 参照文。
    pub baseline: MetricSet,
    /// 変換文 vs 参照文。
    pub proposed: MetricSet,
}
