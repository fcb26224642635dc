//! バッチ入力（JSON配列）の読み込み。
use serde_json::Value;

use super::{error::EvaluationError, record::InputRecord};

/// JSON文書をレコード列に変換する。
///
/// 要素は1件ずつ検証し、最初の不正レコードの番号を付けてエラーにする。
///
/// # Errors
/// 文書が配列でない場合は[`EvaluationError::InvalidDocument`]、
/// 必須フィールドの欠落・型違いは[`EvaluationError::MalformedInput`]を返す。
pub fn parse_records(json: &str) -> Result<Vec<InputRecord>, EvaluationError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|error| EvaluationError::InvalidDocument(error.to_string()))?;
    let Value::Array(items) = document else {
        return Err(EvaluationError::InvalidDocument(format!(
            "expected an array, found {}",
            value_kind(&document)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<InputRecord>(item).map_err(|error| {
                EvaluationError::MalformedInput {
                    index,
                    reason: error.to_string(),
                }
            })
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
