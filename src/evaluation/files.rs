//! 入力JSONファイルの評価と、レコード一覧・サマリーの書き出し。
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{input::parse_records, orchestrator::Evaluator, report::SummaryReport};

/// `input`を評価し、レコード一覧を`output`へ、サマリーを`summary`へ書き出す。
///
/// 評価はCPUバウンドなのでブロッキングスレッドで行う。
/// 非ASCII文字はエスケープせずにそのまま書き出す。
///
/// # Errors
/// 読み書き・パース・評価のいずれかに失敗した場合はエラーを返す。
pub async fn evaluate_files(
    evaluator: Evaluator,
    input: &Path,
    output: &Path,
    summary: &Path,
) -> Result<SummaryReport> {
    let json = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let records = parse_records(&json)
        .with_context(|| format!("failed to parse input file {}", input.display()))?;
    info!(path = %input.display(), records = records.len(), "input loaded");

    let report = tokio::task::spawn_blocking(move || evaluator.evaluate_batch(&records))
        .await
        .context("failed to join evaluation task")?
        .context("batch evaluation failed")?;

    let records_json =
        serde_json::to_string_pretty(&report.records).context("failed to serialize records")?;
    tokio::fs::write(output, records_json)
        .await
        .with_context(|| format!("failed to write records to {}", output.display()))?;

    let summary_json =
        serde_json::to_string_pretty(&report.summary).context("failed to serialize summary")?;
    tokio::fs::write(summary, summary_json)
        .await
        .with_context(|| format!("failed to write summary to {}", summary.display()))?;

    info!(
        output = %output.display(),
        summary = %summary.display(),
        records = report.summary.record_count,
        "evaluation written"
    );
    Ok(report.summary)
}
