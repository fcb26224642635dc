use std::{env, path::PathBuf, process, sync::Arc};

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use transfer_eval::{
    capability::{
        embedding::EmbeddingScorer,
        synonyms::{SynonymLookup, SynonymTable},
        tokenizer::build_tokenizer,
    },
    config::{Config, RunMode},
    evaluation::{Evaluator, files::evaluate_files},
    observability,
    scoring::MetricSuite,
};

/// コマンドライン引数による上書き。未指定の項目は環境変数の値を使う。
#[derive(Debug, Default)]
struct CliOverrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    summary: Option<PathBuf>,
    single: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                thread = thread_name,
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(
                thread = thread_name,
                message, "panic occurred without location information"
            );
        }
    }));

    observability::init_tracing()?;

    let overrides = parse_args()?;
    let config = apply_overrides(
        Config::from_env().context("failed to load configuration")?,
        overrides,
    );

    if let Some(workers) = config.workers() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .build_global()
            .context("failed to configure evaluation worker pool")?;
    }

    let evaluator = build_evaluator(&config)?;
    info!(
        mode = %config.mode(),
        tokenizer = %config.tokenizer(),
        bertscore = evaluator.suite().has_embedding(),
        "evaluator ready"
    );

    match config.mode() {
        RunMode::Batch => {
            let summary = evaluate_files(
                evaluator,
                config.input_path(),
                config.output_path(),
                config.summary_path(),
            )
            .await?;
            info!(records = summary.record_count, "batch evaluation finished");
        }
        RunMode::Single => {
            let triplet = config
                .single_triplet()
                .context("single mode requires all three texts")?;
            let report = tokio::task::spawn_blocking(move || evaluator.evaluate_single(&triplet))
                .await
                .context("failed to join evaluation task")??;
            println!("{report}");
        }
    }

    Ok(())
}

fn parse_args() -> Result<CliOverrides> {
    let mut overrides = CliOverrides::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                let value = args.next().context("--input requires a path argument")?;
                overrides.input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args.next().context("--output requires a path argument")?;
                overrides.output = Some(PathBuf::from(value));
            }
            "--summary" => {
                let value = args.next().context("--summary requires a path argument")?;
                overrides.summary = Some(PathBuf::from(value));
            }
            "--single" => {
                overrides.single = true;
            }
            "--help" => {
                print_usage();
                process::exit(0);
            }
            _ => {
                bail!("unknown argument: {}", arg);
            }
        }
    }

    Ok(overrides)
}

fn apply_overrides(mut config: Config, overrides: CliOverrides) -> Config {
    if let Some(input) = overrides.input {
        config = config.with_input_path(input);
    }
    if let Some(output) = overrides.output {
        config = config.with_output_path(output);
    }
    if let Some(summary) = overrides.summary {
        config = config.with_summary_path(summary);
    }
    if overrides.single {
        config = config.with_mode(RunMode::Single);
    }
    config
}

fn print_usage() {
    eprintln!(
        "Usage: transfer-eval [--input <path>] [--output <path>] [--summary <path>] [--single] [--help]\n\
         Single mode reads TRANSFER_EVAL_ORIGINAL / TRANSFER_EVAL_TRANSFERRED / TRANSFER_EVAL_REFERENCE."
    );
}

fn build_evaluator(config: &Config) -> Result<Evaluator> {
    let tokenizer = build_tokenizer(config.tokenizer())
        .with_context(|| format!("failed to build {} tokenizer", config.tokenizer()))?;

    let synonyms = match config.meteor_synonyms_path() {
        Some(path) => {
            let table = SynonymTable::load(path).context("failed to load METEOR synonym table")?;
            info!(path = %path.display(), groups = table.group_count(), "synonym table loaded");
            Some(Arc::new(table) as Arc<dyn SynonymLookup>)
        }
        None => None,
    };

    let embedding = if config.bertscore_enabled() {
        Some(build_embedding_scorer()?)
    } else {
        None
    };

    let suite = MetricSuite::new(config.scoring_settings(), synonyms, embedding);
    Ok(Evaluator::new(tokenizer, suite))
}

#[cfg(feature = "bert")]
fn build_embedding_scorer() -> Result<Arc<dyn EmbeddingScorer>> {
    use transfer_eval::{
        capability::embedding::SentenceEmbeddingEncoder, scoring::bert_score::GreedyEmbeddingScorer,
    };

    let encoder = SentenceEmbeddingEncoder::new().context("failed to load embedding model")?;
    info!("embedding model loaded");
    Ok(Arc::new(GreedyEmbeddingScorer::new(encoder)))
}

#[cfg(not(feature = "bert"))]
fn build_embedding_scorer() -> Result<Arc<dyn EmbeddingScorer>> {
    bail!("BERTSCORE_ENABLED requires building with the `bert` feature")
}
