use std::{env, fmt, num::NonZeroUsize, path::PathBuf, str::FromStr};

use thiserror::Error;

use crate::{
    capability::tokenizer::TokenizerKind,
    evaluation::InputRecord,
    scoring::{ScoringSettings, edit_distance::ShiftLimits},
};

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// 実行モード。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// 入力ファイルの全レコードを評価する。
    #[default]
    Batch,
    /// 環境変数で与えた1組だけを評価する。
    Single,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "single" => Ok(Self::Single),
            other => Err(anyhow::anyhow!("unknown run mode: {other}")),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch => f.write_str("batch"),
            Self::Single => f.write_str("single"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    mode: RunMode,
    input_path: PathBuf,
    output_path: PathBuf,
    summary_path: PathBuf,
    single_original: Option<String>,
    single_transferred: Option<String>,
    single_reference: Option<String>,
    tokenizer: TokenizerKind,
    workers: Option<NonZeroUsize>,
    bleu_smoothing_epsilon: f64,
    chrf_char_order: usize,
    chrf_beta: f64,
    meteor_stem_enabled: bool,
    meteor_synonyms_path: Option<PathBuf>,
    ter_max_shift_size: usize,
    ter_max_shift_distance: usize,
    bertscore_enabled: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から評価設定を読み込み、検証する。
    ///
    /// 単発モードの3文はここでは必須にせず、[`Config::single_triplet`]で検証する。
    ///
    /// # Errors
    /// 値のパースや範囲検証に失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = parse_from_str("TRANSFER_EVAL_MODE", RunMode::Batch)?;
        let input_path = parse_path("TRANSFER_EVAL_INPUT", "sample_input.json");
        let output_path = parse_path("TRANSFER_EVAL_OUTPUT", "sample_input_evaluated.json");
        let summary_path = parse_path("TRANSFER_EVAL_SUMMARY_OUTPUT", "sample_input_summary.json");

        let single_original = env::var("TRANSFER_EVAL_ORIGINAL").ok();
        let single_transferred = env::var("TRANSFER_EVAL_TRANSFERRED").ok();
        let single_reference = env::var("TRANSFER_EVAL_REFERENCE").ok();

        let tokenizer = parse_from_str("TRANSFER_EVAL_TOKENIZER", TokenizerKind::default())?;
        let workers = parse_optional_non_zero_usize("TRANSFER_EVAL_WORKERS")?;

        // Metric parameters
        let bleu_smoothing_epsilon = parse_f64("BLEU_SMOOTHING_EPSILON", 0.1)?;
        if !(bleu_smoothing_epsilon > 0.0 && bleu_smoothing_epsilon <= 1.0) {
            return Err(ConfigError::Invalid {
                name: "BLEU_SMOOTHING_EPSILON",
                source: anyhow::anyhow!("value must be in (0, 1]"),
            });
        }
        let chrf_char_order = parse_non_zero_usize("CHRF_CHAR_ORDER", 6)?.get();
        let chrf_beta = parse_f64("CHRF_BETA", 2.0)?;
        if !(chrf_beta.is_finite() && chrf_beta > 0.0) {
            return Err(ConfigError::Invalid {
                name: "CHRF_BETA",
                source: anyhow::anyhow!("value must be a positive number"),
            });
        }
        let meteor_stem_enabled = parse_bool("METEOR_STEM_ENABLED", true)?;
        let meteor_synonyms_path = env::var("METEOR_SYNONYMS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let ter_max_shift_size = parse_non_zero_usize("TER_MAX_SHIFT_SIZE", 10)?.get();
        let ter_max_shift_distance = parse_usize("TER_MAX_SHIFT_DISTANCE", 50)?;
        let bertscore_enabled = parse_bool("BERTSCORE_ENABLED", false)?;

        Ok(Self {
            mode,
            input_path,
            output_path,
            summary_path,
            single_original,
            single_transferred,
            single_reference,
            tokenizer,
            workers,
            bleu_smoothing_epsilon,
            chrf_char_order,
            chrf_beta,
            meteor_stem_enabled,
            meteor_synonyms_path,
            ter_max_shift_size,
            ter_max_shift_distance,
            bertscore_enabled,
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = path.into();
        self
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    #[must_use]
    pub fn input_path(&self) -> &PathBuf {
        &self.input_path
    }

    #[must_use]
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    #[must_use]
    pub fn summary_path(&self) -> &PathBuf {
        &self.summary_path
    }

    #[must_use]
    pub fn tokenizer(&self) -> TokenizerKind {
        self.tokenizer
    }

    #[must_use]
    pub fn workers(&self) -> Option<NonZeroUsize> {
        self.workers
    }

    #[must_use]
    pub fn meteor_synonyms_path(&self) -> Option<&PathBuf> {
        self.meteor_synonyms_path.as_ref()
    }

    #[must_use]
    pub fn bertscore_enabled(&self) -> bool {
        self.bertscore_enabled
    }

    /// 指標パラメータ。
    #[must_use]
    pub fn scoring_settings(&self) -> ScoringSettings {
        ScoringSettings {
            bleu_smoothing_epsilon: self.bleu_smoothing_epsilon,
            chrf_char_order: self.chrf_char_order,
            chrf_beta: self.chrf_beta,
            meteor_stem_enabled: self.meteor_stem_enabled,
            ter_limits: ShiftLimits {
                max_shift_size: self.ter_max_shift_size,
                max_shift_distance: self.ter_max_shift_distance,
            },
        }
    }

    /// 単発モードで評価する1組。
    ///
    /// # Errors
    /// 3つの環境変数のいずれかが未設定の場合は [`ConfigError::Missing`] を返す。
    pub fn single_triplet(&self) -> Result<InputRecord, ConfigError> {
        let original = self
            .single_original
            .clone()
            .ok_or(ConfigError::Missing("TRANSFER_EVAL_ORIGINAL"))?;
        let transferred = self
            .single_transferred
            .clone()
            .ok_or(ConfigError::Missing("TRANSFER_EVAL_TRANSFERRED"))?;
        let reference = self
            .single_reference
            .clone()
            .ok_or(ConfigError::Missing("TRANSFER_EVAL_REFERENCE"))?;
        Ok(InputRecord::new(original, transferred, reference))
    }
}

fn parse_path(name: &'static str, default: &str) -> PathBuf {
    PathBuf::from(env::var(name).unwrap_or_else(|_| default.to_string()))
}

fn parse_from_str<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = anyhow::Error>,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|source| ConfigError::Invalid { name, source }),
        Err(_) => Ok(default),
    }
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let parsed = parse_usize(name, default)?;
    NonZeroUsize::new(parsed).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

fn parse_optional_non_zero_usize(name: &'static str) -> Result<Option<NonZeroUsize>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    let parsed = raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    NonZeroUsize::new(parsed)
        .map(Some)
        .ok_or_else(|| ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("must be greater than zero"),
        })
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<f64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("invalid boolean value: {raw}"),
        }),
    }
}
