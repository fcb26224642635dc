//! 埋め込みベースの類似度（BERTScore）能力。
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// BERTScoreの結果。各値は`[0, 1]`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BertScore {
    #[serde(rename = "score")]
    pub f1: f64,
    #[serde(rename = "P")]
    pub precision: f64,
    #[serde(rename = "R")]
    pub recall: f64,
}

/// 候補文と参照文のトークン列から埋め込み類似度を計算する。
///
/// モデルの読み込みや推論は実装側の責務で、評価エンジンはこの境界しか知らない。
pub trait EmbeddingScorer: Send + Sync {
    /// # Errors
    /// モデル推論に失敗した場合はエラーを返す。
    fn score(&self, candidate: &[String], reference: &[String]) -> Result<BertScore>;
}

/// トークンごとの埋め込みベクトルを返すエンコーダ。
pub trait TokenEncoder: Send + Sync {
    /// 入力と同じ長さ・同じ順序のベクトル列を返す。
    ///
    /// # Errors
    /// エンコードに失敗した場合はエラーを返す。
    fn encode(&self, tokens: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[cfg(feature = "bert")]
pub use self::bert::SentenceEmbeddingEncoder;

#[cfg(feature = "bert")]
mod bert {
    use std::sync::Mutex;

    use anyhow::{Context, Result, anyhow};
    use rust_bert::pipelines::sentence_embeddings::{
        SentenceEmbeddingsBuilder, SentenceEmbeddingsModel, SentenceEmbeddingsModelType,
    };

    use super::TokenEncoder;

    /// rust-bertの多言語文埋め込みモデルで各トークンを個別にエンコードする。
    /// CPUで動作する。
    pub struct SentenceEmbeddingEncoder {
        model: Mutex<SentenceEmbeddingsModel>,
    }

    impl std::fmt::Debug for SentenceEmbeddingEncoder {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SentenceEmbeddingEncoder")
                .field("model", &"<SentenceEmbeddingsModel>")
                .finish()
        }
    }

    impl SentenceEmbeddingEncoder {
        /// モデルを初期化する。初回はダウンロードに時間がかかる。
        ///
        /// # Errors
        /// モデルの取得・構築に失敗した場合はエラーを返す。
        pub fn new() -> Result<Self> {
            // モデル構築はブロッキングで重いため別スレッドで行う
            let model = std::thread::spawn(|| {
                SentenceEmbeddingsBuilder::remote(
                    SentenceEmbeddingsModelType::DistiluseBaseMultilingualCased,
                )
                .create_model()
            })
            .join()
            .map_err(|_| anyhow!("failed to join model creation thread"))??;

            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl TokenEncoder for SentenceEmbeddingEncoder {
        fn encode(&self, tokens: &[String]) -> Result<Vec<Vec<f32>>> {
            let model = self
                .model
                .lock()
                .map_err(|_| anyhow!("embedding model lock poisoned"))?;
            model.encode(tokens).context("failed to encode tokens")
        }
    }
}
