//! 分かち書き（トークナイズ）能力。
use std::{fmt, str::FromStr, sync::Arc};

use anyhow::{Result, anyhow};
use lindera::{
    DictionaryKind,
    mode::Mode,
    tokenizer::{DictionaryConfig, Tokenizer as LinderaEngine, TokenizerConfig as LinderaConfig},
};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// 生テキストを順序付きトークン列に変換する。
///
/// 評価エンジンは特定の分割方式を前提にしない。失敗はレコード番号付きの
/// エラーとして呼び出し元に伝播される。
pub trait Tokenize: Send + Sync {
    /// # Errors
    /// 実装がテキストを扱えない場合にエラーを返す。
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

fn normalize_text(input: &str) -> String {
    input.nfc().collect::<String>()
}

/// 設定で選べるトークナイザの種類。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenizerKind {
    /// 日本語形態素解析（IPADIC）。
    #[default]
    Lindera,
    /// 分かち書き済みテキストを空白で分割する。
    Whitespace,
    /// UAX#29の単語境界で分割する。
    Unicode,
}

impl FromStr for TokenizerKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "lindera" | "ja" | "japanese" => Ok(Self::Lindera),
            "whitespace" | "wakati" => Ok(Self::Whitespace),
            "unicode" | "words" => Ok(Self::Unicode),
            other => Err(anyhow!("unknown tokenizer: {other}")),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lindera => "lindera",
            Self::Whitespace => "whitespace",
            Self::Unicode => "unicode",
        };
        f.write_str(name)
    }
}

/// 種類に応じたトークナイザを構築する。
///
/// # Errors
/// 形態素解析辞書の読み込みに失敗した場合はエラーを返す。
pub fn build_tokenizer(kind: TokenizerKind) -> Result<Arc<dyn Tokenize>> {
    let tokenizer: Arc<dyn Tokenize> = match kind {
        TokenizerKind::Lindera => Arc::new(LinderaTokenizer::new()?),
        TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer),
        TokenizerKind::Unicode => Arc::new(UnicodeWordTokenizer),
    };
    Ok(tokenizer)
}

/// linderaによる日本語分かち書き。表層形を返す。
pub struct LinderaTokenizer {
    tokenizer: LinderaEngine,
}

impl LinderaTokenizer {
    /// # Errors
    /// 辞書を読み込めない場合はエラーを返す。
    pub fn new() -> Result<Self> {
        // 既定設定は辞書未指定のため、バイナリに同梱されたIPADICを明示する
        let config = LinderaConfig {
            dictionary: DictionaryConfig {
                kind: Some(DictionaryKind::IPADIC),
                path: None,
            },
            user_dictionary: None,
            mode: Mode::Normal,
        };
        let tokenizer = LinderaEngine::from_config(config)
            .map_err(|error| anyhow!("failed to build lindera tokenizer: {error}"))?;
        Ok(Self { tokenizer })
    }
}

impl Tokenize for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let normalized = normalize_text(text);
        let tokens = self
            .tokenizer
            .tokenize(&normalized)
            .map_err(|error| anyhow!("lindera failed to tokenize input: {error}"))?;
        let mut results: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let surface = token.get_text().trim();
            if !surface.is_empty() {
                results.push(surface.to_string());
            }
        }
        Ok(results)
    }
}

impl fmt::Debug for LinderaTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinderaTokenizer").finish()
    }
}

/// 空白区切りの分かち書き済みテキスト用。
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenize for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(normalize_text(text)
            .split_whitespace()
            .map(ToString::to_string)
            .collect())
    }
}

/// UAX#29の単語境界で分割し、記号のみの断片を除いて小文字化する。
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl Tokenize for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(normalize_text(text)
            .split_word_bounds()
            .filter(|piece| piece.chars().any(char::is_alphanumeric))
            .map(str::to_lowercase)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn whitespace_tokenizer_splits_wakati_text() {
        let tokens = WhitespaceTokenizer
            .tokenize("猫 が  寝 て いる\n")
            .expect("tokenize");
        assert_eq!(tokens, vec!["猫", "が", "寝", "て", "いる"]);
    }

    #[test]
    fn unicode_tokenizer_drops_punctuation() {
        let tokens = UnicodeWordTokenizer
            .tokenize("The cat, sleeping!")
            .expect("tokenize");
        assert_eq!(tokens, vec!["the", "cat", "sleeping"]);
    }

    #[test]
    fn whitespace_tokenizer_handles_empty_text() {
        assert!(WhitespaceTokenizer.tokenize("   ").expect("tokenize").is_empty());
    }

    #[rstest]
    #[case("lindera", TokenizerKind::Lindera)]
    #[case("Whitespace", TokenizerKind::Whitespace)]
    #[case(" unicode ", TokenizerKind::Unicode)]
    fn parses_tokenizer_kind(#[case] raw: &str, #[case] expected: TokenizerKind) {
        assert_eq!(raw.parse::<TokenizerKind>().expect("parse"), expected);
        assert_eq!(expected.to_string().parse::<TokenizerKind>().expect("round"), expected);
    }

    #[test]
    fn rejects_unknown_tokenizer_kind() {
        assert!("mecab".parse::<TokenizerKind>().is_err());
    }

    #[test]
    fn lindera_segments_japanese() {
        let tokenizer = LinderaTokenizer::new().expect("lindera");
        let tokens = tokenizer.tokenize("猫が寝ている").expect("tokenize");
        assert_eq!(tokens.concat(), "猫が寝ている");
        assert!(tokens.len() > 1);
        assert_eq!(tokens[0], "猫");
    }

    #[test]
    fn default_tokenizer_kind_builds() {
        let tokenizer = build_tokenizer(TokenizerKind::default()).expect("default tokenizer");
        let tokens = tokenizer.tokenize("今日は晴れです").expect("tokenize");
        assert_eq!(tokens.concat(), "今日は晴れです");
    }
}
