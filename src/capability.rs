//! 評価エンジンが外部から受け取る能力（トークナイザ・埋め込みスコアラー・同義語辞書）。
pub mod embedding;
pub mod synonyms;
pub mod tokenizer;
