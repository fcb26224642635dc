//! 同義語辞書（METEORの同義語段階で使用）。
use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// 2トークンが同義かどうかを判定する。
pub trait SynonymLookup: Send + Sync {
    fn are_synonyms(&self, a: &str, b: &str) -> bool;
}

/// 同義語集合の一覧から構築した辞書。
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    groups_by_token: FxHashMap<String, Vec<usize>>,
    group_count: usize,
}

#[derive(Debug, Deserialize)]
struct SynonymFile {
    #[serde(default)]
    synsets: Vec<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SynonymTableError {
    #[error("failed to read synonym table at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse synonym table at {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl SynonymTable {
    #[must_use]
    pub fn from_groups<G, S>(groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for group in groups {
            let group_id = table.group_count;
            let mut added = false;
            for token in group {
                let ids = table.groups_by_token.entry(token.into()).or_default();
                if !ids.contains(&group_id) {
                    ids.push(group_id);
                }
                added = true;
            }
            if added {
                table.group_count += 1;
            }
        }
        table
    }

    /// YAMLファイル（`synsets: [[...], ...]`）から読み込む。
    ///
    /// # Errors
    /// 読み込み・パースに失敗した場合は[`SynonymTableError`]を返す。
    pub fn load(path: &Path) -> Result<Self, SynonymTableError> {
        let contents = fs::read_to_string(path).map_err(|source| SynonymTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| SynonymTableError::Deserialize {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let file: SynonymFile = serde_yaml::from_str(contents)?;
        Ok(Self::from_groups(file.synsets))
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

impl SynonymLookup for SynonymTable {
    fn are_synonyms(&self, a: &str, b: &str) -> bool {
        let (Some(groups_a), Some(groups_b)) =
            (self.groups_by_token.get(a), self.groups_by_token.get(b))
        else {
            return false;
        };
        groups_a.iter().any(|group| groups_b.contains(group))
    }
}
