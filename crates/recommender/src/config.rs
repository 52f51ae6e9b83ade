use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Which serving path ranks the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Predict a rating from the emotions, rank by closeness to it
    #[default]
    Rating,
    /// Rank by TF-IDF cosine similarity of emotion sets
    Similarity,
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerKind::Rating => f.write_str("rating"),
            ScorerKind::Similarity => f.write_str("similarity"),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rating" => Ok(ScorerKind::Rating),
            "similarity" => Ok(ScorerKind::Similarity),
            other => Err(format!(
                "unknown scorer {:?} (expected \"rating\" or \"similarity\")",
                other
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Recommender settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Number of movies per response
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub scorer: ScorerKind,

    /// Only rank movies that carry at least one selected emotion
    #[serde(default = "default_require_emotion_match")]
    pub require_emotion_match: bool,
}

fn default_top_n() -> usize {
    ranking::DEFAULT_TOP_N
}

fn default_require_emotion_match() -> bool {
    true
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            scorer: ScorerKind::default(),
            require_emotion_match: default_require_emotion_match(),
        }
    }
}

impl RecommenderConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
