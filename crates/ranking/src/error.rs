use thiserror::Error;

/// Errors raised by the ranker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Asked for zero results
    #[error("top_n must be at least 1")]
    InvalidTopN,

    /// The target rating the scorer was built with isn't a number
    #[error("Target rating must be finite, got {0}")]
    NonFiniteTarget(f64),
}
