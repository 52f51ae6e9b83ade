//! Core traits for ranking.
//!
//! A `Scorer` measures how far a movie is from the user's query; the ranker
//! orders by that distance. A `CandidateFilter` narrows the catalog before
//! ranking. Both serving paths (predicted rating, emotion similarity) are
//! just different scorers over the same catalog.

use catalog::Movie;

/// Distance from the current query to a movie. Lower is a better match.
///
/// ## Design Note
/// - `Send + Sync` because distances are computed in parallel
/// - Implementations must be pure so a ranking can be recomputed at will
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    /// Distance for one movie; must be finite and non-negative
    fn distance(&self, movie: &Movie) -> f64;
}

/// Removes movies that shouldn't be ranked for the current query.
pub trait CandidateFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Keep the movies that pass; input order is preserved
    fn apply<'a>(&self, movies: Vec<&'a Movie>) -> Vec<&'a Movie>;
}
