//! Ordering movies by distance to the query.
//!
//! ## Algorithm
//! 1. Compute every candidate's distance with the scorer (in parallel)
//! 2. Sort ascending by distance
//! 3. Break ties by average rating, highest first, then by id
//! 4. Keep the first `top_n`
//!
//! The result is a pure function of its inputs: ranking the same candidates
//! twice gives the same list.

use crate::error::RankingError;
use crate::scorers::RatingDistanceScorer;
use crate::traits::Scorer;
use catalog::{Catalog, Movie};
use rayon::prelude::*;
use tracing::debug;

/// How many results a request returns unless configured otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// A movie together with its distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMovie<'a> {
    pub movie: &'a Movie,
    pub distance: f64,
}

/// Orders candidates by a scorer and truncates to `top_n`.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_n: usize,
}

impl Ranker {
    /// Fails with `InvalidTopN` when `top_n` is zero
    pub fn new(top_n: usize) -> Result<Self, RankingError> {
        if top_n == 0 {
            return Err(RankingError::InvalidTopN);
        }
        Ok(Self { top_n })
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rank `candidates` by `scorer`.
    ///
    /// Empty input gives an empty result. Fewer candidates than `top_n`
    /// gives all of them, sorted.
    pub fn rank<'a>(&self, candidates: &[&'a Movie], scorer: &dyn Scorer) -> Vec<RankedMovie<'a>> {
        let mut ranked: Vec<RankedMovie<'a>> = candidates
            .par_iter()
            .map(|movie| RankedMovie {
                movie: *movie,
                distance: scorer.distance(movie),
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| b.movie.average_rating.total_cmp(&a.movie.average_rating))
                .then_with(|| a.movie.id.cmp(&b.movie.id))
        });
        ranked.truncate(self.top_n);

        debug!(
            "{} ranked {} candidates, kept {}",
            scorer.name(),
            candidates.len(),
            ranked.len()
        );
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Rank the whole catalog by closeness to a predicted rating
pub fn rank(
    catalog: &Catalog,
    predicted_rating: f64,
    top_n: usize,
) -> Result<Vec<&Movie>, RankingError> {
    let ranker = Ranker::new(top_n)?;
    let scorer = RatingDistanceScorer::new(predicted_rating)?;
    let candidates: Vec<&Movie> = catalog.movies().iter().collect();

    Ok(ranker
        .rank(&candidates, &scorer)
        .into_iter()
        .map(|r| r.movie)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u32, rating: f64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            genres: vec!["Drama".to_string()],
            emotions: vec!["Sadness".to_string()],
            average_rating: rating,
        }
    }

    fn ratings(movies: &[&Movie]) -> Vec<f64> {
        movies.iter().map(|m| m.average_rating).collect()
    }

    #[test]
    fn test_rank_by_distance() {
        let catalog = Catalog::from_movies(vec![movie(1, 4.0), movie(2, 3.0), movie(3, 4.5)]);

        let ranked = rank(&catalog, 4.0, 10).unwrap();
        assert_eq!(ratings(&ranked), vec![4.0, 4.5, 3.0]);
    }

    #[test]
    fn test_tie_prefers_higher_rating() {
        let catalog = Catalog::from_movies(vec![movie(1, 3.5), movie(2, 4.0)]);

        let ranked = rank(&catalog, 3.75, 10).unwrap();
        assert_eq!(ratings(&ranked), vec![4.0, 3.5]);

        let catalog = Catalog::from_movies(vec![movie(1, 3.5), movie(2, 4.5)]);
        let ranked = rank(&catalog, 4.0, 10).unwrap();
        assert_eq!(ratings(&ranked), vec![4.5, 3.5]);
    }

    #[test]
    fn test_equal_movies_ordered_by_id() {
        let catalog = Catalog::from_movies(vec![movie(7, 3.0), movie(2, 3.0), movie(5, 3.0)]);
        let ids: Vec<u32> = rank(&catalog, 3.0, 10).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let catalog = Catalog::from_movies((1..=20).map(|i| movie(i, 0.5 + (i as f64) * 0.2)));
        let ranked = rank(&catalog, 2.0, 5).unwrap();
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_top_n_larger_than_catalog() {
        let catalog = Catalog::from_movies(vec![movie(1, 4.0), movie(2, 3.0), movie(3, 4.5)]);
        let ranked = rank(&catalog, 1.0, 50).unwrap();
        assert_eq!(ranked.len(), catalog.len());
        assert_eq!(ratings(&ranked), vec![3.0, 4.0, 4.5]);
    }

    #[test]
    fn test_empty_catalog() {
        let empty = Catalog::new();
        let ranked = rank(&empty, 3.0, 10).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let catalog = Catalog::from_movies(vec![movie(1, 4.0)]);
        assert_eq!(rank(&catalog, 3.0, 0).unwrap_err(), RankingError::InvalidTopN);
        assert!(Ranker::new(0).is_err());
        assert_eq!(Ranker::default().top_n(), DEFAULT_TOP_N);
    }

    #[test]
    fn test_rank_is_repeatable() {
        let catalog = Catalog::from_movies((1..=50).map(|i| movie(i, 0.5 + (i % 10) as f64 * 0.5)));
        let first = rank(&catalog, 3.2, 10).unwrap();
        let second = rank(&catalog, 3.2, 10).unwrap();
        assert_eq!(first, second);
    }
}
