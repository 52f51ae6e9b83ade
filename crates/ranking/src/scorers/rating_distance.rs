//! Distance between a movie's average rating and a predicted rating.

use crate::error::RankingError;
use crate::traits::Scorer;
use catalog::Movie;

/// `|movie.average_rating - target|`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDistanceScorer {
    target: f64,
}

impl RatingDistanceScorer {
    pub fn new(target: f64) -> Result<Self, RankingError> {
        if !target.is_finite() {
            return Err(RankingError::NonFiniteTarget(target));
        }
        Ok(Self { target })
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Scorer for RatingDistanceScorer {
    fn name(&self) -> &str {
        "RatingDistanceScorer"
    }

    fn distance(&self, movie: &Movie) -> f64 {
        (movie.average_rating - self.target).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(rating: f64) -> Movie {
        Movie {
            id: 1,
            title: "Movie".to_string(),
            genres: vec!["Drama".to_string()],
            emotions: vec!["Sadness".to_string()],
            average_rating: rating,
        }
    }

    #[test]
    fn test_distance() {
        let scorer = RatingDistanceScorer::new(4.0).unwrap();
        assert_eq!(scorer.distance(&movie(4.0)), 0.0);
        assert_eq!(scorer.distance(&movie(4.5)), 0.5);
        assert_eq!(scorer.distance(&movie(3.0)), 1.0);
    }

    #[test]
    fn test_non_finite_target() {
        assert!(matches!(
            RatingDistanceScorer::new(f64::NAN),
            Err(RankingError::NonFiniteTarget(t)) if t.is_nan()
        ));
        assert!(RatingDistanceScorer::new(f64::INFINITY).is_err());
    }
}
