//! Filter to keep movies that carry at least one of the query emotions.

use crate::traits::CandidateFilter;
use catalog::Movie;

/// Removes movies that share no emotion with the query.
///
/// With a single emotion this keeps exactly the movies tagged with it; with
/// two, a movie tagged with either one passes.
pub struct EmotionMatchFilter {
    emotions: Vec<String>,
}

impl EmotionMatchFilter {
    pub fn new<S: AsRef<str>>(emotions: &[S]) -> Self {
        Self {
            emotions: emotions.iter().map(|e| e.as_ref().to_string()).collect(),
        }
    }
}

impl CandidateFilter for EmotionMatchFilter {
    fn name(&self) -> &str {
        "EmotionMatchFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a Movie>) -> Vec<&'a Movie> {
        movies
            .into_iter()
            .filter(|movie| self.emotions.iter().any(|e| movie.has_emotion(e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u32, emotions: &[&str]) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            genres: vec!["Drama".to_string()],
            emotions: emotions.iter().map(|e| e.to_string()).collect(),
            average_rating: 3.0,
        }
    }

    #[test]
    fn test_emotion_match_filter() {
        let movies = vec![
            movie(1, &["Fear"]),
            movie(2, &["Joy"]),
            movie(3, &[]),
            movie(4, &["Sadness", "Fear"]),
        ];

        let filter = EmotionMatchFilter::new(&["Fear"]);
        let ids: Vec<u32> = filter.apply(movies.iter().collect()).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let filter = EmotionMatchFilter::new(&["Fear", "Joy"]);
        let ids: Vec<u32> = filter.apply(movies.iter().collect()).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_no_emotions_keeps_nothing() {
        let movies = vec![movie(1, &["Fear"])];
        let filter = EmotionMatchFilter::new::<&str>(&[]);
        assert!(filter.apply(movies.iter().collect()).is_empty());
    }
}
