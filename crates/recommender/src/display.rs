//! How a ranked movie is presented to the user.

use catalog::{Movie, MovieId};
use ranking::RankedMovie;
use serde::Serialize;

const FULL_STAR: &str = "★";
const EMPTY_STAR: &str = "☆";
const MAX_STARS: usize = 5;

/// Round a rating to one decimal for display.
///
/// Halves go to the even digit: 3.25 shows as 3.2 and 3.75 as 3.8.
pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round_ties_even() / 10.0
}

/// Five-star rendering of a rating.
///
/// The integer part gives the number of filled stars; the fraction is
/// dropped, so 3.7 shows three stars.
pub fn rating_to_stars(rating: f64) -> String {
    let filled = (rating.trunc().max(0.0) as usize).min(MAX_STARS);
    format!(
        "{}{}",
        FULL_STAR.repeat(filled),
        EMPTY_STAR.repeat(MAX_STARS - filled)
    )
}

/// Tooltip text: "Average Rating: 3.9 | Genres: Comedy|Romance"
pub fn info_line(movie: &Movie) -> String {
    format!(
        "Average Rating: {:.1} | Genres: {}",
        round_rating(movie.average_rating),
        movie.genres_display()
    )
}

/// Web search link for a title
pub fn search_url(title: &str) -> String {
    format!("https://www.google.com/search?q={}", urlencoding::encode(title))
}

/// One entry of a response, ready to print or serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    /// 1-based position in the list
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub emotions: Vec<String>,
    /// Rounded to one decimal
    pub average_rating: f64,
    /// Scorer distance; lower is closer
    pub distance: f64,
    pub info: String,
    pub stars: String,
    pub search_url: String,
}

impl MovieRecommendation {
    pub fn new(rank: usize, ranked: &RankedMovie<'_>) -> Self {
        let movie = ranked.movie;
        let rounded = round_rating(movie.average_rating);
        Self {
            rank,
            movie_id: movie.id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            emotions: movie.emotions.clone(),
            average_rating: rounded,
            distance: ranked.distance,
            info: info_line(movie),
            stars: rating_to_stars(rounded),
            search_url: search_url(&movie.title),
        }
    }
}
