//! Catalog building from the raw MovieLens tables.
//!
//! This is the batch preprocessing job:
//! 1. Drop rows with missing required fields (and out-of-scale ratings)
//! 2. Drop movies whose genre field is "(no genres listed)"
//! 3. De-duplicate movies by id and ratings by (user, movie), keeping the first
//! 4. Discard user and timestamp
//! 5. Derive each movie's emotions from its genres
//! 6. Average ratings per movie, filling unrated movies with the global mean
//!
//! No step fails on a malformed row: bad rows are dropped and counted in a
//! `NormalizeReport`. The output is a pure function of the input tables.

use crate::emotions::GenreEmotionTable;
use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// What the normalizer dropped and filled, for logging and verification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub movies_read: usize,
    pub movies_missing_fields: usize,
    pub movies_without_genres: usize,
    pub duplicate_movies: usize,
    pub ratings_read: usize,
    pub ratings_invalid: usize,
    pub duplicate_ratings: usize,
    /// Movies that had no surviving rating and got `global_mean`
    pub movies_filled: usize,
    /// Mean of all surviving ratings
    pub global_mean: f64,
}

/// Builds a `Catalog` from raw rows using one genre → emotion table
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    table: GenreEmotionTable,
}

impl Normalizer {
    pub fn new(table: GenreEmotionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GenreEmotionTable {
        &self.table
    }

    /// Run every normalization step and return the catalog with its report
    pub fn normalize(
        &self,
        raw_movies: &[RawMovie],
        raw_ratings: &[RawRating],
    ) -> (Catalog, NormalizeReport) {
        let mut report = NormalizeReport {
            movies_read: raw_movies.len(),
            ratings_read: raw_ratings.len(),
            ..Default::default()
        };

        let movies = self.clean_movies(raw_movies, &mut report);
        let ratings = clean_ratings(raw_ratings, &mut report);

        report.global_mean = global_mean(&ratings);
        let averages = average_ratings(&ratings);

        let mut catalog = Catalog::new();
        for (id, title, genres) in movies {
            let average_rating = match averages.get(&id) {
                Some(avg) => *avg,
                None => {
                    report.movies_filled += 1;
                    report.global_mean
                }
            };
            let emotions = self.table.map_genres(&genres);
            catalog.insert_movie(Movie {
                id,
                title,
                genres,
                emotions,
                average_rating: average_rating.clamp(RATING_MIN, RATING_MAX),
            });
        }

        info!(
            "Normalized {} movies ({} missing fields, {} without genres, {} duplicates dropped)",
            catalog.len(),
            report.movies_missing_fields,
            report.movies_without_genres,
            report.duplicate_movies
        );
        info!(
            "Kept {} of {} ratings ({} invalid, {} duplicates); global mean {:.3}, {} movies filled",
            report.ratings_read - report.ratings_invalid - report.duplicate_ratings,
            report.ratings_read,
            report.ratings_invalid,
            report.duplicate_ratings,
            report.global_mean,
            report.movies_filled
        );

        (catalog, report)
    }

    /// Steps 1-3 for movies. Returns (id, title, genres) in input order.
    fn clean_movies(
        &self,
        raw_movies: &[RawMovie],
        report: &mut NormalizeReport,
    ) -> Vec<(MovieId, String, Vec<String>)> {
        let mut seen = HashSet::new();
        let mut movies = Vec::with_capacity(raw_movies.len());

        for raw in raw_movies {
            let (Some(id), Some(title), Some(genre_field)) =
                (raw.id, raw.title.as_deref(), raw.genres.as_deref())
            else {
                report.movies_missing_fields += 1;
                continue;
            };

            let title = title.trim();
            let genre_field = genre_field.trim();
            if title.is_empty() {
                report.movies_missing_fields += 1;
                continue;
            }
            if genre_field == NO_GENRES_SENTINEL {
                report.movies_without_genres += 1;
                continue;
            }
            let genres = parser::split_genres(genre_field);
            if genres.is_empty() {
                report.movies_missing_fields += 1;
                continue;
            }

            if !seen.insert(id) {
                report.duplicate_movies += 1;
                continue;
            }
            movies.push((id, title.to_string(), genres));
        }

        movies
    }
}

/// Steps 1, 3 and 4 for ratings
fn clean_ratings(raw_ratings: &[RawRating], report: &mut NormalizeReport) -> Vec<Rating> {
    let mut seen: HashSet<(Option<UserId>, MovieId)> = HashSet::new();
    let mut ratings = Vec::with_capacity(raw_ratings.len());

    for raw in raw_ratings {
        let (Some(movie_id), Some(rating)) = (raw.movie_id, raw.rating) else {
            report.ratings_invalid += 1;
            continue;
        };
        if !rating.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&rating) {
            report.ratings_invalid += 1;
            continue;
        }
        if !seen.insert((raw.user_id, movie_id)) {
            report.duplicate_ratings += 1;
            continue;
        }
        ratings.push(Rating { movie_id, rating });
    }

    ratings
}

/// Mean of every surviving rating; the scale midpoint when there are none
fn global_mean(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return (RATING_MIN + RATING_MAX) / 2.0;
    }
    let total: f64 = ratings.iter().map(|r| r.rating).sum();
    total / ratings.len() as f64
}

/// Per-movie arithmetic mean.
///
/// Grouping is sequential; the per-movie sums run in parallel. Each sum
/// still adds its ratings in input order, so the result doesn't depend on
/// scheduling.
fn average_ratings(ratings: &[Rating]) -> HashMap<MovieId, f64> {
    let mut by_movie: HashMap<MovieId, Vec<f64>> = HashMap::new();
    for rating in ratings {
        by_movie
            .entry(rating.movie_id)
            .or_insert_with(Vec::new)
            .push(rating.rating);
    }

    by_movie
        .par_iter()
        .map(|(&movie_id, values)| {
            let total: f64 = values.iter().sum();
            (movie_id, total / values.len() as f64)
        })
        .collect()
}

/// Normalize with the default genre → emotion table
pub fn normalize(raw_movies: &[RawMovie], raw_ratings: &[RawRating]) -> Catalog {
    Normalizer::default().normalize(raw_movies, raw_ratings).0
}

impl Catalog {
    /// Read movie.csv and rating.csv and build the catalog
    ///
    /// The two files are parsed in parallel.
    pub fn from_raw_files(
        movies_path: &Path,
        ratings_path: &Path,
        normalizer: &Normalizer,
    ) -> Result<(Self, NormalizeReport)> {
        let start = Instant::now();
        info!("Loading raw tables {:?} and {:?}", movies_path, ratings_path);

        let (movies, ratings) = rayon::join(
            || parser::read_raw_movies(movies_path),
            || parser::read_raw_ratings(ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        let result = normalizer.normalize(&movies, &ratings);
        info!("Catalog built in {:?}", start.elapsed());
        Ok(result)
    }
}
