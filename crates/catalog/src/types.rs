//! Core domain types for the movie catalog.
//!
//! Two families of types live here:
//! - raw rows (`RawMovie`, `RawRating`) exactly as they come out of the
//!   MovieLens CSV files, where every field may be missing
//! - the cleaned `Movie` and the `Catalog` that holds them, which uphold the
//!   invariants the recommender relies on

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user in the ratings table
pub type UserId = u32;

/// Unique identifier for a movie (the `movieId` source key)
pub type MovieId = u32;

/// Lowest rating on the MovieLens scale
pub const RATING_MIN: f64 = 0.5;

/// Highest rating on the MovieLens scale
pub const RATING_MAX: f64 = 5.0;

/// Genre field value MovieLens uses for movies without any genre
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

// =============================================================================
// Raw rows
// =============================================================================

/// One row of `movie.csv`: `movieId,title,genres`
///
/// Every field is optional. An empty or unparsable cell deserializes to
/// `None` (via `csv::invalid_option`) so the normalizer can drop the row
/// instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMovie {
    #[serde(rename = "movieId", default, deserialize_with = "csv::invalid_option")]
    pub id: Option<MovieId>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub title: Option<String>,
    /// Pipe-separated genres, e.g. "Adventure|Animation|Children"
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub genres: Option<String>,
}

/// One row of `rating.csv`: `userId,movieId,rating,timestamp`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRating {
    #[serde(rename = "userId", default, deserialize_with = "csv::invalid_option")]
    pub user_id: Option<UserId>,
    #[serde(rename = "movieId", default, deserialize_with = "csv::invalid_option")]
    pub movie_id: Option<MovieId>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,
    /// Kept as text: MovieLens ships both unix seconds and datetimes here
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub timestamp: Option<String>,
}

// =============================================================================
// Cleaned types
// =============================================================================

/// A rating after normalization: user and timestamp are gone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub movie_id: MovieId,
    /// Always within [RATING_MIN, RATING_MAX]
    pub rating: f64,
}

/// One row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tokens in source order
    pub genres: Vec<String>,
    /// Emotion labels derived from `genres`, duplicates removed
    pub emotions: Vec<String>,
    pub average_rating: f64,
}

impl Movie {
    /// Genres in their source form, e.g. "Comedy|Romance"
    pub fn genres_display(&self) -> String {
        self.genres.join("|")
    }

    /// Whether this movie carries the given emotion label
    pub fn has_emotion(&self, emotion: &str) -> bool {
        self.emotions.iter().any(|e| e == emotion)
    }
}

// =============================================================================
// Catalog - the in-memory table served at request time
// =============================================================================

/// The cleaned, enriched table of movies.
///
/// Movies are kept sorted by id, which gives deterministic iteration order
/// and O(log n) lookups without a separate index. Ids are unique: inserting
/// a movie whose id is already present is a no-op (first occurrence wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Build a catalog from movies, keeping the first movie seen for each id
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.insert_movie(movie);
        }
        catalog
    }

    /// Insert a movie, keeping the table sorted by id
    ///
    /// Returns `false` (and drops `movie`) if the id is already present.
    pub fn insert_movie(&mut self, movie: Movie) -> bool {
        match self.movies.binary_search_by_key(&movie.id, |m| m.id) {
            Ok(_) => false,
            Err(pos) => {
                self.movies.insert(pos, movie);
                true
            }
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|pos| &self.movies[pos])
    }

    /// All movies, sorted by id
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The emotion set of every movie, in catalog order
    ///
    /// This is the corpus the emotion vocabulary is fit on.
    pub fn emotion_sets(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.movies.iter().map(|m| m.emotions.as_slice())
    }

    /// Case-insensitive substring search over titles
    ///
    /// Exact title matches come first, then substring matches; each group is
    /// ordered by average rating, highest first.
    pub fn search_title(&self, query: &str) -> Vec<&Movie> {
        let query = query.to_lowercase();
        let mut matches: Vec<(u8, &Movie)> = self
            .movies
            .iter()
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((0, movie))
                } else if title.contains(&query) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.average_rating.total_cmp(&a.1.average_rating))
        });
        matches.into_iter().map(|(_, m)| m).collect()
    }

    /// Express this catalog as raw tables again.
    ///
    /// Each movie becomes one raw movie row and one anonymous rating equal to
    /// its average. Normalizing the result reproduces the catalog.
    pub fn to_raw_tables(&self) -> (Vec<RawMovie>, Vec<RawRating>) {
        self.movies
            .iter()
            .map(|movie| {
                (
                    RawMovie {
                        id: Some(movie.id),
                        title: Some(movie.title.clone()),
                        genres: Some(movie.genres_display()),
                    },
                    RawRating {
                        user_id: None,
                        movie_id: Some(movie.id),
                        rating: Some(movie.average_rating),
                        timestamp: None,
                    },
                )
            })
            .unzip()
    }
}
