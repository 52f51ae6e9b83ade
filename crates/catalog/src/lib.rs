//! # Catalog Crate
//!
//! This crate turns the raw MovieLens tables into the movie catalog the
//! recommender serves from, and persists it.
//!
//! ## Main Components
//!
//! - **types**: Raw rows, `Movie` and the `Catalog` table
//! - **emotions**: The versioned genre → emotion table and the `Emotion` labels
//! - **parser**: Lenient CSV parsing of movie.csv / rating.csv
//! - **normalize**: The preprocessing job (clean, de-duplicate, enrich, average)
//! - **store**: Atomic save / strict load of the processed catalog
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, Normalizer};
//! use std::path::Path;
//!
//! let (catalog, report) = Catalog::from_raw_files(
//!     Path::new("data/raw/movie.csv"),
//!     Path::new("data/raw/rating.csv"),
//!     &Normalizer::default(),
//! )?;
//! catalog.save(Path::new("data/processed/processed_movies.csv"))?;
//!
//! // Later, at serving time
//! let catalog = Catalog::load(Path::new("data/processed/processed_movies.csv"))?;
//! println!("{} movies, global mean {:.2}", catalog.len(), report.global_mean);
//! ```

// Public modules
pub mod emotions;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use emotions::{COARSE_V1, Emotion, GenreEmotionTable};
pub use error::{CatalogError, Result};
pub use normalize::{NormalizeReport, Normalizer, normalize};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Catalog,
    Movie,
    RawMovie,
    RawRating,
    Rating,
    // Constants
    NO_GENRES_SENTINEL,
    RATING_MAX,
    RATING_MIN,
};
