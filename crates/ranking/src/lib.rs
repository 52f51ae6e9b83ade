//! Ranking of catalog movies against a user's query.
//!
//! This crate provides:
//! - Scorer trait and implementations (predicted-rating distance, emotion similarity)
//! - CandidateFilter trait, the EmotionMatchFilter and a FilterPipeline to compose them
//! - The Ranker that orders candidates and keeps the top N
//!
//! ## Architecture
//! A request is processed in stages:
//! 1. Filters narrow the catalog to candidates
//! 2. A scorer computes each candidate's distance to the query
//! 3. The ranker sorts by distance (ties: higher rating first) and truncates
//!
//! ## Example Usage
//! ```ignore
//! use ranking::{FilterPipeline, Ranker, RatingDistanceScorer};
//! use ranking::filters::EmotionMatchFilter;
//!
//! let pipeline = FilterPipeline::new().add_filter(EmotionMatchFilter::new(&["Fear"]));
//! let candidates = pipeline.apply(catalog.movies().iter().collect());
//!
//! let scorer = RatingDistanceScorer::new(predicted_rating)?;
//! let top = Ranker::new(10)?.rank(&candidates, &scorer);
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod ranker;
pub mod scorers;
pub mod traits;

// Re-export main types
pub use error::RankingError;
pub use filter_pipeline::FilterPipeline;
pub use ranker::{DEFAULT_TOP_N, RankedMovie, Ranker, rank};
pub use scorers::{EmotionSimilarityScorer, EmotionTfIdf, RatingDistanceScorer};
pub use traits::{CandidateFilter, Scorer};
