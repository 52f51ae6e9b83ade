//! Emotion-driven movie recommendations.
//!
//! This crate ties the pieces together: it validates a user's emotion
//! selection, turns it into a scorer (predicted-rating distance or emotion
//! similarity), ranks the catalog and annotates each result for display.

pub mod config;
pub mod display;
pub mod error;
pub mod service;

pub use config::{ConfigError, RecommenderConfig, ScorerKind};
pub use display::{MovieRecommendation, rating_to_stars, search_url};
pub use error::RecommendError;
pub use service::{MAX_SELECTED_EMOTIONS, RecommendationResponse, RecommendationService};
