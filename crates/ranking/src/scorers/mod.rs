//! Scorer implementations, one per serving path.

pub mod emotion_similarity;
pub mod rating_distance;

pub use emotion_similarity::{EmotionSimilarityScorer, EmotionTfIdf};
pub use rating_distance::RatingDistanceScorer;
