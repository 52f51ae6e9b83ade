//! Filter implementations for the candidate pipeline.

pub mod emotion_match;

pub use emotion_match::EmotionMatchFilter;
