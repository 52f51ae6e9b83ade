//! Emotion encoding and rating prediction.
//!
//! This crate is the serving-side boundary of the trained model. It handles:
//! - Fitting and applying the emotion vocabulary (multi-label binarization)
//! - Evaluating the trained rating regressor, exported as a JSON artifact
//! - Loading both artifacts together and checking they belong together
//!
//! Training is an offline job outside this workspace; the only contract with
//! it is the artifact format.

use thiserror::Error;

pub mod artifacts;
pub mod network;
pub mod vocabulary;

pub use artifacts::ModelArtifacts;
pub use network::{Activation, DenseNetwork, Layer, RatingPredictor};
pub use vocabulary::{EmotionVector, Vocabulary};

/// Errors that can occur when loading or evaluating the model
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Model artifact not found: {path}")]
    ArtifactMissing { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    /// A query label the vocabulary was never fit on
    #[error("Unknown emotion label: {0}")]
    UnknownLabel(String),

    #[error("Expected an input of width {expected} but got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Model produced a non-finite prediction")]
    NonFiniteOutput,
}
