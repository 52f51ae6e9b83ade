//! The vocabulary and the network, loaded together.

use crate::network::{DenseNetwork, RatingPredictor};
use crate::vocabulary::Vocabulary;
use crate::PredictorError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Immutable model state for the rating-prediction path.
///
/// Built once at startup and handed to whoever serves requests. The
/// vocabulary width always equals the predictor's input width.
#[derive(Clone)]
pub struct ModelArtifacts {
    vocabulary: Vocabulary,
    predictor: Arc<dyn RatingPredictor>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("vocabulary", &self.vocabulary)
            .field("input_width", &self.predictor.input_width())
            .finish()
    }
}

impl ModelArtifacts {
    pub fn new(
        vocabulary: Vocabulary,
        predictor: impl RatingPredictor + 'static,
    ) -> Result<Self, PredictorError> {
        if vocabulary.len() != predictor.input_width() {
            return Err(PredictorError::DimensionMismatch {
                expected: predictor.input_width(),
                found: vocabulary.len(),
            });
        }
        Ok(Self {
            vocabulary,
            predictor: Arc::new(predictor),
        })
    }

    /// Load `model.json` and `vocabulary.json`. Either one missing is an error.
    pub fn load(model_path: &Path, vocabulary_path: &Path) -> Result<Self, PredictorError> {
        let vocabulary = Vocabulary::load(vocabulary_path)?;
        let network = DenseNetwork::load(model_path)?;
        info!(
            "Loaded model {:?} with vocabulary {:?} ({} labels)",
            model_path,
            vocabulary_path,
            vocabulary.len()
        );
        Self::new(vocabulary, network)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Encode `labels` and run the predictor on them
    pub fn predict_rating<S: AsRef<str>>(&self, labels: &[S]) -> Result<f64, PredictorError> {
        let vector = self.vocabulary.encode(labels)?;
        self.predictor.predict(&vector)
    }
}
