use predictor::PredictorError;
use ranking::RankingError;
use thiserror::Error;

/// Why a recommendation request produced no list
#[derive(Error, Debug)]
pub enum RecommendError {
    /// No emotion selected; nothing is computed
    #[error("Please select at least one emotion")]
    EmptySelection,

    #[error("At most {max} emotions can be selected, got {count}")]
    TooManySelections { count: usize, max: usize },

    /// The model's vocabulary doesn't know this emotion
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    /// The rating scorer was configured without model artifacts
    #[error("The rating scorer needs a loaded model and vocabulary")]
    ModelNotLoaded,

    #[error("Prediction failed: {0}")]
    Prediction(PredictorError),

    #[error("Ranking failed: {0}")]
    Ranking(#[from] RankingError),
}

impl From<PredictorError> for RecommendError {
    fn from(err: PredictorError) -> Self {
        match err {
            PredictorError::UnknownLabel(label) => RecommendError::UnknownEmotion(label),
            other => RecommendError::Prediction(other),
        }
    }
}
