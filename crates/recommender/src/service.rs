//! # Recommendation Service
//!
//! This module answers one request end to end:
//! 1. Validate the selection (one or two emotions)
//! 2. Build the scorer for the configured path
//!    - rating: encode emotions → predict rating → distance to the prediction
//!    - similarity: TF-IDF cosine distance of emotion sets
//! 3. Narrow the catalog to movies carrying a selected emotion (if enabled)
//! 4. Rank and keep the top N
//! 5. Annotate each entry for display
//!
//! Everything the service reads is loaded once and never mutated, so a
//! request is a pure function of its input.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use catalog::{Catalog, Movie};
use predictor::ModelArtifacts;
use ranking::filters::EmotionMatchFilter;
use ranking::{EmotionTfIdf, FilterPipeline, Ranker, RatingDistanceScorer, Scorer};

use crate::config::{RecommenderConfig, ScorerKind};
use crate::display::MovieRecommendation;
use crate::error::RecommendError;

/// How many emotions a user may select at once
pub const MAX_SELECTED_EMOTIONS: usize = 2;

/// Result of one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    /// The selection after de-duplication
    pub emotions: Vec<String>,
    pub scorer: ScorerKind,
    /// Only set on the rating path
    pub predicted_rating: Option<f64>,
    pub recommendations: Vec<MovieRecommendation>,
}

impl RecommendationResponse {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Backend state for the configured scorer
enum Backend {
    Rating(ModelArtifacts),
    Similarity(EmotionTfIdf),
}

/// Serves recommendations from a read-only catalog and model
pub struct RecommendationService {
    catalog: Arc<Catalog>,
    config: RecommenderConfig,
    ranker: Ranker,
    backend: Backend,
}

impl RecommendationService {
    /// Create a service for `config.scorer`.
    ///
    /// The rating path needs `model`; without it this fails with
    /// `ModelNotLoaded`. The similarity path fits its TF-IDF weights on the
    /// catalog here and ignores `model`.
    pub fn new(
        catalog: Arc<Catalog>,
        config: RecommenderConfig,
        model: Option<ModelArtifacts>,
    ) -> Result<Self, RecommendError> {
        let ranker = Ranker::new(config.top_n)?;
        let backend = match config.scorer {
            ScorerKind::Rating => Backend::Rating(model.ok_or(RecommendError::ModelNotLoaded)?),
            ScorerKind::Similarity => Backend::Similarity(EmotionTfIdf::fit(&catalog)),
        };

        info!(
            "Recommendation service ready: {} movies, scorer {}, top {}",
            catalog.len(),
            config.scorer,
            config.top_n
        );
        Ok(Self {
            catalog,
            config,
            ranker,
            backend,
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Main entry point: recommend movies for the selected emotions
    pub fn recommend<S: AsRef<str>>(
        &self,
        emotions: &[S],
    ) -> Result<RecommendationResponse, RecommendError> {
        let start_time = Instant::now();

        let selection = validate_selection(emotions)?;
        debug!("Selected emotions: {:?}", selection);

        let (scorer, predicted_rating) = self.build_scorer(&selection)?;
        if let Some(rating) = predicted_rating {
            info!("Predicted rating {:.3} for {:?}", rating, selection);
        }

        let candidates = self.candidates(&selection);
        info!(
            "{} candidates after filtering ({} in catalog)",
            candidates.len(),
            self.catalog.len()
        );

        let recommendations: Vec<MovieRecommendation> = self
            .ranker
            .rank(&candidates, scorer.as_ref())
            .iter()
            .enumerate()
            .map(|(i, ranked)| MovieRecommendation::new(i + 1, ranked))
            .collect();

        info!(
            "Selected {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );

        Ok(RecommendationResponse {
            emotions: selection,
            scorer: self.config.scorer,
            predicted_rating,
            recommendations,
        })
    }

    /// Scorer for this request, plus the predicted rating on the rating path
    fn build_scorer(
        &self,
        selection: &[String],
    ) -> Result<(Box<dyn Scorer + '_>, Option<f64>), RecommendError> {
        match &self.backend {
            Backend::Rating(model) => {
                let predicted = model.predict_rating(selection)?;
                let scorer = RatingDistanceScorer::new(predicted)?;
                Ok((Box::new(scorer), Some(predicted)))
            }
            Backend::Similarity(tfidf) => Ok((Box::new(tfidf.query(selection)), None)),
        }
    }

    fn candidates(&self, selection: &[String]) -> Vec<&Movie> {
        let all: Vec<&Movie> = self.catalog.movies().iter().collect();
        if !self.config.require_emotion_match {
            return all;
        }
        FilterPipeline::new()
            .add_filter(EmotionMatchFilter::new(selection))
            .apply(all)
    }
}

/// Trim, de-duplicate (keeping order) and bound the selection
fn validate_selection<S: AsRef<str>>(emotions: &[S]) -> Result<Vec<String>, RecommendError> {
    let mut selection: Vec<String> = Vec::with_capacity(emotions.len());
    for emotion in emotions {
        let emotion = emotion.as_ref().trim();
        if !emotion.is_empty() && !selection.iter().any(|e| e == emotion) {
            selection.push(emotion.to_string());
        }
    }

    match selection.len() {
        0 => Err(RecommendError::EmptySelection),
        n if n > MAX_SELECTED_EMOTIONS => Err(RecommendError::TooManySelections {
            count: n,
            max: MAX_SELECTED_EMOTIONS,
        }),
        _ => Ok(selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_selection() {
        assert_eq!(validate_selection(&["Joy"]).unwrap(), vec!["Joy"]);
        assert_eq!(validate_selection(&["Joy", " Joy "]).unwrap(), vec!["Joy"]);
        assert_eq!(
            validate_selection(&["Fear", "Joy"]).unwrap(),
            vec!["Fear", "Joy"]
        );
    }

    #[test]
    fn test_empty_selection() {
        assert!(matches!(
            validate_selection::<&str>(&[]),
            Err(RecommendError::EmptySelection)
        ));
        assert!(matches!(
            validate_selection(&["", "  "]),
            Err(RecommendError::EmptySelection)
        ));
    }

    #[test]
    fn test_too_many_selections() {
        assert!(matches!(
            validate_selection(&["Joy", "Fear", "Anger"]),
            Err(RecommendError::TooManySelections { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_rating_path_requires_model() {
        let result = RecommendationService::new(
            Arc::new(Catalog::new()),
            RecommenderConfig::default(),
            None,
        );
        assert!(matches!(result, Err(RecommendError::ModelNotLoaded)));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = RecommenderConfig {
            top_n: 0,
            scorer: ScorerKind::Similarity,
            ..Default::default()
        };
        let result = RecommendationService::new(Arc::new(Catalog::new()), config, None);
        assert!(matches!(result, Err(RecommendError::Ranking(_))));
    }
}
