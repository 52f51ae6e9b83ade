//! Emotion similarity: cosine distance between TF-IDF weighted emotion sets.
//!
//! Each movie's emotion list is a document. Rare emotions weigh more than
//! common ones, so a query for "Disgust" prefers movies where Disgust isn't
//! drowned out by the ubiquitous "Joy".

use crate::traits::Scorer;
use catalog::{Catalog, Movie};
use std::collections::{HashMap, HashSet};

/// Inverse document frequencies of emotion labels, fit on a catalog.
///
/// Uses the smoothed form `ln((N + 1) / (df + 1)) + 1`.
#[derive(Debug, Clone, Default)]
pub struct EmotionTfIdf {
    idf: HashMap<String, f64>,
}

impl EmotionTfIdf {
    pub fn fit(catalog: &Catalog) -> Self {
        let mut doc_frequencies: HashMap<&str, usize> = HashMap::new();
        for emotions in catalog.emotion_sets() {
            let unique: HashSet<&str> = emotions.iter().map(String::as_str).collect();
            for label in unique {
                *doc_frequencies.entry(label).or_insert(0) += 1;
            }
        }

        let n = catalog.len() as f64;
        let idf = doc_frequencies
            .into_iter()
            .map(|(label, df)| {
                let weight = ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
                (label.to_string(), weight)
            })
            .collect();

        Self { idf }
    }

    /// IDF of a label; `None` for labels no movie carries
    pub fn idf(&self, label: &str) -> Option<f64> {
        self.idf.get(label).copied()
    }

    /// Build the scorer for one query
    ///
    /// Labels the catalog never uses are ignored, like out-of-vocabulary
    /// terms in any TF-IDF model.
    pub fn query<S: AsRef<str>>(&self, emotions: &[S]) -> EmotionSimilarityScorer<'_> {
        let mut query: HashMap<String, f64> = HashMap::new();
        for label in emotions {
            if let Some(weight) = self.idf(label.as_ref()) {
                query.insert(label.as_ref().to_string(), weight);
            }
        }

        let norm = query.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in query.values_mut() {
                *weight /= norm;
            }
        }

        EmotionSimilarityScorer { model: self, query }
    }
}

/// `1 - cosine(query, movie)` over TF-IDF emotion vectors.
///
/// Ranges over [0, 1]: 0 for a movie with exactly the query's emotions, 1 for
/// a movie sharing none of them (or carrying no emotions at all).
#[derive(Debug, Clone)]
pub struct EmotionSimilarityScorer<'m> {
    model: &'m EmotionTfIdf,
    /// L2-normalised query weights
    query: HashMap<String, f64>,
}

impl EmotionSimilarityScorer<'_> {
    fn cosine(&self, movie: &Movie) -> f64 {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut norm_sq = 0.0;
        let mut dot = 0.0;

        for label in &movie.emotions {
            if !seen.insert(label.as_str()) {
                continue;
            }
            let Some(weight) = self.model.idf(label) else {
                continue;
            };
            norm_sq += weight * weight;
            if let Some(q) = self.query.get(label) {
                dot += q * weight;
            }
        }

        if norm_sq == 0.0 {
            0.0
        } else {
            (dot / norm_sq.sqrt()).clamp(0.0, 1.0)
        }
    }
}

impl Scorer for EmotionSimilarityScorer<'_> {
    fn name(&self) -> &str {
        "EmotionSimilarityScorer"
    }

    fn distance(&self, movie: &Movie) -> f64 {
        1.0 - self.cosine(movie)
    }
}
