//! Emotion vocabulary and multi-hot encoding.
//!
//! The vocabulary fixes which coordinate of an `EmotionVector` means which
//! label. It is sorted lexicographically, so fitting the same corpus twice
//! gives the same coordinates and a persisted model stays valid across
//! reloads.

use crate::PredictorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// On-disk form: `{"labels": ["Anger", "Disgust", ...]}`
#[derive(Debug, Serialize, Deserialize)]
struct VocabularyFile {
    labels: Vec<String>,
}

/// Ordered, fixed set of emotion labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    labels: Vec<String>,
}

/// Multi-hot vector over a vocabulary: 1.0 where the label is present
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionVector {
    values: Vec<f32>,
}

impl EmotionVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of coordinates set to 1.0
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|v| **v > 0.0).count()
    }
}

impl Vocabulary {
    /// Fit a vocabulary on the union of all emotion sets
    pub fn fit<I, S, L>(emotion_sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels: BTreeSet<String> = emotion_sets
            .into_iter()
            .flatten()
            .map(|label| label.as_ref().to_string())
            .collect();
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    /// Rebuild a vocabulary from a stored label list.
    ///
    /// The list must already be in fitted form: sorted, unique, non-blank.
    pub fn from_labels(labels: Vec<String>) -> Result<Self, String> {
        if let Some(blank) = labels.iter().find(|l| l.trim().is_empty()) {
            return Err(format!("Blank label {:?}", blank));
        }
        if let Some(pair) = labels.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "Labels must be sorted and unique, found {:?} before {:?}",
                pair[0], pair[1]
            ));
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|l| l.as_str().cmp(label))
            .ok()
    }

    /// Encode a set of labels as a multi-hot vector.
    ///
    /// Fails on the first label that isn't in the vocabulary. Repeating a
    /// label has no additional effect.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<EmotionVector, PredictorError> {
        let mut values = vec![0.0; self.labels.len()];
        for label in labels {
            let label = label.as_ref();
            let idx = self
                .index_of(label)
                .ok_or_else(|| PredictorError::UnknownLabel(label.to_string()))?;
            values[idx] = 1.0;
        }
        Ok(EmotionVector { values })
    }

    /// Write the vocabulary as JSON
    pub fn save(&self, path: &Path) -> Result<(), PredictorError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = VocabularyFile {
            labels: self.labels.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| {
            PredictorError::InvalidArtifact {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a vocabulary written by [`Vocabulary::save`]
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        if !path.exists() {
            return Err(PredictorError::ArtifactMissing {
                path: path.display().to_string(),
            });
        }
        let invalid = |reason: String| PredictorError::InvalidArtifact {
            path: path.display().to_string(),
            reason,
        };

        let data = fs::read_to_string(path)?;
        let file: VocabularyFile =
            serde_json::from_str(&data).map_err(|e| invalid(e.to_string()))?;
        Self::from_labels(file.labels).map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn corpus() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Sadness", "Joy"],
            vec!["Fear"],
            vec![],
            vec!["Joy", "Anger", "Fear"],
        ]
    }

    #[test]
    fn test_fit_is_sorted_and_unique() {
        let vocab = Vocabulary::fit(corpus());
        assert_eq!(vocab.labels(), ["Anger", "Fear", "Joy", "Sadness"]);
    }

    #[test]
    fn test_fit_is_order_independent() {
        let mut reversed = corpus();
        reversed.reverse();
        assert_eq!(Vocabulary::fit(corpus()), Vocabulary::fit(reversed));
    }

    #[test]
    fn test_encode_known_labels() {
        let vocab = Vocabulary::fit(corpus());

        for set in corpus() {
            for label in set {
                assert!(vocab.encode(&[label]).is_ok());
            }
        }

        let vector = vocab.encode(&["Joy", "Fear"]).unwrap();
        assert_eq!(vector.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(vector.active_count(), 2);
    }

    #[test]
    fn test_encode_repeated_label() {
        let vocab = Vocabulary::fit(corpus());
        let once = vocab.encode(&["Joy"]).unwrap();
        let twice = vocab.encode(&["Joy", "Joy"]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_encode_unknown_label() {
        let vocab = Vocabulary::fit(corpus());
        let err = vocab.encode(&["Joy", "Disgust"]).unwrap_err();
        assert!(matches!(err, PredictorError::UnknownLabel(ref l) if l == "Disgust"));
        // labels are case-sensitive
        assert!(vocab.encode(&["joy"]).is_err());
    }

    #[test]
    fn test_from_labels_validation() {
        assert!(Vocabulary::from_labels(vec!["Anger".into(), "Joy".into()]).is_ok());
        assert!(Vocabulary::from_labels(vec!["Joy".into(), "Anger".into()]).is_err());
        assert!(Vocabulary::from_labels(vec!["Joy".into(), "Joy".into()]).is_err());
        assert!(Vocabulary::from_labels(vec!["".into()]).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("vocabulary.json");
        let vocab = Vocabulary::fit(corpus());

        vocab.save(&path).unwrap();
        assert_eq!(Vocabulary::load(&path).unwrap(), vocab);
    }

    #[test]
    fn test_load_missing() {
        let err = Vocabulary::load(Path::new("nowhere/vocabulary.json")).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_load_unsorted_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");
        fs::write(&path, r#"{"labels": ["Joy", "Fear"]}"#).unwrap();

        let err = Vocabulary::load(&path).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidArtifact { .. }));
    }
}
