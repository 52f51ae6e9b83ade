//! Genre → emotion mapping.
//!
//! A movie's emotion labels are derived from its genres through a fixed
//! lookup table. Every genre maps to at most one emotion; several genres may
//! share an emotion. The table is versioned because the label set it produces
//! defines the emotion vocabulary downstream: a catalog built with one table
//! must not be served with a model trained on another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// The emotions a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Emotion {
    Joy,
    Fear,
    Disgust,
    Sadness,
    Anger,
}

impl Emotion {
    /// All selectable emotions, in menu order
    pub const ALL: [Emotion; 5] = [
        Emotion::Joy,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Sadness,
        Emotion::Anger,
    ];

    /// Label as stored in the catalog's emotions column
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "Joy",
            Emotion::Fear => "Fear",
            Emotion::Disgust => "Disgust",
            Emotion::Sadness => "Sadness",
            Emotion::Anger => "Anger",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Joy => "😃",
            Emotion::Fear => "😨",
            Emotion::Disgust => "🤢",
            Emotion::Sadness => "😢",
            Emotion::Anger => "😠",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = CatalogError;

    /// Case-insensitive: "joy", "Joy" and "JOY" all parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::InvalidValue {
                field: "emotion".to_string(),
                value: s.to_string(),
            })
    }
}

/// A versioned, static genre → emotion table
#[derive(Debug, Clone, Copy)]
pub struct GenreEmotionTable {
    version: &'static str,
    entries: &'static [(&'static str, Emotion)],
}

/// The five-label table used for the MovieLens catalog.
pub const COARSE_V1: GenreEmotionTable = GenreEmotionTable {
    version: "coarse-v1",
    entries: &[
        ("Drama", Emotion::Sadness),
        ("Comedy", Emotion::Joy),
        ("Thriller", Emotion::Fear),
        ("Romance", Emotion::Joy),
        ("Action", Emotion::Anger),
        ("Crime", Emotion::Disgust),
        ("Horror", Emotion::Fear),
        ("Documentary", Emotion::Joy),
        ("Adventure", Emotion::Anger),
        ("Sci-Fi", Emotion::Fear),
        ("Mystery", Emotion::Disgust),
        ("Fantasy", Emotion::Joy),
        ("War", Emotion::Disgust),
        ("Children", Emotion::Joy),
        ("Musical", Emotion::Joy),
        ("Animation", Emotion::Joy),
        ("Western", Emotion::Anger),
        ("Film-Noir", Emotion::Sadness),
    ],
};

impl GenreEmotionTable {
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Emotion for a single genre token; `None` for genres the table doesn't know
    pub fn emotion_for(&self, genre: &str) -> Option<Emotion> {
        self.entries
            .iter()
            .find(|(g, _)| *g == genre)
            .map(|(_, e)| *e)
    }

    /// Map a genre list to its emotion labels.
    ///
    /// Unmapped genres are skipped. Duplicates are removed, keeping the
    /// position of the first genre that produced each emotion.
    pub fn map_genres<I, S>(&self, genres: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut emotions: Vec<String> = Vec::new();
        for emotion in genres.into_iter().filter_map(|g| self.emotion_for(g.as_ref())) {
            if !emotions.iter().any(|e| e == emotion.as_str()) {
                emotions.push(emotion.as_str().to_string());
            }
        }
        emotions
    }
}

impl Default for GenreEmotionTable {
    fn default() -> Self {
        COARSE_V1
    }
}
