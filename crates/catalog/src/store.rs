//! Persisted catalog file.
//!
//! Format (CSV with header):
//!
//! ```text
//! id,title,genres,emotions,average_rating
//! 1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy,"[""Joy"",""Anger""]",3.92
//! ```
//!
//! Unlike the raw MovieLens tables, this file is our own output, so any
//! malformed row is reported as an error instead of being skipped.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::{Catalog, Movie, MovieId, RATING_MAX, RATING_MIN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// One row of the persisted catalog
#[derive(Debug, Serialize, Deserialize)]
struct CatalogRecord {
    id: MovieId,
    title: String,
    genres: String,
    emotions: String,
    average_rating: f64,
}

impl CatalogRecord {
    fn from_movie(movie: &Movie) -> Result<Self> {
        Ok(Self {
            id: movie.id,
            title: movie.title.clone(),
            genres: movie.genres_display(),
            emotions: parser::encode_emotions(&movie.emotions)?,
            average_rating: movie.average_rating,
        })
    }

    fn into_movie(self) -> std::result::Result<Movie, String> {
        if self.title.trim().is_empty() {
            return Err("Empty title".to_string());
        }
        let genres = parser::split_genres(&self.genres);
        if genres.is_empty() {
            return Err("Empty genres".to_string());
        }
        if !(RATING_MIN..=RATING_MAX).contains(&self.average_rating) {
            return Err(format!(
                "average_rating {} outside [{}, {}]",
                self.average_rating, RATING_MIN, RATING_MAX
            ));
        }
        let emotions = parser::decode_emotions(&self.emotions)?;

        Ok(Movie {
            id: self.id,
            title: self.title,
            genres,
            emotions,
            average_rating: self.average_rating,
        })
    }
}

impl Catalog {
    /// Write the catalog to `path`, replacing any previous file atomically.
    ///
    /// Rows go to a temporary file in the destination directory, which is
    /// then renamed over `path`. The directory is created if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file());
            for movie in self.movies() {
                writer.serialize(CatalogRecord::from_movie(movie)?)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(path).map_err(|e| CatalogError::PersistError {
            path: path.display().to_string(),
            reason: e.error.to_string(),
        })?;

        info!("Saved {} movies to {:?}", self.len(), path);
        Ok(())
    }

    /// Load a catalog written by [`Catalog::save`]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = path.display().to_string();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let mut catalog = Catalog::new();

        for result in reader.records() {
            let row = result?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let record: CatalogRecord =
                row.deserialize(Some(&headers))
                    .map_err(|e| CatalogError::ParseError {
                        file: file.clone(),
                        line,
                        reason: e.to_string(),
                    })?;
            let id = record.id;
            let movie = record.into_movie().map_err(|reason| CatalogError::ParseError {
                file: file.clone(),
                line,
                reason,
            })?;
            if !catalog.insert_movie(movie) {
                return Err(CatalogError::ParseError {
                    file: file.clone(),
                    line,
                    reason: format!("Duplicate id {}", id),
                });
            }
        }

        info!("Loaded {} movies from {:?}", catalog.len(), path);
        Ok(catalog)
    }
}
