//! Parsers for the MovieLens CSV files and the catalog's list columns.
//!
//! - movie.csv: movieId,title,genres
//! - rating.csv: userId,movieId,rating,timestamp
//!
//! Raw files are read leniently: a row the CSV layer cannot deserialize at
//! all is skipped and counted, and cells that are empty or unparsable become
//! `None` for the normalizer to deal with. Only a missing or unreadable file
//! is an error.

use crate::error::{CatalogError, Result};
use crate::types::{RawMovie, RawRating};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

/// Parse movie.csv into raw rows
pub fn read_raw_movies(path: &Path) -> Result<Vec<RawMovie>> {
    read_rows(path)
}

/// Parse rating.csv into raw rows
pub fn read_raw_ratings(path: &Path) -> Result<Vec<RawRating>> {
    read_rows(path)
}

/// Deserialize every row of a headed CSV file, skipping rows that fail.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                // +2: one for the header, one for 1-based numbering
                debug!("Skipping row {} of {:?}: {}", idx + 2, path, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} unreadable rows in {:?}", skipped, path);
    }
    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Split a pipe-separated genre field into tokens
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
/// Empty tokens (from "Action||Drama" or a trailing pipe) are dropped.
pub fn split_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encode an emotion list for the catalog's `emotions` column
///
/// Example: ["Sadness", "Joy"] -> `["Sadness","Joy"]`
pub fn encode_emotions(emotions: &[String]) -> Result<String> {
    Ok(serde_json::to_string(emotions)?)
}

/// Decode the catalog's `emotions` column
///
/// The column must be a JSON array of strings. Anything else is rejected
/// with the reason; the caller adds file and line context.
pub fn decode_emotions(s: &str) -> std::result::Result<Vec<String>, String> {
    let emotions: Vec<String> = serde_json::from_str(s)
        .map_err(|e| format!("Invalid emotions list {:?}: {}", s, e))?;
    if let Some(empty) = emotions.iter().find(|e| e.trim().is_empty()) {
        return Err(format!("Blank emotion label {:?} in {:?}", empty, s));
    }
    Ok(emotions)
}
