//! Catalog request and response models.

use crate::models::language::Language;
use serde::Serialize;

/// One catalog lookup: a movie fingerprint in one wanted language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub movie_hash: String,
    pub movie_byte_size: u64,
    pub language: Language,
}

/// A subtitle offered by the catalog for a fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleCandidate {
    /// Catalog subtitle file id, used for download.
    pub id: String,
    /// Fingerprint the subtitle was indexed under.
    pub movie_hash: String,
    /// Byte size of the movie the subtitle was indexed under.
    pub movie_byte_size: u64,
    pub language: Language,
    /// Human readable language name from the catalog.
    pub language_name: String,
    pub movie_name: String,
    pub movie_year: Option<u16>,
    /// IMDb id of the movie, digits only.
    pub imdb_id: Option<String>,
    /// Subtitle format reported by the catalog (e.g. "srt").
    pub format: String,
}

/// A downloaded subtitle, still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedSubtitle {
    pub id: String,
    /// Base64 of the gzip-compressed subtitle text.
    pub payload: String,
}

/// Enrichment record for a movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieDetails {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<u16>,
    pub cover_url: Option<String>,
    pub rating: Option<f32>,
    pub tagline: Option<String>,
    pub plot: Option<String>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub cast: Vec<String>,
    pub countries: Vec<String>,
}
