//! Media-related data models.

use crate::models::catalog::{MovieDetails, SubtitleCandidate};
use crate::models::language::Language;
use serde::Serialize;
use std::path::PathBuf;

/// Content fingerprint of a video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    /// 64-bit content hash.
    pub hash: u64,
    /// File size in bytes when hashed.
    pub size: u64,
}

impl Fingerprint {
    /// Fixed-width lowercase hex form used by the catalog.
    pub fn hex(&self) -> String {
        format!("{:016x}", self.hash)
    }
}

/// Pipeline stage names, used for progress and failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fingerprint,
    Search,
    Download,
    Place,
    Organize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Fingerprint => "fingerprint",
            Stage::Search => "search",
            Stage::Download => "download",
            Stage::Place => "place",
            Stage::Organize => "organize",
        };
        write!(f, "{}", name)
    }
}

/// Progress of a single file through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FileStage {
    Discovered,
    Fingerprinted,
    Searched,
    Selected,
    Downloaded,
    Placed,
    Organized,
    Failed { stage: Stage, reason: String },
}

impl FileStage {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileStage::Failed { .. })
    }

    /// Whether the subtitle reached disk.
    pub fn is_placed(&self) -> bool {
        matches!(self, FileStage::Placed | FileStage::Organized)
    }
}

/// Video file discovered by the scanner, plus everything the run learns about it.
#[derive(Debug, Clone)]
pub struct VideoFile {
    /// Current path; updated whenever the file is moved or renamed.
    pub path: PathBuf,
    /// File name at scan time.
    pub original_filename: String,
    /// Language of a subtitle already lying next to the video at scan time.
    pub existing_subtitle: Option<String>,
    pub fingerprint: Option<Fingerprint>,
    /// Catalog candidates for this file, in catalog order.
    pub search_results: Vec<SubtitleCandidate>,
    /// Index into `search_results`.
    selected: Option<usize>,
    pub enrichment: Option<MovieDetails>,
    /// Where the subtitle was written, once placed.
    pub subtitle_path: Option<PathBuf>,
    /// Decoded subtitle file between download and placement, in its original encoding.
    pub subtitle_bytes: Option<Vec<u8>>,
    pub stage: FileStage,
    /// Non-fatal problems from optional organize steps.
    pub warnings: Vec<String>,
}

impl VideoFile {
    pub fn new(path: PathBuf, existing_subtitle: Option<String>) -> Self {
        let original_filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            original_filename,
            existing_subtitle,
            fingerprint: None,
            search_results: Vec::new(),
            selected: None,
            enrichment: None,
            subtitle_path: None,
            subtitle_bytes: None,
            stage: FileStage::Discovered,
            warnings: Vec::new(),
        }
    }

    /// File stem of the current path.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File stem at scan time.
    pub fn original_stem(&self) -> String {
        match self.original_filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.original_filename.clone(),
        }
    }

    /// Chosen subtitle, if selection succeeded.
    pub fn selected_subtitle(&self) -> Option<&SubtitleCandidate> {
        self.selected.and_then(|i| self.search_results.get(i))
    }

    /// Record the selection. Out-of-range indices are ignored so a selection
    /// always points into this file's own results.
    pub fn set_selected(&mut self, index: usize) -> bool {
        if index < self.search_results.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Selected language, if any.
    pub fn selected_language(&self) -> Option<Language> {
        self.selected_subtitle().map(|s| s.language)
    }

    /// Freeze this file at `stage` with a reason.
    pub fn fail(&mut self, stage: Stage, reason: impl std::fmt::Display) {
        tracing::warn!("[{}] {}: {}", stage, self.path.display(), reason);
        self.stage = FileStage::Failed {
            stage,
            reason: reason.to_string(),
        };
    }

    pub fn is_failed(&self) -> bool {
        self.stage.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> SubtitleCandidate {
        SubtitleCandidate {
            id: id.to_string(),
            movie_hash: "0000000000000001".to_string(),
            movie_byte_size: 1,
            language: Language::lookup("en").unwrap(),
            language_name: "English".to_string(),
            movie_name: "Movie".to_string(),
            movie_year: None,
            imdb_id: None,
            format: "srt".to_string(),
        }
    }

    #[test]
    fn test_fingerprint_hex_is_fixed_width() {
        let fp = Fingerprint { hash: 0xab, size: 1 };
        assert_eq!(fp.hex(), "00000000000000ab");
    }

    #[test]
    fn test_placed_includes_organized() {
        assert!(FileStage::Placed.is_placed());
        assert!(FileStage::Organized.is_placed());
        assert!(!FileStage::Downloaded.is_placed());
        let failed = FileStage::Failed {
            stage: Stage::Place,
            reason: "disk full".to_string(),
        };
        assert!(!failed.is_placed());
        assert!(failed.is_failed());
    }

    #[test]
    fn test_selection_stays_within_results() {
        let mut file = VideoFile::new(PathBuf::from("/movies/a.avi"), None);
        assert!(!file.set_selected(0));
        assert!(file.selected_subtitle().is_none());

        file.search_results.push(candidate("1"));
        file.search_results.push(candidate("2"));
        assert!(file.set_selected(1));
        assert_eq!(file.selected_subtitle().map(|s| s.id.as_str()), Some("2"));
    }

    #[test]
    fn test_original_stem() {
        let file = VideoFile::new(PathBuf::from("/movies/The.Movie.cd1.avi"), None);
        assert_eq!(file.original_filename, "The.Movie.cd1.avi");
        assert_eq!(file.original_stem(), "The.Movie.cd1");
        assert_eq!(file.stem(), "The.Movie.cd1");
    }
}
