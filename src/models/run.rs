//! Run options and run report models.

use super::language::LanguagePreference;
use super::media::{FileStage, VideoFile};
use serde::Serialize;
use std::path::PathBuf;

/// Behaviour requested for one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory or single video file to process.
    pub input: PathBuf,
    /// Destination for processed movies; defaults to the input location.
    pub output: Option<PathBuf>,
    /// Wanted subtitle languages, most wanted first.
    pub languages: LanguagePreference,
    /// Descend into subdirectories.
    pub recurse: bool,
    /// Rename videos using the file template.
    pub rename: bool,
    /// Move each movie into its own folder.
    pub folders: bool,
    /// Skip videos that already have a subtitle next to them.
    pub only_new: bool,
    /// Write a `.nfo` sidecar from enrichment data.
    pub nfo: bool,
    /// Download cover images.
    pub covers: bool,
    /// Omit the language marker from subtitle filenames.
    pub no_language_in_filename: bool,
}

impl RunOptions {
    /// Options with every optional behaviour off.
    pub fn new(input: impl Into<PathBuf>, languages: LanguagePreference) -> Self {
        Self {
            input: input.into(),
            output: None,
            languages,
            recurse: true,
            rename: false,
            folders: false,
            only_new: false,
            nfo: false,
            covers: false,
            no_language_in_filename: false,
        }
    }

    /// Enrichment is needed for sidecars and covers.
    pub fn wants_enrichment(&self) -> bool {
        self.nfo || self.covers
    }

    /// Whether any optional organize step was requested.
    pub fn wants_organize(&self) -> bool {
        self.rename || self.folders || self.nfo || self.covers
    }

    /// Reject option combinations that cannot produce a sensible result.
    pub fn validate(&self) -> crate::Result<()> {
        if self.no_language_in_filename && self.languages.len() > 1 {
            return Err(crate::Error::InvalidOptions(
                "multiple languages are not supported with --no-language-in-filename".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub discovered: usize,
    /// Excluded because a subtitle was already present.
    pub skipped: usize,
    pub fingerprinted: usize,
    pub searched: usize,
    /// Searched but no candidate in any wanted language.
    pub no_match: usize,
    pub selected: usize,
    pub downloaded: usize,
    pub placed: usize,
    pub organized: usize,
    pub failed: usize,
}

/// Final state of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub original_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub stage: FileStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&VideoFile> for FileOutcome {
    fn from(file: &VideoFile) -> Self {
        Self {
            path: file.path.clone(),
            original_filename: file.original_filename.clone(),
            fingerprint: file.fingerprint.map(|f| f.hex()),
            stage: file.stage.clone(),
            subtitle_id: file.selected_subtitle().map(|s| s.id.clone()),
            subtitle_language: file.selected_language().map(|l| l.marker().to_string()),
            subtitle_path: file.subtitle_path.clone(),
            warnings: file.warnings.clone(),
        }
    }
}

/// Report of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub languages: String,
    pub counts: RunCounts,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    /// A run succeeds when no file failed.
    pub fn is_success(&self) -> bool {
        self.counts.failed == 0
    }
}
