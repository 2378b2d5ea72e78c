//! Library scanner module.
//!
//! Finds video files under a directory (or accepts a single file) and notes
//! any subtitle already lying next to each video.

use crate::models::config::Config;
use crate::models::language::Language;
use crate::models::media::VideoFile;
use crate::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Language recorded for a sibling subtitle that carries no language marker.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// Scan options.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recurse: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { recurse: true }
    }
}

/// Check if a path has one of the configured video extensions.
fn is_video_path(path: &Path, config: &Config) -> bool {
    path.extension()
        .map(|ext| config.is_video_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// Scan a directory or single video file.
///
/// Results are sorted by path so a fixed filesystem always yields the same
/// order. Unreadable entries are skipped with a warning.
pub fn scan(root: &Path, options: ScanOptions, config: &Config) -> Result<Vec<VideoFile>> {
    if root.is_file() {
        let existing = find_existing_subtitle(root, config);
        return Ok(vec![VideoFile::new(root.to_path_buf(), existing)]);
    }
    if !root.is_dir() {
        return Err(crate::Error::PathNotFound(root.display().to_string()));
    }

    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !options.recurse {
        walker = walker.max_depth(1);
    }

    let mut videos = Vec::new();
    let mut total_files_scanned = 0usize;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        total_files_scanned += 1;

        let entry_path = entry.path();
        if !is_video_path(entry_path, config) {
            continue;
        }

        let existing = find_existing_subtitle(entry_path, config);
        if let Some(ref lang) = existing {
            tracing::debug!("Existing {} subtitle for {}", lang, entry_path.display());
        }
        videos.push(VideoFile::new(entry_path.to_path_buf(), existing));
    }

    videos.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        "Scanned {} files: {} videos, {} already subtitled",
        total_files_scanned,
        videos.len(),
        videos.iter().filter(|v| v.existing_subtitle.is_some()).count()
    );

    Ok(videos)
}

/// Look next to `video` for `<stem>[.<marker>].<subtitle ext>`.
///
/// Returns the two-letter code of the first marked subtitle found, or
/// [`UNDETERMINED_LANGUAGE`] when only an unmarked one exists.
pub fn find_existing_subtitle(video: &Path, config: &Config) -> Option<String> {
    let stem = video.file_stem()?.to_string_lossy().to_string();
    let dir = video.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list {}: {}", dir.display(), e);
            return None;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    let mut unmarked = false;
    for name in names {
        let Some(marker) = subtitle_marker(&name, &stem, config) else {
            continue;
        };
        match marker {
            Some(lang) => return Some(lang.marker().to_string()),
            None => unmarked = true,
        }
    }

    unmarked.then(|| UNDETERMINED_LANGUAGE.to_string())
}

/// Classify `name` as a subtitle belonging to `stem`.
///
/// `None` if it is not such a subtitle, `Some(None)` if it is but carries no
/// recognised language marker, `Some(Some(lang))` otherwise.
fn subtitle_marker(name: &str, stem: &str, config: &Config) -> Option<Option<Language>> {
    let (base, ext) = name.rsplit_once('.')?;
    if !config.is_subtitle_extension(ext) {
        return None;
    }
    if base == stem {
        return Some(None);
    }
    let rest = base.strip_prefix(stem)?;
    if !rest.starts_with(['.', '_', '-', ' ']) {
        return None;
    }

    let marker = rest
        .split(['.', '_', '-', ' '])
        .filter(|part| !part.is_empty())
        .find_map(Language::lookup);
    Some(marker)
}
