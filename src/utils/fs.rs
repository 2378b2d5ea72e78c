//! File system utilities.

use crate::Result;
use std::path::{Path, PathBuf};

/// Move a file, never overwriting an existing destination.
///
/// Returns `Ok(false)` and leaves the source in place when `to` already exists.
pub fn move_file_no_clobber(from: &Path, to: &Path) -> Result<bool> {
    if from == to {
        return Ok(true);
    }
    if to.exists() {
        tracing::warn!("Destination exists, not moving: {}", to.display());
        return Ok(false);
    }

    if let Some(parent) = to.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    move_file(from, to)?;
    tracing::debug!("Moved: {:?} -> {:?}", from, to);
    Ok(true)
}

/// Move a file from one location to another.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    // Try rename first (fast, same filesystem)
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // Fall back to copy + delete (cross filesystem)
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}

/// Path of a sibling file of `path` with a different name.
pub fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file_no_clobber() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.avi");
        let b = dir.path().join("sub").join("b.avi");
        std::fs::write(&a, "a").unwrap();

        assert!(move_file_no_clobber(&a, &b).unwrap());
        assert!(!a.exists());
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "a");

        std::fs::write(&a, "new").unwrap();
        assert!(!move_file_no_clobber(&a, &b).unwrap());
        assert!(a.exists());
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "a");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Face/Off: Part 2?"), "Face_Off_ Part 2_");
        assert_eq!(sanitize_filename(" Heat "), "Heat");
    }

    #[test]
    fn test_sibling() {
        assert_eq!(
            sibling(Path::new("/movies/a.avi"), "a.en.srt"),
            PathBuf::from("/movies/a.en.srt")
        );
    }
}
