//! Placement and library organization steps.
//!
//! Every step works on one [`VideoFile`] and keeps its recorded paths in
//! sync with the filesystem. Moves never overwrite an existing file.

use crate::generators::filename::generate_subtitle_filename;
use crate::generators::nfo;
use crate::models::catalog::MovieDetails;
use crate::models::config::Config;
use crate::models::media::VideoFile;
use crate::utils::fs::{move_file_no_clobber, sibling};
use crate::Result;
use std::path::{Path, PathBuf};

/// Move the video into `output_dir`, keeping its file name.
///
/// Returns whether the video moved; an occupied destination leaves it in place.
pub fn relocate_video(file: &mut VideoFile, output_dir: &Path) -> Result<bool> {
    let Some(name) = file.path.file_name() else {
        return Err(crate::Error::other(format!("no file name: {}", file.path.display())));
    };
    let dest = output_dir.join(name);
    if dest == file.path {
        return Ok(false);
    }

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }

    if move_file_no_clobber(&file.path, &dest)? {
        file.path = dest;
        Ok(true)
    } else {
        file.warnings.push(format!(
            "{} already exists; video left at {}",
            dest.display(),
            file.path.display()
        ));
        Ok(false)
    }
}

/// Extension for a subtitle in catalog `format`.
///
/// Only configured subtitle extensions are used, so the scanner recognises
/// the file on the next run. Anything else is written as `srt`.
pub fn subtitle_extension<'a>(format: &'a str, config: &Config) -> &'a str {
    let safe = !format.is_empty() && !format.contains(['/', '\\', '.']);
    if safe && config.is_subtitle_extension(format) {
        format
    } else {
        "srt"
    }
}

/// Write the downloaded subtitle bytes, unchanged, beside the video.
///
/// The language marker is included unless `with_marker` is false. An existing
/// subtitle of the same name is replaced.
pub fn write_subtitle(file: &mut VideoFile, with_marker: bool, config: &Config) -> Result<PathBuf> {
    let (language, format) = match file.selected_subtitle() {
        Some(s) => (s.language, s.format.clone()),
        None => {
            return Err(crate::Error::other("no subtitle selected"));
        }
    };
    let bytes = file
        .subtitle_bytes
        .take()
        .ok_or_else(|| crate::Error::other("subtitle content missing"))?;

    let extension = subtitle_extension(&format, config);
    let name = generate_subtitle_filename(&file.stem(), with_marker.then_some(language), extension);
    let path = sibling(&file.path, &name);
    std::fs::write(&path, bytes)?;

    tracing::debug!("Saved subtitle: {:?}", path);
    file.subtitle_path = Some(path.clone());
    Ok(path)
}

/// Move the video and its subtitle into `<output_dir>/<folder_name>`.
pub fn move_into_folder(file: &mut VideoFile, output_dir: &Path, folder_name: &str) -> Result<PathBuf> {
    let folder = output_dir.join(folder_name);
    if file.path.parent() == Some(folder.as_path()) {
        return Ok(folder);
    }
    std::fs::create_dir_all(&folder)?;

    let new_video = folder.join(file.path.file_name().unwrap_or_default());
    move_or_fail(&file.path, &new_video)?;
    file.path = new_video;

    if let Some(subtitle) = file.subtitle_path.clone() {
        let new_subtitle = folder.join(subtitle.file_name().unwrap_or_default());
        move_or_fail(&subtitle, &new_subtitle)?;
        file.subtitle_path = Some(new_subtitle);
    }

    tracing::debug!("Moved into folder: {:?}", folder);
    Ok(folder)
}

/// Rename the video (and its subtitle) to `new_stem`, keeping extensions
/// and the subtitle's language marker.
pub fn rename_movie(file: &mut VideoFile, new_stem: &str) -> Result<()> {
    let old_stem = file.stem();
    if new_stem.is_empty() || new_stem == old_stem {
        return Ok(());
    }

    let new_name = match file.path.extension() {
        Some(ext) => format!("{}.{}", new_stem, ext.to_string_lossy()),
        None => new_stem.to_string(),
    };
    let new_video = sibling(&file.path, &new_name);
    move_or_fail(&file.path, &new_video)?;
    file.path = new_video;

    if let Some(subtitle) = file.subtitle_path.clone() {
        let sub_name = subtitle
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        // Subtitle names always start with the video stem.
        let suffix = sub_name.strip_prefix(old_stem.as_str()).unwrap_or(&sub_name);
        let new_subtitle = sibling(&subtitle, &format!("{}{}", new_stem, suffix));
        move_or_fail(&subtitle, &new_subtitle)?;
        file.subtitle_path = Some(new_subtitle);
    }

    tracing::debug!("Renamed to: {:?}", file.path);
    Ok(())
}

/// Write `<stem>.nfo` beside the video.
pub fn write_nfo(file: &VideoFile, details: &MovieDetails) -> Result<PathBuf> {
    let path = sibling(&file.path, &format!("{}.nfo", file.stem()));
    std::fs::write(&path, nfo::generate_movie_nfo(details))?;
    tracing::debug!("Created file: {:?}", path);
    Ok(path)
}

/// Save cover bytes as `<stem>.jpg`, `<original stem>.jpg` and, in folder
/// mode, `folder.jpg`.
pub fn save_cover(file: &VideoFile, bytes: &[u8], folder_mode: bool) -> Result<Vec<PathBuf>> {
    let mut names = vec![format!("{}.jpg", file.stem())];
    let original = format!("{}.jpg", file.original_stem());
    if !names.contains(&original) {
        names.push(original);
    }
    if folder_mode {
        names.push("folder.jpg".to_string());
    }

    let mut written = Vec::new();
    for name in names {
        let path = sibling(&file.path, &name);
        std::fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

fn move_or_fail(from: &Path, to: &Path) -> Result<()> {
    if move_file_no_clobber(from, to)? {
        Ok(())
    } else {
        Err(crate::Error::FileAlreadyExists(to.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::SubtitleCandidate;
    use crate::models::language::Language;
    use tempfile::TempDir;

    fn selected_file(path: PathBuf) -> VideoFile {
        let mut file = VideoFile::new(path, None);
        file.search_results.push(SubtitleCandidate {
            id: "42".to_string(),
            movie_hash: "0000000000000001".to_string(),
            movie_byte_size: 1,
            language: Language::lookup("en").unwrap(),
            language_name: "English".to_string(),
            movie_name: "Heat".to_string(),
            movie_year: Some(1995),
            imdb_id: None,
            format: "srt".to_string(),
        });
        file.set_selected(0);
        file.subtitle_bytes = Some(b"subtitle".to_vec());
        file
    }

    #[test]
    fn test_write_subtitle_with_and_without_marker() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("heat.avi");
        std::fs::write(&video, "v").unwrap();

        let mut file = selected_file(video.clone());
        let path = write_subtitle(&mut file, true, &Config::default()).unwrap();
        assert_eq!(path, dir.path().join("heat.en.srt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "subtitle");

        let mut file = selected_file(video);
        let path = write_subtitle(&mut file, false, &Config::default()).unwrap();
        assert_eq!(path, dir.path().join("heat.srt"));
    }

    #[test]
    fn test_subtitle_extension_limited_to_configured() {
        let config = Config::default();
        assert_eq!(subtitle_extension("sub", &config), "sub");
        assert_eq!(subtitle_extension("mpl", &config), "srt");
        assert_eq!(subtitle_extension("", &config), "srt");
        assert_eq!(subtitle_extension("../srt", &config), "srt");
        assert_eq!(subtitle_extension("s/rt", &config), "srt");
    }

    #[test]
    fn test_write_subtitle_unlisted_format_and_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("heat.avi");
        std::fs::write(&video, "v").unwrap();

        let raw = b"1\r\n00:00:01,000 --> 00:00:02,000\r\n\xc3\xe5\xe9\xe1\r\n".to_vec();
        let mut file = selected_file(video);
        file.search_results[0].format = "mpl".to_string();
        file.subtitle_bytes = Some(raw.clone());

        let path = write_subtitle(&mut file, true, &Config::default()).unwrap();
        assert_eq!(path, dir.path().join("heat.en.srt"));
        assert_eq!(std::fs::read(&path).unwrap(), raw);
    }

    #[test]
    fn test_relocate_skips_occupied_destination() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let video = src.path().join("heat.avi");
        std::fs::write(&video, "mine").unwrap();
        std::fs::write(out.path().join("heat.avi"), "theirs").unwrap();

        let mut file = selected_file(video.clone());
        assert!(!relocate_video(&mut file, out.path()).unwrap());
        assert_eq!(file.path, video);
        assert_eq!(file.warnings.len(), 1);
        assert_eq!(std::fs::read_to_string(out.path().join("heat.avi")).unwrap(), "theirs");
    }

    #[test]
    fn test_folder_then_rename() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("heat.cd1.avi");
        std::fs::write(&video, "v").unwrap();

        let mut file = selected_file(video);
        write_subtitle(&mut file, true, &Config::default()).unwrap();

        let folder = move_into_folder(&mut file, dir.path(), "Heat (1995)").unwrap();
        assert_eq!(folder, dir.path().join("Heat (1995)"));
        assert!(folder.join("heat.cd1.avi").exists());
        assert!(folder.join("heat.cd1.en.srt").exists());

        rename_movie(&mut file, "Heat (1995)-CD1").unwrap();
        assert_eq!(file.path, folder.join("Heat (1995)-CD1.avi"));
        assert_eq!(file.subtitle_path, Some(folder.join("Heat (1995)-CD1.en.srt")));
        assert!(file.path.exists());
        assert!(!folder.join("heat.cd1.avi").exists());
    }

    #[test]
    fn test_rename_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("heat.avi");
        std::fs::write(&video, "v").unwrap();
        std::fs::write(dir.path().join("Heat (1995).avi"), "other").unwrap();

        let mut file = selected_file(video.clone());
        let result = rename_movie(&mut file, "Heat (1995)");
        assert!(matches!(result, Err(crate::Error::FileAlreadyExists(_))));
        assert_eq!(file.path, video);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Heat (1995).avi")).unwrap(),
            "other"
        );
    }

    #[test]
    fn test_save_cover_names() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("heat.avi");
        std::fs::write(&video, "v").unwrap();
        let mut file = selected_file(video);
        rename_movie(&mut file, "Heat (1995)").unwrap();

        let written = save_cover(&file, b"jpg", true).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Heat (1995).jpg", "heat.jpg", "folder.jpg"]);
    }
}
