//! Filename generator.

use crate::models::catalog::SubtitleCandidate;
use crate::models::config::TemplateConfig;
use crate::models::language::Language;
use crate::utils::fs::sanitize_filename;
use regex::Regex;
use std::sync::OnceLock;

/// Values available to naming templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    pub title: String,
    pub year: Option<u16>,
    pub imdb_id: Option<String>,
    pub cd: Option<u32>,
}

impl TemplateFields {
    /// Fields describing the movie a subtitle was indexed under.
    pub fn from_candidate(candidate: &SubtitleCandidate) -> Self {
        Self {
            title: candidate.movie_name.trim().trim_matches('"').to_string(),
            year: candidate.movie_year,
            imdb_id: candidate.imdb_id.clone(),
            cd: None,
        }
    }
}

/// Extract the disc number from a filename.
///
/// Detects patterns like: cd1, cd2, disc1, part2, dvd1, disk1.
pub fn extract_disc_number(filename: &str) -> Option<u32> {
    static DISC: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DISC
        .get_or_init(|| Regex::new(r"(?i)(?:^|[_\s\-\.\[\(])(?:cd|disc|disk|part|dvd)\s?(\d{1,2})(?:[_\s\-\.\]\)]|$)").ok())
        .as_ref()?;

    re.captures(filename)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Substitute template tokens, sanitizing each value for the filesystem.
///
/// Missing values leave no trace: empty brackets and doubled spaces are removed.
pub fn render_template(template: &str, fields: &TemplateFields) -> String {
    let year = fields.year.map(|y| y.to_string()).unwrap_or_default();
    let imdb = fields
        .imdb_id
        .as_deref()
        .map(|id| format!("tt{:0>7}", id.trim_start_matches("tt")))
        .unwrap_or_default();
    let cd = fields.cd.map(|n| n.to_string()).unwrap_or_default();

    let rendered = template
        .replace("{title}", &sanitize_filename(&fields.title))
        .replace("{year}", &year)
        .replace("{imdb}", &imdb)
        .replace("{cd}", &cd);

    let cleaned = rendered.replace("()", "").replace("[]", "");
    let collapsed: Vec<&str> = cleaned.split_whitespace().collect();
    collapsed
        .join(" ")
        .trim_matches(|c: char| c == '-' || c == '.' || c == '_' || c.is_whitespace())
        .to_string()
}

/// New file stem for a renamed video, with a CD suffix for multi-disc files.
pub fn generate_movie_stem(
    templates: &TemplateConfig,
    fields: &TemplateFields,
    original_filename: &str,
) -> String {
    let mut stem = render_template(&templates.file, fields);

    if let Some(disc) = extract_disc_number(original_filename) {
        tracing::debug!("Disc {} detected in {}", disc, original_filename);
        stem.push_str(&sanitize_filename(&templates.cd.replace("{cd}", &disc.to_string())));
    }

    stem
}

/// Subtitle filename next to a video stem.
///
/// `<stem>.<marker>.<ext>`, or `<stem>.<ext>` when the marker is omitted.
pub fn generate_subtitle_filename(stem: &str, language: Option<Language>, extension: &str) -> String {
    let extension = if extension.is_empty() { "srt" } else { extension };
    match language {
        Some(lang) => format!("{}.{}.{}", stem, lang.marker(), extension),
        None => format!("{}.{}", stem, extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TemplateFields {
        TemplateFields {
            title: "Amélie".to_string(),
            year: Some(2001),
            imdb_id: Some("211915".to_string()),
            cd: None,
        }
    }

    #[test]
    fn test_extract_disc_number() {
        assert_eq!(extract_disc_number("movie-cd1.avi"), Some(1));
        assert_eq!(extract_disc_number("movie.CD2.avi"), Some(2));
        assert_eq!(extract_disc_number("movie_part1.mkv"), Some(1));
        assert_eq!(extract_disc_number("movie part 2.mkv"), Some(2));
        assert_eq!(extract_disc_number("movie.disc1.avi"), Some(1));
        assert_eq!(extract_disc_number("movie-dvd1.mkv"), Some(1));
        assert_eq!(extract_disc_number("Movie [CD2].avi"), Some(2));

        assert_eq!(extract_disc_number("movie.mkv"), None);
        assert_eq!(extract_disc_number("movie-2024.avi"), None);
        assert_eq!(extract_disc_number("partisan.avi"), None);
    }

    #[test]
    fn test_render_template() {
        assert_eq!(render_template("{title} ({year})", &fields()), "Amélie (2001)");
        assert_eq!(
            render_template("{title} [{imdb}]", &fields()),
            "Amélie [tt0211915]"
        );

        let no_year = TemplateFields { year: None, ..fields() };
        assert_eq!(render_template("{title} ({year})", &no_year), "Amélie");
    }

    #[test]
    fn test_render_template_sanitizes_title() {
        let f = TemplateFields {
            title: "Face/Off".to_string(),
            ..fields()
        };
        assert_eq!(render_template("{title}", &f), "Face_Off");
    }

    #[test]
    fn test_generate_movie_stem_with_disc() {
        let templates = TemplateConfig::default();
        assert_eq!(
            generate_movie_stem(&templates, &fields(), "amelie.cd2.avi"),
            "Amélie (2001)-CD2"
        );
        assert_eq!(
            generate_movie_stem(&templates, &fields(), "amelie.avi"),
            "Amélie (2001)"
        );
    }

    #[test]
    fn test_generate_subtitle_filename() {
        let el = Language::lookup("gr");
        assert_eq!(generate_subtitle_filename("movie", el, "srt"), "movie.el.srt");
        assert_eq!(generate_subtitle_filename("movie", None, "sub"), "movie.sub");
        assert_eq!(generate_subtitle_filename("movie", None, ""), "movie.srt");
    }
}
