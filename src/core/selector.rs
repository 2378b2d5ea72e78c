//! Subtitle selection.
//!
//! Languages are tried strictly in preference order. Within the first
//! language that has any candidate for the file's fingerprint, a candidate
//! indexed under the exact byte size wins; otherwise the catalog's own order
//! decides. A lower-preference language is never considered once a higher
//! one produced a candidate.

use crate::models::catalog::SubtitleCandidate;
use crate::models::language::LanguagePreference;
use crate::models::media::{Fingerprint, VideoFile};

/// Pick the best candidate for `fingerprint`, returning its index in `candidates`.
pub fn select_subtitle(
    fingerprint: &Fingerprint,
    candidates: &[SubtitleCandidate],
    preference: &LanguagePreference,
) -> Option<usize> {
    let hash = fingerprint.hex();

    for language in preference.iter() {
        let mut matching = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.language == language && c.movie_hash.eq_ignore_ascii_case(&hash))
            .peekable();

        let Some(&(first, _)) = matching.peek() else {
            continue;
        };

        let exact = matching
            .find(|(_, c)| c.movie_byte_size == fingerprint.size)
            .map(|(i, _)| i);

        return Some(exact.unwrap_or(first));
    }

    None
}

/// Run selection for one file and record the result on it.
///
/// Returns whether a subtitle was selected. Files without a fingerprint or
/// without results never get a selection.
pub fn select_for_file(file: &mut VideoFile, preference: &LanguagePreference) -> bool {
    let Some(fingerprint) = file.fingerprint else {
        return false;
    };

    match select_subtitle(&fingerprint, &file.search_results, preference) {
        Some(index) => file.set_selected(index),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;
    use std::path::PathBuf;

    const HASH: u64 = 0x8e245d9679d31e12;
    const SIZE: u64 = 734_058_496;

    fn fp() -> Fingerprint {
        Fingerprint { hash: HASH, size: SIZE }
    }

    fn candidate(id: &str, lang: &str, hash: u64, size: u64) -> SubtitleCandidate {
        let language = Language::lookup(lang).unwrap();
        SubtitleCandidate {
            id: id.to_string(),
            movie_hash: format!("{:016x}", hash),
            movie_byte_size: size,
            language,
            language_name: language.name().to_string(),
            movie_name: "Movie".to_string(),
            movie_year: Some(2001),
            imdb_id: Some("133093".to_string()),
            format: "srt".to_string(),
        }
    }

    fn prefs(seq: &str) -> LanguagePreference {
        LanguagePreference::parse(seq).unwrap()
    }

    #[test]
    fn test_higher_language_wins_over_exact_size() {
        let candidates = vec![
            candidate("en-exact", "en", HASH, SIZE),
            candidate("el-other", "el", HASH, SIZE + 1),
        ];
        let chosen = select_subtitle(&fp(), &candidates, &prefs("el,en"));
        assert_eq!(chosen, Some(1));
    }

    #[test]
    fn test_falls_back_to_next_language() {
        let candidates = vec![candidate("en", "en", HASH, SIZE)];
        assert_eq!(select_subtitle(&fp(), &candidates, &prefs("el,en")), Some(0));
    }

    #[test]
    fn test_exact_size_beats_catalog_rank() {
        let candidates = vec![
            candidate("ranked-first", "en", HASH, SIZE - 10),
            candidate("exact", "en", HASH, SIZE),
        ];
        assert_eq!(select_subtitle(&fp(), &candidates, &prefs("en")), Some(1));
    }

    #[test]
    fn test_catalog_rank_breaks_remaining_ties() {
        let candidates = vec![
            candidate("other-lang", "fr", HASH, SIZE),
            candidate("first", "en", HASH, SIZE),
            candidate("second", "en", HASH, SIZE),
        ];
        assert_eq!(select_subtitle(&fp(), &candidates, &prefs("en")), Some(1));

        let no_exact = vec![
            candidate("first", "en", HASH, 1),
            candidate("second", "en", HASH, 2),
        ];
        assert_eq!(select_subtitle(&fp(), &no_exact, &prefs("en")), Some(0));
    }

    #[test]
    fn test_ignores_other_fingerprints() {
        let candidates = vec![candidate("other-movie", "en", HASH + 1, SIZE)];
        assert_eq!(select_subtitle(&fp(), &candidates, &prefs("en")), None);
    }

    #[test]
    fn test_no_wanted_language_is_empty() {
        let candidates = vec![candidate("fr", "fr", HASH, SIZE)];
        assert_eq!(select_subtitle(&fp(), &candidates, &prefs("el,en")), None);
        assert_eq!(select_subtitle(&fp(), &[], &prefs("en")), None);
    }

    #[test]
    fn test_hash_comparison_ignores_case() {
        let mut c = candidate("upper", "en", HASH, SIZE);
        c.movie_hash = c.movie_hash.to_uppercase();
        assert_eq!(select_subtitle(&fp(), &[c], &prefs("en")), Some(0));
    }

    #[test]
    fn test_select_for_file_records_selection() {
        let mut file = VideoFile::new(PathBuf::from("/movies/movie.avi"), None);
        file.search_results = vec![candidate("x", "en", HASH, SIZE)];
        assert!(!select_for_file(&mut file, &prefs("en")));

        file.fingerprint = Some(fp());
        assert!(select_for_file(&mut file, &prefs("en")));
        assert_eq!(file.selected_subtitle().map(|s| s.id.as_str()), Some("x"));
    }
}
