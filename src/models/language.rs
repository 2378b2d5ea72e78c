//! Language codes and the caller's language preference.
//!
//! The catalog speaks three-letter ids while users and subtitle filenames use
//! two-letter codes. Both are folded into a single [`Language`] handle here,
//! so everything downstream compares one representation.

use crate::Result;
use serde::{Serialize, Serializer};

/// One row of the language table.
#[derive(Debug, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Two-letter code, also used as the marker in subtitle filenames.
    pub two: &'static str,
    /// Catalog language id.
    pub three: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Extra spellings accepted on input.
    pub aliases: &'static [&'static str],
}

/// Languages the catalog knows about.
pub static LANGUAGES: &[LanguageEntry] = &[
    LanguageEntry { two: "sq", three: "alb", name: "Albanian", aliases: &["sqi"] },
    LanguageEntry { two: "ar", three: "ara", name: "Arabic", aliases: &[] },
    LanguageEntry { two: "hy", three: "arm", name: "Armenian", aliases: &["hye"] },
    LanguageEntry { two: "eu", three: "baq", name: "Basque", aliases: &["eus"] },
    LanguageEntry { two: "bn", three: "ben", name: "Bengali", aliases: &[] },
    LanguageEntry { two: "bs", three: "bos", name: "Bosnian", aliases: &[] },
    LanguageEntry { two: "pb", three: "pob", name: "Portuguese (Brazil)", aliases: &["br"] },
    LanguageEntry { two: "bg", three: "bul", name: "Bulgarian", aliases: &[] },
    LanguageEntry { two: "ca", three: "cat", name: "Catalan", aliases: &[] },
    LanguageEntry { two: "zh", three: "chi", name: "Chinese", aliases: &["zho", "cn"] },
    LanguageEntry { two: "hr", three: "hrv", name: "Croatian", aliases: &["scr"] },
    LanguageEntry { two: "cs", three: "cze", name: "Czech", aliases: &["ces", "cz"] },
    LanguageEntry { two: "da", three: "dan", name: "Danish", aliases: &["dk"] },
    LanguageEntry { two: "nl", three: "dut", name: "Dutch", aliases: &["nld"] },
    LanguageEntry { two: "en", three: "eng", name: "English", aliases: &[] },
    LanguageEntry { two: "eo", three: "epo", name: "Esperanto", aliases: &[] },
    LanguageEntry { two: "et", three: "est", name: "Estonian", aliases: &[] },
    LanguageEntry { two: "fa", three: "per", name: "Persian", aliases: &["fas"] },
    LanguageEntry { two: "fi", three: "fin", name: "Finnish", aliases: &[] },
    LanguageEntry { two: "fr", three: "fre", name: "French", aliases: &["fra"] },
    LanguageEntry { two: "gl", three: "glg", name: "Galician", aliases: &[] },
    LanguageEntry { two: "ka", three: "geo", name: "Georgian", aliases: &["kat"] },
    LanguageEntry { two: "de", three: "ger", name: "German", aliases: &["deu"] },
    LanguageEntry { two: "el", three: "gre", name: "Greek", aliases: &["ell", "gr"] },
    LanguageEntry { two: "he", three: "heb", name: "Hebrew", aliases: &[] },
    LanguageEntry { two: "hi", three: "hin", name: "Hindi", aliases: &[] },
    LanguageEntry { two: "hu", three: "hun", name: "Hungarian", aliases: &[] },
    LanguageEntry { two: "is", three: "ice", name: "Icelandic", aliases: &["isl"] },
    LanguageEntry { two: "id", three: "ind", name: "Indonesian", aliases: &[] },
    LanguageEntry { two: "it", three: "ita", name: "Italian", aliases: &[] },
    LanguageEntry { two: "ja", three: "jpn", name: "Japanese", aliases: &["jp"] },
    LanguageEntry { two: "kk", three: "kaz", name: "Kazakh", aliases: &[] },
    LanguageEntry { two: "ko", three: "kor", name: "Korean", aliases: &["kr"] },
    LanguageEntry { two: "lv", three: "lav", name: "Latvian", aliases: &[] },
    LanguageEntry { two: "lt", three: "lit", name: "Lithuanian", aliases: &[] },
    LanguageEntry { two: "lb", three: "ltz", name: "Luxembourgish", aliases: &[] },
    LanguageEntry { two: "mk", three: "mac", name: "Macedonian", aliases: &["mkd"] },
    LanguageEntry { two: "ms", three: "may", name: "Malay", aliases: &["msa"] },
    LanguageEntry { two: "no", three: "nor", name: "Norwegian", aliases: &["nb"] },
    LanguageEntry { two: "oc", three: "oci", name: "Occitan", aliases: &[] },
    LanguageEntry { two: "pl", three: "pol", name: "Polish", aliases: &[] },
    LanguageEntry { two: "pt", three: "por", name: "Portuguese", aliases: &[] },
    LanguageEntry { two: "ro", three: "rum", name: "Romanian", aliases: &["ron"] },
    LanguageEntry { two: "ru", three: "rus", name: "Russian", aliases: &[] },
    LanguageEntry { two: "sr", three: "scc", name: "Serbian", aliases: &["srp"] },
    LanguageEntry { two: "si", three: "sin", name: "Sinhalese", aliases: &[] },
    LanguageEntry { two: "sk", three: "slo", name: "Slovak", aliases: &["slk"] },
    LanguageEntry { two: "sl", three: "slv", name: "Slovenian", aliases: &[] },
    LanguageEntry { two: "es", three: "spa", name: "Spanish", aliases: &["sp"] },
    LanguageEntry { two: "sw", three: "swa", name: "Swahili", aliases: &[] },
    LanguageEntry { two: "sv", three: "swe", name: "Swedish", aliases: &["se"] },
    LanguageEntry { two: "tl", three: "tgl", name: "Tagalog", aliases: &[] },
    LanguageEntry { two: "th", three: "tha", name: "Thai", aliases: &[] },
    LanguageEntry { two: "tr", three: "tur", name: "Turkish", aliases: &[] },
    LanguageEntry { two: "uk", three: "ukr", name: "Ukrainian", aliases: &["ua"] },
    LanguageEntry { two: "ur", three: "urd", name: "Urdu", aliases: &[] },
    LanguageEntry { two: "vi", three: "vie", name: "Vietnamese", aliases: &[] },
];

/// Canonical language handle. Cheap to copy and compare.
#[derive(Clone, Copy)]
pub struct Language(&'static LanguageEntry);

impl Language {
    /// Look up a language by two-letter code, catalog id, or alias.
    pub fn lookup(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return None;
        }
        LANGUAGES
            .iter()
            .find(|l| l.two == code || l.three == code || l.aliases.contains(&code.as_str()))
            .map(Language)
    }

    /// Two-letter code used as the filename marker.
    pub fn marker(&self) -> &'static str {
        self.0.two
    }

    /// Catalog language id.
    pub fn catalog_id(&self) -> &'static str {
        self.0.three
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

}

// Catalog ids are unique across the table.
impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.0.three == other.0.three
    }
}

impl Eq for Language {}

impl std::fmt::Debug for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Language({})", self.0.two)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.two)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.two)
    }
}

/// Ordered, de-duplicated list of wanted languages. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    languages: Vec<Language>,
}

impl LanguagePreference {
    /// Parse a comma-separated code list such as `"gr,en"`.
    ///
    /// Unknown codes are dropped with a warning; an empty result is an error.
    pub fn parse(sequence: &str) -> Result<Self> {
        let mut languages: Vec<Language> = Vec::new();

        for code in sequence.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            match Language::lookup(code) {
                Some(lang) if !languages.contains(&lang) => languages.push(lang),
                Some(_) => {}
                None => tracing::warn!("Ignoring unknown language code: {}", code),
            }
        }

        if languages.is_empty() {
            return Err(crate::Error::UnknownLanguage(sequence.to_string()));
        }

        Ok(Self { languages })
    }

    /// Languages, most wanted first.
    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn primary(&self) -> Language {
        self.languages[0]
    }
}

impl std::fmt::Display for LanguagePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<&str> = self.languages.iter().map(|l| l.marker()).collect();
        write!(f, "{}", codes.join(","))
    }
}
