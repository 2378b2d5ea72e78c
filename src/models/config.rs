//! Configuration model.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog configuration.
    pub catalog: CatalogConfig,
    /// Naming templates.
    pub templates: TemplateConfig,
    /// Extensions treated as videos.
    pub video_extensions: Vec<String>,
    /// Extensions treated as subtitles.
    pub subtitle_extensions: Vec<String>,
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// RPC endpoint.
    pub endpoint: String,
    /// User agent announced at login.
    pub user_agent: String,
    /// Account name; empty logs in anonymously.
    pub username: String,
    pub password: String,
    /// Interface language sent at login.
    pub language: String,
}

/// Templates for renaming files and creating movie folders.
///
/// Tokens: `{title}`, `{year}`, `{imdb}`, `{cd}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub file: String,
    pub folder: String,
    /// Suffix appended to renamed multi-disc files.
    pub cd: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            templates: TemplateConfig::default(),
            video_extensions: [
                "avi", "mkv", "mp4", "m4v", "mov", "wmv", "mpg", "mpeg", "divx", "xvid", "ogm",
                "rmvb", "ts", "m2ts", "webm",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            subtitle_extensions: ["srt", "sub", "ssa", "ass", "smi", "txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.opensubtitles.org/rpc".to_string(),
            user_agent: "subfetch".to_string(),
            username: String::new(),
            password: String::new(),
            language: "en".to_string(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            file: "{title} ({year})".to_string(),
            folder: "{title} ({year})".to_string(),
            cd: "-CD{cd}".to_string(),
        }
    }
}

impl Config {
    /// Whether `ext` (without dot) is a configured video extension.
    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.video_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Apply `SUBFETCH_CATALOG_URL`, `SUBFETCH_USERNAME` and `SUBFETCH_PASSWORD`
    /// on top of file or default values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("SUBFETCH_CATALOG_URL") {
            self.catalog.endpoint = endpoint;
        }
        if let Some(username) = lookup("SUBFETCH_USERNAME") {
            self.catalog.username = username;
        }
        if let Some(password) = lookup("SUBFETCH_PASSWORD") {
            self.catalog.password = password;
        }
    }

    /// Whether `ext` (without dot) is a configured subtitle extension.
    pub fn is_subtitle_extension(&self, ext: &str) -> bool {
        self.subtitle_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subfetch")
}

/// Load configuration from the default location, falling back to defaults.
/// Environment overrides win over both.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let mut config = if config_path.exists() {
        match read_config_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {}", config_path, e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    config.apply_env_overrides();
    config
}

/// Load configuration from an explicit file, then apply environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = read_config_file(path)?;
    config.apply_env_overrides();
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            video_extensions = ["avi"]

            [templates]
            file = "{title}"
            "#,
        )
        .unwrap();

        assert!(config.is_video_extension("AVI"));
        assert!(!config.is_video_extension("mkv"));
        assert_eq!(config.templates.file, "{title}");
        assert_eq!(config.templates.cd, "-CD{cd}");
        assert!(config.is_subtitle_extension("srt"));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config: Config = toml::from_str(
            r#"
            [catalog]
            endpoint = "http://from-file.invalid/rpc"
            username = "file-user"
            "#,
        )
        .unwrap();

        config.apply_overrides(|key| match key {
            "SUBFETCH_CATALOG_URL" => Some("http://from-env.invalid/rpc".to_string()),
            "SUBFETCH_PASSWORD" => Some("secret".to_string()),
            _ => None,
        });

        assert_eq!(config.catalog.endpoint, "http://from-env.invalid/rpc");
        assert_eq!(config.catalog.username, "file-user");
        assert_eq!(config.catalog.password, "secret");
        assert_eq!(config.catalog.user_agent, "subfetch");
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let result = load_config_from(Path::new("/nonexistent/subfetch.toml"));
        assert!(matches!(result, Err(crate::Error::PathNotFound(_))));
    }
}
