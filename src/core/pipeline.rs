//! Per-run processing pipeline.
//!
//! Stages, in order:
//! - scan: discover videos and existing subtitles
//! - fingerprint: hash each video (skipping already subtitled ones in only-new mode)
//! - search: one batched catalog query for every file and language
//! - select: choose at most one subtitle per file
//! - download: one batched download for every selection
//! - place: write subtitles beside the (possibly relocated) videos
//! - organize: optional folders, renaming, sidecars and covers
//!
//! A failure is recorded on the file it belongs to and the batch moves on.
//! Only a missing input root or a failed login aborts the run.

use crate::core::fingerprint::compute_fingerprint;
use crate::core::organizer;
use crate::core::scanner::{self, ScanOptions};
use crate::core::selector::select_for_file;
use crate::generators::filename::{generate_movie_stem, TemplateFields};
use crate::generators::folder::generate_movie_folder;
use crate::models::catalog::SearchRequest;
use crate::models::config::Config;
use crate::models::media::{FileStage, Stage, VideoFile};
use crate::models::run::{FileOutcome, RunCounts, RunOptions, RunSummary};
use crate::services::CatalogSession;
use crate::utils::codec::decode_payload;
use crate::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// State of one invocation: options, resolved paths, the catalog session
/// and every discovered file.
pub struct Run<C: CatalogSession> {
    id: Uuid,
    started_at: DateTime<Utc>,
    options: RunOptions,
    config: Config,
    input_path: PathBuf,
    output_path: PathBuf,
    /// Whether videos must be moved to `output_path` before placement.
    relocate: bool,
    catalog: C,
    token: Option<String>,
    files: Vec<VideoFile>,
    counts: RunCounts,
}

impl<C: CatalogSession> Run<C> {
    /// Validate options and resolve paths. No network or filesystem changes happen here.
    pub fn new(options: RunOptions, config: Config, catalog: C) -> Result<Self> {
        options.validate()?;

        if !options.input.exists() {
            return Err(crate::Error::PathNotFound(options.input.display().to_string()));
        }
        let input_path = std::fs::canonicalize(&options.input)?;

        let default_output = if input_path.is_file() {
            input_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            input_path.clone()
        };

        let output_path = match options.output {
            Some(ref out) if out.is_absolute() => out.clone(),
            Some(ref out) => std::env::current_dir()?.join(out),
            None => default_output.clone(),
        };
        let relocate = output_path != default_output;

        Ok(Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            options,
            config,
            input_path,
            output_path,
            relocate,
            catalog,
            token: None,
            files: Vec::new(),
            counts: RunCounts::default(),
        })
    }

    pub fn files(&self) -> &[VideoFile] {
        &self.files
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run every stage, then close the catalog session whatever happened.
    pub async fn execute(&mut self) -> Result<RunSummary> {
        tracing::info!("Run {} started for {}", self.id, self.input_path.display());

        let result = self.run_stages().await;
        self.close_session().await;
        result?;

        let summary = self.summary();
        tracing::info!(
            "Run {} finished: {} placed, {} failed",
            self.id,
            summary.counts.placed,
            summary.counts.failed
        );
        Ok(summary)
    }

    async fn run_stages(&mut self) -> Result<()> {
        self.scan()?;
        self.fingerprint();

        if !self.search().await? {
            return Ok(());
        }
        self.select();
        self.download().await;

        if self.options.wants_enrichment() {
            self.enrich().await;
        }
        self.place();

        if self.options.wants_organize() {
            self.organize().await;
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<()> {
        println!("{}", "[SCAN] Searching for movie files...".bold().cyan());

        let scan_options = ScanOptions {
            recurse: self.options.recurse,
        };
        self.files = scanner::scan(&self.input_path, scan_options, &self.config)?;
        self.counts.discovered = self.files.len();

        println!("  Found {} movie files", self.files.len());
        Ok(())
    }

    fn fingerprint(&mut self) {
        let pb = ProgressBar::new(self.files.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }

        for file in &mut self.files {
            pb.inc(1);

            if self.options.only_new && file.existing_subtitle.is_some() {
                tracing::debug!("Already subtitled, skipping: {}", file.path.display());
                self.counts.skipped += 1;
                continue;
            }

            pb.set_message(file.original_filename.clone());
            match compute_fingerprint(&file.path) {
                Ok(fp) => {
                    tracing::debug!("{} -> {} ({} bytes)", file.path.display(), fp.hex(), fp.size);
                    file.fingerprint = Some(fp);
                    file.stage = FileStage::Fingerprinted;
                    self.counts.fingerprinted += 1;
                }
                Err(e) => file.fail(Stage::Fingerprint, e),
            }
        }

        pb.finish_and_clear();
    }

    /// One search request per fingerprinted file and wanted language.
    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.files
            .iter()
            .filter(|f| f.stage == FileStage::Fingerprinted)
            .filter_map(|f| f.fingerprint)
            .flat_map(|fp| {
                self.options.languages.iter().map(move |language| SearchRequest {
                    movie_hash: fp.hex(),
                    movie_byte_size: fp.size,
                    language,
                })
            })
            .collect()
    }

    /// Log in and run the batched search. Returns false when there was
    /// nothing to search for.
    async fn search(&mut self) -> Result<bool> {
        let requests = self.search_requests();
        if requests.is_empty() {
            println!("  No movies need subtitles");
            return Ok(false);
        }

        println!("{}", "[SEARCH] Searching for subtitles...".bold().cyan());
        let token = self.open_session().await?;

        let results = match self.catalog.search(&token, &requests).await {
            Ok(results) => results,
            Err(e) => {
                for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Fingerprinted) {
                    file.fail(Stage::Search, &e);
                }
                return Ok(true);
            }
        };
        tracing::info!("Catalog returned {} candidates for {} requests", results.len(), requests.len());

        for candidate in results {
            let mut matched = false;
            for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Fingerprinted) {
                let Some(fp) = file.fingerprint else { continue };
                if candidate.movie_hash.eq_ignore_ascii_case(&fp.hex()) {
                    file.search_results.push(candidate.clone());
                    matched = true;
                }
            }
            if !matched {
                let err = crate::Error::Correlation(format!(
                    "subtitle {} for unknown movie hash {}",
                    candidate.id, candidate.movie_hash
                ));
                tracing::warn!("{}", err);
            }
        }

        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Fingerprinted) {
            file.stage = FileStage::Searched;
            self.counts.searched += 1;
        }
        Ok(true)
    }

    fn select(&mut self) {
        println!("{}", "[SELECT] Found subtitles:".bold().cyan());

        let languages = &self.options.languages;
        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Searched) {
            if select_for_file(file, languages) {
                if let Some(s) = file.selected_subtitle() {
                    println!("  {} - {}", s.movie_name, s.language_name);
                }
                file.stage = FileStage::Selected;
                self.counts.selected += 1;
            } else {
                tracing::info!("No subtitle in {} for {}", languages, file.path.display());
                self.counts.no_match += 1;
            }
        }
    }

    async fn download(&mut self) {
        let mut ids: Vec<String> = Vec::new();
        for file in self.files.iter().filter(|f| f.stage == FileStage::Selected) {
            if let Some(s) = file.selected_subtitle() {
                if !ids.contains(&s.id) {
                    ids.push(s.id.clone());
                }
            }
        }
        if ids.is_empty() {
            return;
        }

        println!("{}", "[DOWNLOAD] Downloading subtitles...".bold().cyan());
        let Some(token) = self.token.clone() else {
            return;
        };

        let downloads = match self.catalog.download(&token, &ids).await {
            Ok(downloads) => downloads,
            Err(e) => {
                for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Selected) {
                    file.fail(Stage::Download, &e);
                }
                return;
            }
        };

        let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut payloads: HashMap<&str, &str> = HashMap::new();
        for d in &downloads {
            if requested.contains(d.id.as_str()) {
                payloads.insert(d.id.as_str(), d.payload.as_str());
            } else {
                tracing::warn!(
                    "{}",
                    crate::Error::Correlation(format!("unrequested subtitle {} in download", d.id))
                );
            }
        }

        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Selected) {
            let Some(id) = file.selected_subtitle().map(|s| s.id.clone()) else {
                continue;
            };
            let Some(payload) = payloads.get(id.as_str()) else {
                file.fail(
                    Stage::Download,
                    crate::Error::Correlation(format!("subtitle {} missing from download", id)),
                );
                continue;
            };

            match decode_payload(payload) {
                Ok(bytes) => {
                    file.subtitle_bytes = Some(bytes);
                    file.stage = FileStage::Downloaded;
                    self.counts.downloaded += 1;
                }
                Err(e) => file.fail(Stage::Download, e),
            }
        }
    }

    /// One enrichment call per downloaded file. Failures only produce warnings.
    async fn enrich(&mut self) {
        println!("{}", "[ENRICH] Fetching movie details...".bold().cyan());
        let Some(token) = self.token.clone() else {
            return;
        };

        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Downloaded) {
            let Some(imdb_id) = file.selected_subtitle().and_then(|s| s.imdb_id.clone()) else {
                file.warnings.push("no imdb id for movie details".to_string());
                continue;
            };

            match self.catalog.movie_details(&token, &imdb_id).await {
                Ok(details) => file.enrichment = Some(details),
                Err(e) => {
                    tracing::warn!("Movie details failed for {}: {}", file.path.display(), e);
                    file.warnings.push(format!("movie details: {}", e));
                }
            }
        }
    }

    fn place(&mut self) {
        println!("{}", "[SAVE] Saving subtitles...".bold().cyan());

        let with_marker = !self.options.no_language_in_filename;
        let output = self.relocate.then_some(self.output_path.as_path());
        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Downloaded) {
            match place_file(file, output, with_marker, &self.config) {
                Ok(path) => {
                    tracing::info!("Saved {}", path.display());
                    file.stage = FileStage::Placed;
                    self.counts.placed += 1;
                }
                Err(e) => file.fail(Stage::Place, e),
            }
        }
    }

    async fn organize(&mut self) {
        println!("{}", "[ORGANIZE] Organizing movies...".bold().cyan());
        let templates = self.config.templates.clone();

        for file in self.files.iter_mut().filter(|f| f.stage == FileStage::Placed) {
            let Some(candidate) = file.selected_subtitle() else {
                continue;
            };
            let mut fields = TemplateFields::from_candidate(candidate);
            if let Some(ref details) = file.enrichment {
                if fields.year.is_none() {
                    fields.year = details.year;
                }
                if fields.title.is_empty() {
                    fields.title = details.title.clone();
                }
            }

            let mut step_errors: Vec<String> = Vec::new();

            if self.options.folders {
                let folder = generate_movie_folder(&templates, &fields, &file.original_stem());
                if let Err(e) = organizer::move_into_folder(file, &self.output_path, &folder) {
                    step_errors.push(format!("folder: {}", e));
                }
            }

            if self.options.rename {
                let stem = generate_movie_stem(&templates, &fields, &file.original_filename);
                if let Err(e) = organizer::rename_movie(file, &stem) {
                    step_errors.push(format!("rename: {}", e));
                }
            }

            if self.options.nfo {
                match file.enrichment {
                    Some(ref details) => {
                        if let Err(e) = organizer::write_nfo(file, details) {
                            step_errors.push(format!("nfo: {}", e));
                        }
                    }
                    None => step_errors.push("nfo: no movie details".to_string()),
                }
            }

            if self.options.covers {
                let cover_url = file.enrichment.as_ref().and_then(|d| d.cover_url.clone());
                match cover_url {
                    Some(url) => match self.catalog.fetch_cover(&url).await {
                        Ok(bytes) => {
                            if let Err(e) = organizer::save_cover(file, &bytes, self.options.folders) {
                                step_errors.push(format!("cover: {}", e));
                            }
                        }
                        Err(e) => step_errors.push(format!("cover: {}", e)),
                    },
                    None => tracing::debug!("No cover for {}", file.path.display()),
                }
            }

            if step_errors.is_empty() {
                file.stage = FileStage::Organized;
                self.counts.organized += 1;
            } else {
                for err in &step_errors {
                    tracing::warn!("[{}] {}: {}", Stage::Organize, file.path.display(), err);
                }
                file.warnings.extend(step_errors);
            }
        }
    }

    async fn open_session(&mut self) -> Result<String> {
        if let Some(ref token) = self.token {
            return Ok(token.clone());
        }
        println!("{}", "[CONNECT] Connecting...".bold().cyan());
        let token = self.catalog.login().await.map_err(|e| {
            tracing::error!("Catalog login failed: {}", e);
            e
        })?;
        self.token = Some(token.clone());
        Ok(token)
    }

    async fn close_session(&mut self) {
        if let Some(token) = self.token.take() {
            println!("{}", "[DISCONNECT] Disconnecting...".bold().cyan());
            if let Err(e) = self.catalog.logout(&token).await {
                tracing::warn!("Catalog logout failed: {}", e);
            }
        }
    }

    /// Snapshot of counts and per-file outcomes.
    pub fn summary(&self) -> RunSummary {
        let mut counts = self.counts.clone();
        counts.failed = self.files.iter().filter(|f| f.is_failed()).count();

        RunSummary {
            run_id: self.id.to_string(),
            started_at: self.started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            languages: self.options.languages.to_string(),
            counts,
            files: self.files.iter().map(FileOutcome::from).collect(),
        }
    }
}

/// Relocate the video if an output directory is given, then write its subtitle.
fn place_file(
    file: &mut VideoFile,
    output: Option<&Path>,
    with_marker: bool,
    config: &Config,
) -> Result<PathBuf> {
    if let Some(dir) = output {
        organizer::relocate_video(file, dir)?;
    }
    organizer::write_subtitle(file, with_marker, config)
}
