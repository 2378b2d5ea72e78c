//! Fetch command implementation.
//!
//! Resolves arguments into run options, drives one pipeline run against the
//! HTTP catalog and prints the outcome.

use crate::cli::args::FetchArgs;
use crate::core::pipeline::Run;
use crate::models::config::Config;
use crate::models::language::LanguagePreference;
use crate::models::media::FileStage;
use crate::models::run::{RunOptions, RunSummary};
use crate::services::HttpCatalog;
use crate::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Turn command line arguments into validated run options.
///
/// The path and language arguments may be given in either order.
pub fn resolve_options(args: &FetchArgs) -> Result<RunOptions> {
    let (path, languages) =
        if !Path::new(&args.path).exists() && Path::new(&args.languages).is_dir() {
            (&args.languages, &args.path)
        } else {
            (&args.path, &args.languages)
        };

    let mut options = RunOptions::new(PathBuf::from(path), LanguagePreference::parse(languages)?);
    options.output = args.output.clone();
    options.recurse = !args.no_subfolders;
    options.rename = args.rename;
    options.only_new = args.only_new;
    options.nfo = args.nfo;
    options.covers = args.covers;
    options.folders = args.folders;
    options.no_language_in_filename = args.no_language_in_filename;

    options.validate()?;
    Ok(options)
}

/// Execute the fetch command.
pub async fn fetch(args: &FetchArgs, config: Config) -> Result<RunSummary> {
    let options = resolve_options(args)?;

    println!("{}", "[FETCH] Looking for subtitles...".bold().cyan());
    println!("  {} {}", "Input:".bold(), options.input.display());
    println!("  {} {}", "Languages:".bold(), options.languages);
    println!();

    let catalog = HttpCatalog::new(config.catalog.clone())?;
    let mut run = Run::new(options, config, catalog)?;
    let summary = run.execute().await?;

    print_summary(&summary);

    if let Some(ref report) = args.report {
        save_report(&summary, report)?;
        println!("{} {}", "[OK] Report saved to:".bold().green(), report.display());
    }

    Ok(summary)
}

/// Print the run summary.
pub fn print_summary(summary: &RunSummary) {
    println!();
    for outcome in &summary.files {
        match outcome.stage {
            FileStage::Failed { stage, ref reason } => println!(
                "  {} {} ({}): {}",
                "[FAIL]".red(),
                outcome.path.display(),
                stage,
                reason
            ),
            ref stage if stage.is_placed() => println!(
                "  {} {}",
                "[OK]".green(),
                outcome
                    .subtitle_path
                    .as_deref()
                    .unwrap_or(outcome.path.as_path())
                    .display()
            ),
            _ => {}
        }
        for warning in &outcome.warnings {
            println!("    {} {}", "->".yellow(), warning);
        }
    }

    let c = &summary.counts;
    println!();
    println!("{}", "[Run Summary]".bold().green());
    println!("  {} {}", "Movies found:".bold(), c.discovered);
    println!("  {} {}", "Skipped (already subtitled):".bold(), c.skipped);
    println!("  {} {}", "No subtitle found:".bold(), c.no_match);
    println!("  {} {}", "Subtitles saved:".bold(), c.placed);
    println!("  {} {}", "Organized:".bold(), c.organized);
    println!("  {} {}", "Failed:".bold(), c.failed);
}

/// Save the run report to a JSON file.
pub fn save_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;

    tracing::info!("Report saved to {:?}", path);
    Ok(())
}
