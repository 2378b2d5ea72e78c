//! Command line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Subfetch - Find subtitles for your movies by content hash
#[derive(Parser, Debug)]
#[command(name = "subfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/subfetch/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find, download and place subtitles for a folder or a single movie
    Fetch(FetchArgs),

    /// Print the fingerprint of a video file
    Hash {
        /// Video file to fingerprint
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List supported language codes
    Languages,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Folder with movies, or a single movie file
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Language codes by preference, comma separated (e.g. "gr,en")
    #[arg(value_name = "LANGUAGES")]
    pub languages: String,

    /// Rename movies that got a subtitle using the file template
    #[arg(long)]
    pub rename: bool,

    /// Only look for movies that have no subtitle yet
    #[arg(long)]
    pub only_new: bool,

    /// Save movie details to a .nfo file named like the movie
    #[arg(long)]
    pub nfo: bool,

    /// Download cover images named like the movie
    #[arg(long)]
    pub covers: bool,

    /// Create a folder for each movie and move its files there
    #[arg(long)]
    pub folders: bool,

    /// Do not search subfolders for movies
    #[arg(long)]
    pub no_subfolders: bool,

    /// Move processed movies to this folder
    #[arg(long = "move", value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Do not add the language to subtitle filenames (single language only)
    #[arg(long)]
    pub no_language_in_filename: bool,

    /// Write a JSON report of the run
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "subfetch",
            "fetch",
            "/movies",
            "gr,en",
            "--rename",
            "--only-new",
            "--move",
            "/out",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.path, "/movies");
                assert_eq!(args.languages, "gr,en");
                assert!(args.rename);
                assert!(args.only_new);
                assert!(!args.folders);
                assert_eq!(args.output, Some(PathBuf::from("/out")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["subfetch", "languages", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Languages));
    }
}
