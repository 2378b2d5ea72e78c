//! Subfetch Library
//!
//! Finds subtitles for local video files by content hash, downloads them in
//! the preferred language, and optionally organizes the movie library.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
