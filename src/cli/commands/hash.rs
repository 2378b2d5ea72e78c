//! Hash command implementation.

use crate::core::fingerprint::compute_fingerprint;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Print the fingerprint and size of a video file.
pub fn hash(file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(crate::Error::PathNotFound(file.display().to_string()));
    }

    let fp = compute_fingerprint(file)?;
    println!("{}  {}", fp.hex().bold(), file.display());
    println!("  {} {}", "Size:".bold(), fp.size);
    Ok(())
}
