//! Languages command implementation.

use crate::models::language::LANGUAGES;
use colored::Colorize;

/// Print the supported language codes.
pub fn list_languages() {
    println!("{}", "Supported languages:".bold());
    println!();
    for lang in LANGUAGES {
        let aliases = if lang.aliases.is_empty() {
            String::new()
        } else {
            format!(" (also: {})", lang.aliases.join(", "))
        };
        println!("  {}  {}  {}{}", lang.two.cyan(), lang.three, lang.name, aliases.dimmed());
    }
}
