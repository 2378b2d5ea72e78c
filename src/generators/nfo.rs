//! NFO file generator (Kodi compatible).

use crate::models::catalog::MovieDetails;

/// Generate movie NFO content from an enrichment record.
pub fn generate_movie_nfo(movie: &MovieDetails) -> String {
    let mut nfo = String::new();

    nfo.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    nfo.push_str("<movie>\n");

    nfo.push_str(&format!("  <title>{}</title>\n", escape_xml(&movie.title)));

    if let Some(ref tagline) = movie.tagline {
        if !tagline.is_empty() {
            nfo.push_str(&format!("  <tagline>{}</tagline>\n", escape_xml(tagline)));
        }
    }

    if let Some(year) = movie.year {
        nfo.push_str(&format!("  <year>{}</year>\n", year));
    }

    if let Some(ref runtime) = movie.runtime {
        // Catalog runtimes look like "122 min"
        let minutes: String = runtime.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !minutes.is_empty() {
            nfo.push_str(&format!("  <runtime>{}</runtime>\n", minutes));
        }
    }

    if let Some(rating) = movie.rating {
        nfo.push_str("  <ratings>\n");
        nfo.push_str("    <rating name=\"imdb\" max=\"10\" default=\"true\">\n");
        nfo.push_str(&format!("      <value>{:.1}</value>\n", rating));
        nfo.push_str("    </rating>\n");
        nfo.push_str("  </ratings>\n");
    }

    if !movie.imdb_id.is_empty() {
        nfo.push_str(&format!(
            "  <uniqueid type=\"imdb\" default=\"true\">tt{:0>7}</uniqueid>\n",
            escape_xml(movie.imdb_id.trim_start_matches("tt"))
        ));
    }

    if let Some(ref plot) = movie.plot {
        nfo.push_str(&format!("  <plot>{}</plot>\n", escape_xml(plot)));
    }

    for genre in &movie.genres {
        nfo.push_str(&format!("  <genre>{}</genre>\n", escape_xml(genre)));
    }

    for country in &movie.countries {
        nfo.push_str(&format!("  <country>{}</country>\n", escape_xml(country)));
    }

    for writer in &movie.writers {
        nfo.push_str(&format!("  <credits>{}</credits>\n", escape_xml(writer)));
    }

    for director in &movie.directors {
        nfo.push_str(&format!("  <director>{}</director>\n", escape_xml(director)));
    }

    for (i, actor) in movie.cast.iter().enumerate() {
        nfo.push_str("  <actor>\n");
        nfo.push_str(&format!("    <name>{}</name>\n", escape_xml(actor)));
        nfo.push_str(&format!("    <order>{}</order>\n", i));
        nfo.push_str("  </actor>\n");
    }

    if let Some(ref cover) = movie.cover_url {
        nfo.push_str(&format!("  <thumb aspect=\"poster\">{}</thumb>\n", escape_xml(cover)));
    }

    nfo.push_str("</movie>\n");
    nfo
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_movie_nfo() {
        let movie = MovieDetails {
            imdb_id: "133093".to_string(),
            title: "The Matrix".to_string(),
            year: Some(1999),
            rating: Some(8.7),
            runtime: Some("136 min".to_string()),
            directors: vec!["Lana Wachowski".to_string()],
            cast: vec!["Keanu Reeves".to_string(), "Carrie-Anne Moss".to_string()],
            cover_url: Some("http://img.example/matrix.jpg".to_string()),
            ..Default::default()
        };

        let nfo = generate_movie_nfo(&movie);
        assert!(nfo.contains("<title>The Matrix</title>"));
        assert!(nfo.contains("<year>1999</year>"));
        assert!(nfo.contains("<runtime>136</runtime>"));
        assert!(nfo.contains("<value>8.7</value>"));
        assert!(nfo.contains(">tt0133093</uniqueid>"));
        assert!(nfo.contains("<order>1</order>"));
        assert!(nfo.trim_end().ends_with("</movie>"));
    }

    #[test]
    fn test_escape_xml() {
        let movie = MovieDetails {
            title: "Tom & Jerry <3".to_string(),
            ..Default::default()
        };
        let nfo = generate_movie_nfo(&movie);
        assert!(nfo.contains("<title>Tom &amp; Jerry &lt;3</title>"));
        assert!(!nfo.contains("<uniqueid"));
    }
}
