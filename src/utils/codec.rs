//! Subtitle payload decoding.
//!
//! The catalog ships subtitles as base64 text wrapping a gzip stream. The
//! subtitle inside is returned as raw bytes in whatever encoding it was uploaded.

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use std::io::Read;

/// Decode a base64 + gzip payload into the subtitle file's bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let compressed = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| crate::Error::Decode(format!("base64: {}", e)))?;

    let mut raw = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut raw)
        .map_err(|e| crate::Error::Decode(format!("gzip: {}", e)))?;

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn encode(text: &[u8]) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text).unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_decode_known_text() {
        let text = "1\r\n00:00:01,000 --> 00:00:02,000\r\nΚαλημέρα\r\n";
        assert_eq!(decode_payload(&encode(text.as_bytes())).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_decode_tolerates_line_breaks() {
        let encoded = encode(b"hello");
        let wrapped = format!("{}\n{}", &encoded[..10], &encoded[10..]);
        assert_eq!(decode_payload(&wrapped).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_keeps_legacy_code_page_bytes() {
        // "Γεια" in windows-1253
        let raw = b"1\r\n00:00:01,000 --> 00:00:02,000\r\n\xc3\xe5\xe9\xe1\r\n";
        assert_eq!(decode_payload(&encode(raw)).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_payload("!!!"), Err(crate::Error::Decode(_))));
        let not_gzip = STANDARD.encode(b"plain text");
        assert!(matches!(decode_payload(&not_gzip), Err(crate::Error::Decode(_))));
    }
}
