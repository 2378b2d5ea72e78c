//! Movie fingerprint computation.
//!
//! The fingerprint is the file size plus the sum of the little-endian 64-bit
//! words in the first and last 64 KiB of the file, wrapping on overflow. It
//! depends only on content, so it survives renames and moves.

use crate::models::media::Fingerprint;
use crate::Result;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes hashed from each end of the file.
pub const CHUNK_SIZE: u64 = 64 * 1024;

/// Compute the fingerprint of a file on disk.
pub fn compute_fingerprint(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    fingerprint_reader(&mut file, size)
}

/// Compute a fingerprint from any seekable reader of known length.
///
/// Inputs shorter than two chunks hash whatever is available at each end,
/// so the two windows overlap. Empty input is rejected.
pub fn fingerprint_reader<R: Read + Seek>(reader: &mut R, size: u64) -> Result<Fingerprint> {
    if size == 0 {
        return Err(crate::Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "cannot fingerprint an empty file",
        )));
    }

    let chunk = CHUNK_SIZE.min(size);
    let mut buf = vec![0u8; chunk as usize];

    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut buf)?;
    let mut hash = size.wrapping_add(sum_words(&buf));

    reader.seek(SeekFrom::Start(size - chunk))?;
    reader.read_exact(&mut buf)?;
    hash = hash.wrapping_add(sum_words(&buf));

    Ok(Fingerprint { hash, size })
}

/// Wrapping sum of little-endian u64 words; a short final word is zero padded.
fn sum_words(bytes: &[u8]) -> u64 {
    bytes.chunks(8).fold(0u64, |acc, word| {
        let mut padded = [0u8; 8];
        padded[..word.len()].copy_from_slice(word);
        acc.wrapping_add(u64::from_le_bytes(padded))
    })
}
