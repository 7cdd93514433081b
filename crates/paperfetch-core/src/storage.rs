//! Destination directory and whole-file writes.
//!
//! The body of a finished download is written to a temp file in the
//! destination directory and renamed over the final path. Readers never see a
//! half-written paper, and when two workers store the same name the last
//! rename wins with a complete file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Creates `dir` and its parents if missing.
///
/// Safe to call concurrently from many workers: losing a creation race to
/// another worker is not an error.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Writes `body` to `dir/filename`, replacing any existing file.
/// Returns the final path.
pub fn write_replacing(dir: &Path, filename: &str, body: &[u8]) -> io::Result<PathBuf> {
    let final_path = dir.join(filename);
    let mut tmp = tempfile::Builder::new()
        .prefix(".paperfetch-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&final_path).map_err(|e| e.error)?;
    Ok(final_path)
}
