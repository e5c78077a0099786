//! Reading file contents for display.

use std::fs;
use std::path::Path;

use log::warn;

/// Outcome of reading one enumerated file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    /// The full text, with invalid UTF-8 sequences replaced by U+FFFD.
    Text(String),
    /// The file could not be read; `reason` describes the failure.
    Unreadable { reason: String },
}

/// Marker that prefixes every read-failure placeholder.
pub const READ_ERROR_MARKER: &str = "[Error reading file:";

/// Placeholder line for a file that failed to read with `reason`.
pub fn placeholder_text(reason: &str) -> String {
    format!("{READ_ERROR_MARKER} {reason}]")
}

/// Reads the whole file at `path`, decoding it as UTF-8 with replacement.
///
/// Never fails: I/O errors are captured as [`FileContent::Unreadable`]. The handle is
/// closed before this returns on both paths.
pub fn read_file(path: &Path) -> FileContent {
    match fs::read(path) {
        Ok(bytes) => FileContent::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            warn!("Unable to read {}: {}", path.display(), err);
            FileContent::Unreadable {
                reason: err.to_string(),
            }
        }
    }
}

/// Path as shown in headings, with platform separators normalized to `/`.
pub fn display_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
