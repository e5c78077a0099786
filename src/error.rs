//! Error type shared by every stage of a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::outline::OutlineError;

/// Failures that terminate a run.
///
/// Per-file read failures are not represented here: they are recovered locally
/// and rendered as placeholder text (see [`crate::content::FileContent`]).
#[derive(Debug, Error)]
pub enum Error {
    /// The directory to scan does not exist or is not a directory.
    #[error("root directory {} does not exist or is not a directory", .0.display())]
    RootNotFound(PathBuf),

    /// Not even the bundled fallback metrics could be loaded.
    #[error("no usable font found. Checked: {checked}. Pass --font or set TREE2PDF_FONT.")]
    FontUnavailable {
        /// Human readable summary of every location that was tried.
        checked: String,
    },

    /// The layout engine failed while producing a document.
    #[error("failed to render {}: {source}", path.display())]
    Render {
        /// Output path of the document being rendered.
        path: PathBuf,
        #[source]
        source: genpdf::error::Error,
    },

    /// The rendered bytes could not be parsed or re-serialized.
    #[error("failed to post-process {}: {source}", path.display())]
    Pdf {
        /// Output path of the document being processed.
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// The per-file outline could not be attached.
    #[error("failed to attach outline to {}: {source}", path.display())]
    Outline {
        /// Output path of the document being processed.
        path: PathBuf,
        #[source]
        source: OutlineError,
    },

    /// The finished document could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Output path that could not be written.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
