//! Run configuration.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::fonts::FontResolver;

/// File name stem used for generated documents when none is configured.
pub const DEFAULT_OUTPUT_PREFIX: &str = "ProyectoParte";

/// Maximum number of files rendered into one document when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Everything a run needs to know: what to scan, how to split it and where to write.
#[derive(Clone, Debug)]
pub struct RunConfig {
    root_dir: PathBuf,
    output_prefix: String,
    chunk_size: NonZeroUsize,
    output_dir: Option<PathBuf>,
    font: Option<PathBuf>,
    bookmarks: bool,
}

impl RunConfig {
    /// Creates a configuration scanning `root_dir` with the default prefix and chunk size.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_owned(),
            chunk_size: default_chunk_size(),
            output_dir: None,
            font: None,
            bookmarks: true,
        }
    }

    /// Sets the file name stem of the generated documents.
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Sets the maximum number of files per document.
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Writes the documents into `dir` instead of the scanned root.
    pub fn with_output_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Tries the given font file before the system candidates.
    pub fn with_font(mut self, font: impl Into<Option<PathBuf>>) -> Self {
        self.font = font.into();
        self
    }

    /// Enables or disables the per-file outline.
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Directory receiving the documents; defaults to the scanned root.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.root_dir)
    }

    pub fn bookmarks(&self) -> bool {
        self.bookmarks
    }

    /// Font resolver honoring the configured override.
    pub fn font_resolver(&self) -> FontResolver {
        FontResolver::system().with_override(self.font.clone())
    }
}

fn default_chunk_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN)
}
