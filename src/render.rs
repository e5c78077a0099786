//! Rendering one chunk document to disk.

use std::fs;
use std::path::{Path, PathBuf};

use genpdf::elements::{Break, PageBreak};
use genpdf::{Alignment, Mm};
use log::info;

use crate::builder::{self, DocumentBuilder, PageTracker, FOOTER_BAND_MM};
use crate::elements::{FileMarker, VerbatimText};
use crate::error::Error;
use crate::fonts::FontChoice;
use crate::model::{Block, ChunkPlan};
use crate::outline::OutlineItem;
use crate::postprocess;
use crate::styles::StyleSheet;

/// Options affecting how a chunk document is produced.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Attach a per-file outline to the document.
    pub bookmarks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { bookmarks: true }
    }
}

/// A document written to disk for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDocument {
    part: usize,
    path: PathBuf,
    files: Vec<PathBuf>,
    page_count: usize,
    file_pages: Vec<usize>,
}

impl RenderedDocument {
    /// 1-based part number.
    pub fn part(&self) -> usize {
        self.part
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Files rendered into the document, in order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of pages, each carrying a footer numbered from 1.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Page on which each file block starts, parallel to [`RenderedDocument::files`].
    pub fn file_pages(&self) -> &[usize] {
        &self.file_pages
    }
}

/// Lays out `plan` in `font` and writes the finished document to `output`.
pub fn render_chunk(
    plan: &ChunkPlan,
    output: &Path,
    font: &FontChoice,
    options: RenderOptions,
) -> Result<RenderedDocument, Error> {
    let styles = StyleSheet::new();
    let tracker = PageTracker::new(plan.files().len());
    let footer_style = styles.footer;

    let title = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());

    let mut document = DocumentBuilder::new()
        .with_title(title)
        .with_page_tracker(tracker.clone())
        .with_footer(Mm::from(FOOTER_BAND_MM), move |page| {
            builder::page_number_footer(page, footer_style)
        })
        .build(font);

    let mut outline = Vec::new();
    for block in plan.blocks() {
        match block {
            Block::Title(text) => {
                document.push(
                    VerbatimText::new(text.as_str(), styles.title)
                        .with_alignment(Alignment::Center),
                );
                document.push(Break::new(1));
            }
            Block::FileHeading { index, path } => {
                document.push(FileMarker::new(*index, tracker.clone()));
                document.push(VerbatimText::new(format!("File: {path}"), styles.heading));
                document.push(Break::new(0.5));
                outline.push((*index, path.clone()));
            }
            Block::Code(text) => document.push(VerbatimText::new(text.as_str(), styles.code)),
            Block::ReadError(text) => document.push(VerbatimText::new(text.as_str(), styles.body)),
            Block::PageBreak => document.push(PageBreak::new()),
        }
    }

    let mut rendered = Vec::new();
    document.render(&mut rendered).map_err(|source| Error::Render {
        path: output.to_path_buf(),
        source,
    })?;

    let starts = tracker.file_starts();
    let file_pages: Vec<usize> = starts.iter().map(|page| page.unwrap_or(1)).collect();
    let outline: Vec<OutlineItem> = if options.bookmarks {
        outline
            .into_iter()
            .map(|(index, title)| OutlineItem {
                title,
                page: file_pages.get(index).copied().unwrap_or(1),
            })
            .collect()
    } else {
        Vec::new()
    };

    let bytes = postprocess::finalize(&rendered, &outline, output)?;
    fs::write(output, &bytes).map_err(|source| Error::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote {} ({} files, {} pages, {} bytes)",
        output.display(),
        plan.files().len(),
        tracker.page_count(),
        bytes.len()
    );

    Ok(RenderedDocument {
        part: plan.part(),
        path: output.to_path_buf(),
        files: plan.files().to_vec(),
        page_count: tracker.page_count(),
        file_pages,
    })
}
