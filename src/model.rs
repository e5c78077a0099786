//! In-memory content model of one chunk document.
//!
//! A [`ChunkPlan`] is the ordered list of [`Block`]s a document is made of. It is built
//! entirely before layout starts: every file of the chunk is read here, so the renderer only
//! turns blocks into layout elements and never touches the filesystem.

use std::path::{Path, PathBuf};

use log::debug;

use crate::chunk::Chunk;
use crate::content::{self, FileContent};

/// Individual content blocks of a chunk document, in render order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Title line at the top of the first page.
    Title(String),
    /// Heading naming a file; `index` is the file's position inside the chunk.
    FileHeading { index: usize, path: String },
    /// Preformatted file body.
    Code(String),
    /// Placeholder shown when the file could not be read.
    ReadError(String),
    /// Forced page break.
    PageBreak,
}

/// Blocks and metadata for the document of one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    part: usize,
    files: Vec<PathBuf>,
    blocks: Vec<Block>,
}

impl ChunkPlan {
    /// Reads every file of `chunk` and lays out the block sequence for its document.
    pub fn build(root: &Path, chunk: Chunk<'_, PathBuf>, total_parts: usize) -> Self {
        Self::build_with(root, chunk, total_parts, content::read_file)
    }

    /// Same as [`ChunkPlan::build`] with a custom read step.
    pub fn build_with<R>(
        root: &Path,
        chunk: Chunk<'_, PathBuf>,
        total_parts: usize,
        mut read: R,
    ) -> Self
    where
        R: FnMut(&Path) -> FileContent,
    {
        let mut blocks = Vec::with_capacity(1 + chunk.len() * 3);
        blocks.push(Block::Title(title_text(root, chunk.part(), total_parts)));

        for (index, path) in chunk.items().iter().enumerate() {
            if index > 0 {
                blocks.push(Block::PageBreak);
            }

            debug!("Reading {}", path.display());
            blocks.push(Block::FileHeading {
                index,
                path: content::display_path(path),
            });
            blocks.push(match read(path) {
                FileContent::Text(text) => Block::Code(text),
                FileContent::Unreadable { reason } => {
                    Block::ReadError(content::placeholder_text(&reason))
                }
            });
        }

        Self {
            part: chunk.part(),
            files: chunk.items().to_vec(),
            blocks,
        }
    }

    pub fn part(&self) -> usize {
        self.part
    }

    /// Files of the chunk, in enumeration order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Display paths of the file headings, in order.
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::FileHeading { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Title line shown on the first page of each document.
pub fn title_text(root: &Path, part: usize, total_parts: usize) -> String {
    format!(
        "Files of {} (part {} of {})",
        content::display_path(root),
        part,
        total_parts
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::partition;
    use std::num::NonZeroUsize;

    fn fake_read(path: &Path) -> FileContent {
        if path.ends_with("locked.txt") {
            FileContent::Unreadable {
                reason: "Permission denied (os error 13)".to_owned(),
            }
        } else {
            FileContent::Text(format!("contents of {}", path.display()))
        }
    }

    fn plan_for(files: &[PathBuf]) -> ChunkPlan {
        let size = NonZeroUsize::new(20).expect("non-zero");
        let chunk = partition(files, size).next().expect("one chunk");
        ChunkPlan::build_with(Path::new("/project"), chunk, 1, fake_read)
    }

    #[test]
    fn single_file_yields_one_block_pair() {
        let plan = plan_for(&[PathBuf::from("/project/a.txt")]);

        assert_eq!(plan.part(), 1);
        assert_eq!(
            plan.blocks(),
            &[
                Block::Title("Files of /project (part 1 of 1)".to_owned()),
                Block::FileHeading {
                    index: 0,
                    path: "/project/a.txt".to_owned()
                },
                Block::Code("contents of /project/a.txt".to_owned()),
            ]
        );
    }

    #[test]
    fn page_breaks_separate_files() {
        let files: Vec<PathBuf> = ["a", "b", "c"]
            .iter()
            .map(|name| PathBuf::from(format!("/project/{name}")))
            .collect();
        let plan = plan_for(&files);

        let breaks = plan
            .blocks()
            .iter()
            .filter(|block| matches!(block, Block::PageBreak))
            .count();
        assert_eq!(breaks, 2);
        assert!(!matches!(plan.blocks().last(), Some(Block::PageBreak)));
        assert_eq!(plan.headings(), vec!["/project/a", "/project/b", "/project/c"]);
        assert_eq!(plan.files(), files.as_slice());
    }

    #[test]
    fn unreadable_file_gets_placeholder_and_run_continues() {
        let files = vec![
            PathBuf::from("/project/locked.txt"),
            PathBuf::from("/project/open.txt"),
        ];
        let plan = plan_for(&files);

        let placeholder = plan
            .blocks()
            .iter()
            .find_map(|block| match block {
                Block::ReadError(text) => Some(text.as_str()),
                _ => None,
            })
            .expect("placeholder block");
        assert!(placeholder.starts_with(content::READ_ERROR_MARKER));
        assert!(placeholder.contains("Permission denied"));
        assert!(plan
            .blocks()
            .contains(&Block::Code("contents of /project/open.txt".to_owned())));
    }
}
