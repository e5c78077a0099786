//! Recursive file enumeration.

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

/// Lazily yields every non-directory entry below `root`, in the order the walk produces them.
///
/// Hidden files and nested directories are included and nothing is filtered by name or size.
/// Symbolic links are reported but never descended, so link cycles cannot loop. Entries the
/// walk cannot read (for example a directory without permissions) are logged and skipped.
pub fn walk_files(root: &Path) -> Result<impl Iterator<Item = PathBuf>, Error> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }

    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry during walk: {}", err);
                None
            }
        })
        .filter(is_file_like)
        .map(DirEntry::into_path);

    Ok(entries)
}

/// Materializes [`walk_files`] into memory.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    Ok(walk_files(root)?.collect())
}

fn is_file_like(entry: &DirEntry) -> bool {
    if entry.file_type().is_dir() {
        return false;
    }
    // Links to directories are listed as directories by a plain walk; keep them out.
    !(entry.path_is_symlink() && entry.path().is_dir())
}
