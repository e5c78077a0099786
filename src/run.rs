//! End-to-end run: walk, split, render.

use log::{debug, info};

use crate::chunk::{self, output_file_name};
use crate::config::RunConfig;
use crate::error::Error;
use crate::model::ChunkPlan;
use crate::render::{self, RenderOptions, RenderedDocument};
use crate::walk;

/// Renders every file under the configured root into numbered chunk documents.
///
/// `on_written` is called once per document, in part order, right after it has been
/// written. Documents are produced strictly one after another; the first failure stops the
/// run and documents already written are left in place.
pub fn run<F>(config: &RunConfig, mut on_written: F) -> Result<Vec<RenderedDocument>, Error>
where
    F: FnMut(&RenderedDocument),
{
    let files = walk::collect_files(config.root_dir())?;
    let total_parts = chunk::chunk_count(files.len(), config.chunk_size());
    info!(
        "Found {} files under {}; writing {} documents",
        files.len(),
        config.root_dir().display(),
        total_parts
    );

    if files.is_empty() {
        return Ok(Vec::new());
    }

    let font = config.font_resolver().resolve()?;
    let options = RenderOptions {
        bookmarks: config.bookmarks(),
    };
    let mut documents = Vec::with_capacity(total_parts);

    for part in chunk::partition(&files, config.chunk_size()) {
        let output = config
            .output_dir()
            .join(output_file_name(config.output_prefix(), part.part()));
        debug!("Rendering part {} into {}", part.part(), output.display());

        let plan = ChunkPlan::build(config.root_dir(), part, total_parts);
        let document = render::render_chunk(&plan, &output, &font, options)?;
        on_written(&document);
        documents.push(document);
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_root_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut calls = 0;
        let documents = run(&RunConfig::new(dir.path()), |_| calls += 1).expect("run");

        assert!(documents.is_empty());
        assert_eq!(calls, 0);
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        let err = run(&RunConfig::new(&missing), |_| {}).unwrap_err();
        assert!(matches!(err, Error::RootNotFound(path) if path == missing));
    }
}
