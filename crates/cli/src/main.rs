use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use tree2pdf::{RunConfig, DEFAULT_OUTPUT_PREFIX};

/// Dumps every file below a directory into numbered PDF documents.
///
/// Documents are named `<PREFIX>_<N>.pdf` and written into the scanned directory unless
/// `--output-dir` is given. Set `RUST_LOG` to adjust log verbosity.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory whose files are rendered.
    root_dir: PathBuf,

    /// File name stem of the generated documents.
    #[arg(long, default_value = DEFAULT_OUTPUT_PREFIX)]
    prefix: String,

    /// Maximum number of files per document.
    #[arg(long, default_value_t = default_chunk_size())]
    chunk_size: NonZeroUsize,

    /// Directory receiving the documents; defaults to ROOT_DIR.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Font file tried before the system fonts.
    #[arg(long, env = "TREE2PDF_FONT")]
    font: Option<PathBuf>,

    /// Do not attach a per-file outline to the documents.
    #[arg(long)]
    no_bookmarks: bool,
}

fn default_chunk_size() -> NonZeroUsize {
    NonZeroUsize::new(tree2pdf::DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("{cli:?}");

    let config = RunConfig::new(cli.root_dir)
        .with_output_prefix(cli.prefix)
        .with_chunk_size(cli.chunk_size)
        .with_output_dir(cli.output_dir)
        .with_font(cli.font)
        .with_bookmarks(!cli.no_bookmarks);

    let result = tree2pdf::run(&config, |document| {
        println!("Generated: {}", document.path().display());
    });

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
