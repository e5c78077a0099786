//! Core library of the tree2pdf tool: dumps every file below a directory into numbered
//! PDF documents of a fixed number of files each.

pub mod builder;
pub mod chunk;
pub mod config;
pub mod content;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod outline;
pub mod postprocess;
pub mod render;
pub mod run;
pub mod styles;
pub mod walk;

pub use config::{RunConfig, DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_PREFIX};
pub use error::Error;
pub use fonts::{FontChoice, FontResolver};
pub use render::{RenderOptions, RenderedDocument};
pub use run::run;
