//! DOC/DOCX to PDF conversion
//!
//! Conversion is delegated to external tools behind the [`DocumentConverter`]
//! trait:
//!
//! - [`PandocConverter`]: runs the external `pandoc` binary with a PDF engine
//! - [`NoOpConverter`]: stub used when no converter binary is available
//!
//! ## Usage
//!
//! ```no_run
//! use tcs_downloader::conversion::{DocumentConverter, PandocConverter};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = PandocConverter::from_path()
//!         .expect("pandoc binary not found");
//!
//!     let pdf = converter
//!         .convert_to_pdf(Path::new("pliego.docx"), Path::new("/tmp/out"))
//!         .await?;
//!     println!("converted to {}", pdf.display());
//!
//!     Ok(())
//! }
//! ```

mod noop;
mod pandoc;
mod traits;

pub use noop::NoOpConverter;
pub use pandoc::{ConversionStrategy, PandocConverter};
pub use traits::DocumentConverter;

use crate::config::ToolsConfig;
use std::sync::Arc;
use tracing::warn;

/// Build the converter described by the tools configuration
///
/// Falls back to [`NoOpConverter`] when pandoc is neither configured nor
/// found on PATH, so the pipeline still handles PDF documents.
pub fn converter_from_config(tools: &ToolsConfig) -> Arc<dyn DocumentConverter> {
    match PandocConverter::from_config(tools) {
        Some(converter) => Arc::new(converter),
        None => {
            warn!("pandoc not found; DOC/DOCX documents cannot be converted");
            Arc::new(NoOpConverter)
        }
    }
}
