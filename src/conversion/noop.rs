//! No-op converter for graceful degradation

use super::traits::DocumentConverter;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// No-op converter used when no conversion toolchain is available
///
/// Returns `Error::NotSupported` for every conversion, letting the pipeline
/// keep handling documents that are already PDFs.
///
/// # Examples
///
/// ```
/// use tcs_downloader::conversion::{DocumentConverter, NoOpConverter};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = NoOpConverter
///     .convert_to_pdf(Path::new("pliego.docx"), Path::new("/tmp"))
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpConverter;

#[async_trait]
impl DocumentConverter for NoOpConverter {
    async fn convert_to_pdf(&self, input: &Path, _output_dir: &Path) -> crate::Result<PathBuf> {
        Err(crate::Error::NotSupported(format!(
            "converting {} requires the external pandoc binary. \
             Configure pandoc_path in config or ensure pandoc is in PATH.",
            input.display()
        )))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
