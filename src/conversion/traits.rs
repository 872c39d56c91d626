//! Trait for document-to-PDF converters

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for DOC/DOCX to PDF conversion
///
/// Implementations can use external binaries or provide stub functionality
/// for graceful degradation.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert a document to PDF
    ///
    /// # Arguments
    ///
    /// * `input` - Path to the DOC/DOCX document
    /// * `output_dir` - Directory that receives `<input stem>.pdf`
    ///
    /// # Returns
    ///
    /// The path of the generated, non-empty PDF.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input document does not exist
    /// - Every conversion attempt failed or produced an empty file
    /// - The operation is not supported (for stub implementations)
    async fn convert_to_pdf(&self, input: &Path, output_dir: &Path) -> crate::Result<PathBuf>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
