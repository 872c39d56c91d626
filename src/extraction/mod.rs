//! Locating and extracting a bidding document inside ZIP and RAR archives
//!
//! Both extractors scan the archive's entries in order and extract only the
//! first one whose base name passes [`is_valid_document`](crate::validation::is_valid_document).

mod rar;
mod shared;
mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use rar::RarExtractor;
pub use shared::detect_archive_type;
pub use zip::ZipExtractor;

use crate::error::{Error, Result};
use crate::types::ArchiveType;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::info;

/// Unified archive extraction dispatcher
///
/// Detects the archive type and routes to the matching extractor. Archive
/// reading is blocking, so it runs on the blocking thread pool.
///
/// # Arguments
/// * `archive_path` - Path to the archive file
/// * `dest_path` - Destination directory for the extracted document
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the extracted document
/// * `Err(Error)` - Unknown archive type, missing/corrupt archive, or no matching entry
///
/// # Example
/// ```no_run
/// use tcs_downloader::extraction::extract_document;
/// use std::path::Path;
///
/// # async fn example() -> tcs_downloader::Result<()> {
/// let pbc = extract_document(Path::new("documentos.zip"), Path::new("/tmp/extract")).await?;
/// println!("extracted {}", pbc.display());
/// # Ok(())
/// # }
/// ```
pub async fn extract_document(archive_path: &Path, dest_path: &Path) -> Result<PathBuf> {
    let archive_type = detect_archive_type(archive_path).ok_or_else(|| {
        Error::UnsupportedFormat(format!(
            "unknown archive type for file: {}",
            archive_path.display()
        ))
    })?;

    info!(
        ?archive_path,
        ?archive_type,
        "dispatching extraction to appropriate extractor"
    );

    let find_and_extract: fn(&Path, &Path) -> Result<PathBuf> = match archive_type {
        ArchiveType::Zip => ZipExtractor::find_and_extract,
        ArchiveType::Rar => RarExtractor::find_and_extract,
    };

    let archive_owned = archive_path.to_path_buf();
    let dest_owned = dest_path.to_path_buf();

    spawn_blocking(move || find_and_extract(&archive_owned, &dest_owned))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(format!("extraction task panicked: {}", e))))?
}
