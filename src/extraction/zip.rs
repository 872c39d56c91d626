use crate::error::{Error, ExtractionError, Result};
use crate::types::ArchiveType;
use crate::validation::is_valid_document;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::shared::{
    create_parent_dir, ensure_archive_exists, entry_basename, sanitize_entry_path,
};

/// Archive extractor for ZIP files
pub struct ZipExtractor;

impl ZipExtractor {
    fn invalid(archive_path: &Path, reason: impl std::fmt::Display) -> Error {
        Error::Extraction(ExtractionError::InvalidArchive {
            format: ArchiveType::Zip.name(),
            archive: archive_path.to_path_buf(),
            reason: reason.to_string(),
        })
    }

    /// Write a single ZIP entry to `target`
    fn extract_zip_entry(
        file: &mut zip::read::ZipFile,
        archive_path: &Path,
        target: &Path,
    ) -> Result<()> {
        let entry = file.name().to_string();
        create_parent_dir(archive_path, &entry, target)?;

        let entry_failed = |e: std::io::Error| ExtractionError::EntryFailed {
            archive: archive_path.to_path_buf(),
            entry: entry.clone(),
            reason: e.to_string(),
        };

        let mut outfile = std::fs::File::create(target).map_err(entry_failed)?;
        std::io::copy(file, &mut outfile).map_err(entry_failed)?;

        Ok(())
    }

    /// Find the first PBC / invitation letter in a ZIP archive and extract it
    ///
    /// Entries are visited in archive order; the entry's directory path is
    /// kept under `dest_path` with `..` and root components removed.
    ///
    /// # Errors
    ///
    /// `ArchiveNotFound`, `InvalidArchive`, `EmptyArchive` or
    /// `NoMatchingDocument` (listing every entry's base name).
    pub fn find_and_extract(archive_path: &Path, dest_path: &Path) -> Result<PathBuf> {
        debug!(?archive_path, ?dest_path, "searching ZIP archive");

        ensure_archive_exists(ArchiveType::Zip, archive_path)?;

        let file = std::fs::File::open(archive_path)
            .map_err(|e| Self::invalid(archive_path, format!("cannot open archive: {}", e)))?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| Self::invalid(archive_path, e))?;

        if archive.is_empty() {
            return Err(ExtractionError::EmptyArchive {
                format: ArchiveType::Zip.name(),
                archive: archive_path.to_path_buf(),
            }
            .into());
        }

        let mut available = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Self::invalid(archive_path, e))?;

            if file.is_dir() {
                continue;
            }

            let basename = entry_basename(file.name()).to_string();
            available.push(basename.clone());

            if !is_valid_document(&basename) {
                continue;
            }

            let Some(relative) = sanitize_entry_path(Path::new(file.name())) else {
                warn!(entry = file.name(), "skipping entry with unsafe path");
                continue;
            };
            let target = dest_path.join(relative);

            Self::extract_zip_entry(&mut file, archive_path, &target)?;

            info!(
                ?archive_path,
                entry = %basename,
                extracted = ?target,
                "extracted bidding document from ZIP"
            );
            return Ok(target);
        }

        Err(ExtractionError::NoMatchingDocument {
            format: ArchiveType::Zip.name(),
            archive: archive_path.to_path_buf(),
            available,
        }
        .into())
    }
}
