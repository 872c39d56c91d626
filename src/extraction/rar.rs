use crate::error::{Error, ExtractionError, Result};
use crate::types::ArchiveType;
use crate::validation::is_valid_document;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::shared::{create_parent_dir, ensure_archive_exists, entry_basename, sanitize_entry_path};

/// Archive extractor for RAR files
pub struct RarExtractor;

impl RarExtractor {
    fn invalid(archive_path: &Path, e: unrar::error::UnrarError) -> Error {
        Error::Extraction(ExtractionError::InvalidArchive {
            format: ArchiveType::Rar.name(),
            archive: archive_path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Find the first PBC / invitation letter in a RAR archive and extract it
    ///
    /// Walks the archive headers once; non-matching entries are skipped
    /// without being decompressed.
    ///
    /// # Errors
    ///
    /// `ArchiveNotFound`, `InvalidArchive` (including files that are not RAR
    /// archives at all), `EmptyArchive` or `NoMatchingDocument`.
    pub fn find_and_extract(archive_path: &Path, dest_path: &Path) -> Result<PathBuf> {
        debug!(?archive_path, ?dest_path, "searching RAR archive");

        ensure_archive_exists(ArchiveType::Rar, archive_path)?;

        let mut at_header = unrar::Archive::new(archive_path)
            .open_for_processing()
            .map_err(|e| Self::invalid(archive_path, e))?;

        let mut available = Vec::new();
        let mut entry_count = 0usize;

        loop {
            // Read the next header - transitions to BeforeFile state
            let at_file = match at_header.read_header() {
                Ok(Some(entry_processor)) => entry_processor,
                Ok(None) => break,
                Err(e) => return Err(Self::invalid(archive_path, e)),
            };
            entry_count += 1;

            let header = at_file.entry();
            let entry_name = header.filename.to_string_lossy().into_owned();

            let target = if header.is_directory() {
                None
            } else {
                let basename = entry_basename(&entry_name).to_string();
                let matches = is_valid_document(&basename);
                available.push(basename);

                if matches {
                    let sanitized = sanitize_entry_path(Path::new(&header.filename));
                    if sanitized.is_none() {
                        warn!(entry = %entry_name, "skipping entry with unsafe path");
                    }
                    sanitized.map(|rel| dest_path.join(rel))
                } else {
                    None
                }
            };

            match target {
                Some(target) => {
                    create_parent_dir(archive_path, &entry_name, &target)?;
                    at_file
                        .extract_to(&target)
                        .map_err(|e| ExtractionError::EntryFailed {
                            archive: archive_path.to_path_buf(),
                            entry: entry_name.clone(),
                            reason: e.to_string(),
                        })?;

                    info!(
                        ?archive_path,
                        entry = %entry_name,
                        extracted = ?target,
                        "extracted bidding document from RAR"
                    );
                    return Ok(target);
                }
                // Skip without decompressing - transitions back to BeforeHeader state
                None => {
                    at_header = at_file.skip().map_err(|e| Self::invalid(archive_path, e))?;
                }
            }
        }

        if entry_count == 0 {
            return Err(ExtractionError::EmptyArchive {
                format: ArchiveType::Rar.name(),
                archive: archive_path.to_path_buf(),
            }
            .into());
        }

        Err(ExtractionError::NoMatchingDocument {
            format: ArchiveType::Rar.name(),
            archive: archive_path.to_path_buf(),
            available,
        }
        .into())
    }
}
