use crate::error::{ExtractionError, Result};
use crate::types::ArchiveType;
use std::path::{Component, Path, PathBuf};

/// Detect archive type by file extension
///
/// Supports ZIP (.zip) and RAR (.rar) formats.
pub fn detect_archive_type(path: &Path) -> Option<ArchiveType> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    match ext.as_str() {
        "rar" => Some(ArchiveType::Rar),
        "zip" => Some(ArchiveType::Zip),
        _ => None,
    }
}

/// Fail with `ArchiveNotFound` unless the archive exists
pub(crate) fn ensure_archive_exists(archive_type: ArchiveType, archive_path: &Path) -> Result<()> {
    if archive_path.exists() {
        Ok(())
    } else {
        Err(ExtractionError::ArchiveNotFound {
            format: archive_type.name(),
            archive: archive_path.to_path_buf(),
        }
        .into())
    }
}

/// Last path component of an archive entry name
///
/// Archive entries use `/` separators regardless of platform; `\` is treated
/// as a separator too since some Windows tools write it.
pub(crate) fn entry_basename(entry_name: &str) -> &str {
    entry_name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(entry_name)
}

/// Keep only normal components of an entry path, dropping `..`, `.` and roots
///
/// Returns None if nothing remains (e.g. an entry named `../..`).
pub(crate) fn sanitize_entry_path(entry_path: &Path) -> Option<PathBuf> {
    let sanitized = entry_path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect::<PathBuf>();

    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Create the parent directory of an extraction target
pub(crate) fn create_parent_dir(
    archive_path: &Path,
    entry: &str,
    target: &Path,
) -> std::result::Result<(), ExtractionError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExtractionError::EntryFailed {
            archive: archive_path.to_path_buf(),
            entry: entry.to_string(),
            reason: format!("failed to create directory {}: {}", parent.display(), e),
        })?;
    }
    Ok(())
}
