//! Path helpers for downloaded and converted documents

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Resolve the final path for a file, handling collisions according to `action`
///
/// - `Overwrite` returns `path` unchanged
/// - `Skip` fails with [`Error::FileCollision`] if `path` exists
/// - `Rename` appends ` (1)`, ` (2)`, ... before the extension until the name is free
///
/// # Examples
///
/// ```
/// use tcs_downloader::utils::get_unique_path;
/// use tcs_downloader::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/pliego_bases_condiciones.pdf");
/// let unique = get_unique_path(path, FileCollisionAction::Rename).unwrap();
/// // If the PDF exists, returns /tmp/pliego_bases_condiciones (1).pdf
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(Error::FileCollision {
                    path: path.to_path_buf(),
                    reason: "file already exists and collision action is skip".to_string(),
                });
            }
            Ok(path.to_path_buf())
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
                Error::FileCollision {
                    path: path.to_path_buf(),
                    reason: "cannot extract file stem".to_string(),
                }
            })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().unwrap_or_else(|| Path::new(""));

            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(Error::FileCollision {
                path: path.to_path_buf(),
                reason: format!(
                    "could not find unique filename after {} attempts",
                    MAX_RENAME_ATTEMPTS
                ),
            })
        }
    }
}

/// Reduce a document title to a plain file name
///
/// Titles come from the API and may carry directory components; only the
/// last component is kept. Returns `None` when nothing usable remains.
///
/// ```
/// use tcs_downloader::utils::safe_file_name;
///
/// assert_eq!(safe_file_name("pliego.pdf").as_deref(), Some("pliego.pdf"));
/// assert_eq!(safe_file_name("../../etc/pliego.pdf").as_deref(), Some("pliego.pdf"));
/// assert_eq!(safe_file_name("dir\\carta.docx").as_deref(), Some("carta.docx"));
/// assert_eq!(safe_file_name(".."), None);
/// ```
pub fn safe_file_name(title: &str) -> Option<String> {
    let name = title.rsplit(&['/', '\\'][..]).next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
