//! Filename and category matching for PBC / invitation letter documents

use crate::error::{Error, Result};
use crate::types::{Document, DocumentFormat};
use deunicode::deunicode;
use std::path::Path;
use tracing::debug;

/// Keywords that mark a file name as a PBC or invitation letter
pub const DOCUMENT_KEYWORDS: [&str; 4] = ["pliego", "pbc", "carta", "invitacion"];

/// Category labels (normalized) accepted by [`select_document`]
pub const DOCUMENT_CATEGORIES: [&str; 2] = ["pliego de bases y condiciones", "carta de invitacion"];

/// Label reported for documents without a category
const UNLABELED: &str = "Sin tipo";

/// Fold accents to ASCII and lower-case
fn normalize(text: &str) -> String {
    deunicode(text).to_lowercase()
}

/// Check whether a file name looks like a PBC or invitation letter in PDF or DOC/DOCX format
///
/// Matching is accent- and case-insensitive, so `Carta_Invitación.DOCX` is valid.
///
/// # Examples
///
/// ```
/// use tcs_downloader::validation::is_valid_document;
///
/// assert!(is_valid_document("pliego_bases_condiciones.pdf"));
/// assert!(is_valid_document("Carta_Invitación.DOCX"));
/// assert!(!is_valid_document("pliego_bases_condiciones.zip"));
/// assert!(!is_valid_document("documento_general.pdf"));
/// ```
pub fn is_valid_document(filename: &str) -> bool {
    let name = normalize(filename);

    let has_keyword = DOCUMENT_KEYWORDS.iter().any(|kw| name.contains(kw));
    let has_document_extension = matches!(
        DocumentFormat::from_path(Path::new(filename)),
        Some(DocumentFormat::Pdf | DocumentFormat::Doc | DocumentFormat::Docx)
    );

    has_keyword && has_document_extension
}

/// Whether a category label names a PBC or invitation letter
pub fn is_bidding_category(label: &str) -> bool {
    let label = normalize(label.trim());
    DOCUMENT_CATEGORIES.contains(&label.as_str())
}

/// Pick the first PBC or invitation letter from an API document list
///
/// # Errors
///
/// - [`Error::Validation`] if the list is empty
/// - [`Error::DocumentNotFound`] if no document carries a PBC or invitation
///   category; the error lists the categories that were available
pub fn select_document(documents: &[Document]) -> Result<&Document> {
    if documents.is_empty() {
        return Err(Error::Validation(
            "document list must not be empty".to_string(),
        ));
    }

    if let Some(doc) = documents.iter().find(|doc| {
        doc.document_type_details
            .as_deref()
            .is_some_and(is_bidding_category)
    }) {
        debug!(
            title = doc.title.as_deref().unwrap_or_default(),
            category = doc.document_type_details.as_deref().unwrap_or_default(),
            "selected bidding document"
        );
        return Ok(doc);
    }

    let available: Vec<String> = documents
        .iter()
        .map(|doc| {
            doc.document_type_details
                .clone()
                .unwrap_or_else(|| UNLABELED.to_string())
        })
        .collect();

    Err(Error::DocumentNotFound {
        message: format!(
            "no PBC or invitation letter; available types: {}",
            available.join(", ")
        ),
        available,
    })
}

/// MIME type of a document, derived from its title's extension
///
/// Returns an empty string for unknown extensions or a missing title.
pub fn check_document_mime_type(document: &Document) -> &'static str {
    document
        .file_format()
        .map(DocumentFormat::mime_type)
        .unwrap_or("")
}
