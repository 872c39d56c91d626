//! Core types for tcs-downloader

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Identifier of a tender ("licitación") in the DNCP API
///
/// Always a non-empty, trimmed string. Numeric ids are accepted through
/// [`TenderId::new`] since it takes anything that displays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderId(String);

impl TenderId {
    /// Validate and wrap a tender id
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the id is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use tcs_downloader::TenderId;
    ///
    /// assert_eq!(TenderId::new(" 12345 ").unwrap().as_str(), "12345");
    /// assert_eq!(TenderId::new(12345).unwrap().as_str(), "12345");
    /// assert!(TenderId::new("   ").is_err());
    /// ```
    pub fn new(raw: impl std::fmt::Display) -> Result<Self> {
        let id = raw.to_string().trim().to_string();
        if id.is_empty() {
            return Err(Error::Validation("tender_id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document descriptor as returned by the DNCP API
///
/// Every field is optional in the payload; the pipeline validates the ones it
/// needs at the step that needs them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document id (string or number in the payload)
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,

    /// File name of the document, including extension
    #[serde(default)]
    pub title: Option<String>,

    /// Download location
    #[serde(default)]
    pub url: Option<String>,

    /// Category label ("Pliego de bases y condiciones", "Carta de invitación", ...)
    #[serde(default)]
    pub document_type_details: Option<String>,

    /// MIME type reported by the API, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Document {
    /// Format derived from the title's extension
    pub fn file_format(&self) -> Option<DocumentFormat> {
        self.title
            .as_deref()
            .and_then(|t| DocumentFormat::from_path(Path::new(t)))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// File formats the pipeline knows how to handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF, used as-is
    Pdf,
    /// Legacy Word document, converted
    Doc,
    /// Office Open XML document, converted
    Docx,
    /// ZIP archive, searched for a document
    Zip,
    /// RAR archive, searched for a document
    Rar,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();

        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "zip" => Some(Self::Zip),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }

    /// MIME type for this format
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Zip => "application/zip",
            Self::Rar => "application/x-rar-compressed",
        }
    }

    /// Archive type, if this format is an archive
    pub fn archive_type(self) -> Option<ArchiveType> {
        match self {
            Self::Zip => Some(ArchiveType::Zip),
            Self::Rar => Some(ArchiveType::Rar),
            _ => None,
        }
    }

    /// Whether the format needs a conversion step to become a PDF
    pub fn needs_conversion(self) -> bool {
        matches!(self, Self::Doc | Self::Docx)
    }
}

/// Archive type detected by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveType {
    /// RAR archive (.rar)
    Rar,
    /// ZIP archive (.zip)
    Zip,
}

impl ArchiveType {
    /// Display name used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Self::Rar => "RAR",
            Self::Zip => "ZIP",
        }
    }
}
