//! Error types for tcs-downloader
//!
//! This module provides the error hierarchy for the whole pipeline:
//! - A crate-wide [`Error`] with one variant per failure mode
//! - Step-specific errors for the API, download, extraction and conversion stages
//! - Machine-readable error codes for callers that report failures programmatically

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tcs-downloader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tcs-downloader
///
/// Each pipeline step surfaces its failure through this type; no step retries
/// or recovers on its own.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is invalid (empty tender id, missing URL, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// The procurement API could not be queried or returned an unusable payload
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No PBC or invitation letter is available
    #[error("document not found: {message}")]
    DocumentNotFound {
        /// Human-readable description of what was searched
        message: String,
        /// Labels or file names that were available instead
        available: Vec<String>,
    },

    /// Download-related error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive extraction error
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// DOC/DOCX to PDF conversion error
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// File type the pipeline cannot turn into a PDF
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Final output path is taken and the collision action forbids replacing it
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// The reason for the collision
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External tool execution failed (pandoc, PDF engine)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, not implemented, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Errors raised while querying the procurement API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or non-success HTTP status
    #[error("request for tender {tender_id} failed: {reason}")]
    RequestFailed {
        /// The tender that was queried
        tender_id: String,
        /// Underlying transport or status error
        reason: String,
    },

    /// The response body is not valid JSON
    #[error("invalid JSON for tender {tender_id}: {reason}")]
    InvalidJson {
        /// The tender that was queried
        tender_id: String,
        /// Parser error
        reason: String,
    },

    /// The JSON payload lacks `tender.documents`
    #[error("unexpected response structure for tender {tender_id}")]
    UnexpectedShape {
        /// The tender that was queried
        tender_id: String,
    },

    /// The configured base URL cannot be used to build a request URL
    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser error
        reason: String,
    },
}

/// Errors raised while downloading a document
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transport failure or non-success HTTP status
    #[error("failed to download {title}: {reason}")]
    RequestFailed {
        /// Document title
        title: String,
        /// Underlying transport or status error
        reason: String,
    },

    /// The server answered with an empty body
    #[error("downloaded file is empty: {title}")]
    EmptyFile {
        /// Document title
        title: String,
    },

    /// The body could not be written to disk
    #[error("failed to save {path}: {reason}")]
    WriteFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },
}

/// Errors raised while extracting a document from an archive
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The archive path does not exist
    #[error("{format} archive does not exist: {archive}")]
    ArchiveNotFound {
        /// Archive format name ("ZIP", "RAR")
        format: &'static str,
        /// The missing archive
        archive: PathBuf,
    },

    /// The file is not a readable archive of the expected format
    #[error("not a valid {format} archive: {archive}: {reason}")]
    InvalidArchive {
        /// Archive format name ("ZIP", "RAR")
        format: &'static str,
        /// The unreadable archive
        archive: PathBuf,
        /// Library error
        reason: String,
    },

    /// The archive has no entries
    #[error("{format} archive is empty: {archive}")]
    EmptyArchive {
        /// Archive format name ("ZIP", "RAR")
        format: &'static str,
        /// The empty archive
        archive: PathBuf,
    },

    /// No entry in the archive is a PBC or invitation letter
    #[error(
        "no PBC or invitation letter found in {format} archive {archive}; available files: {}",
        available.join(", ")
    )]
    NoMatchingDocument {
        /// Archive format name ("ZIP", "RAR")
        format: &'static str,
        /// The scanned archive
        archive: PathBuf,
        /// Base names of every entry in the archive
        available: Vec<String>,
    },

    /// The matching entry could not be written out
    #[error("failed to extract {entry} from {archive}: {reason}")]
    EntryFailed {
        /// The archive being read
        archive: PathBuf,
        /// Entry name inside the archive
        entry: String,
        /// Underlying error
        reason: String,
    },
}

/// Errors raised while converting a document to PDF
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input document does not exist
    #[error("input document does not exist: {0}")]
    InputNotFound(PathBuf),

    /// Every conversion strategy failed
    #[error("could not convert {input} to PDF; errors: {}", errors.join("; "))]
    AllStrategiesFailed {
        /// The document that could not be converted
        input: PathBuf,
        /// One `strategy: reason` entry per attempt
        errors: Vec<String>,
    },
}

impl Error {
    /// Whether this error means "the wanted document does not exist"
    ///
    /// True both when the API listing has no PBC/invitation and when an
    /// archive contains no matching entry.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::DocumentNotFound { .. }
                | Error::Extraction(ExtractionError::NoMatchingDocument { .. })
        )
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Api(e) => match e {
                ApiError::RequestFailed { .. } => "api_request_failed",
                ApiError::InvalidJson { .. } => "api_invalid_json",
                ApiError::UnexpectedShape { .. } => "api_unexpected_shape",
                ApiError::InvalidUrl { .. } => "api_invalid_url",
            },
            Error::DocumentNotFound { .. } => "document_not_found",
            Error::Download(e) => match e {
                DownloadError::RequestFailed { .. } => "download_failed",
                DownloadError::EmptyFile { .. } => "download_empty",
                DownloadError::WriteFailed { .. } => "download_write_failed",
            },
            Error::Extraction(e) => match e {
                ExtractionError::ArchiveNotFound { .. } => "archive_not_found",
                ExtractionError::InvalidArchive { .. } => "invalid_archive",
                ExtractionError::EmptyArchive { .. } => "empty_archive",
                ExtractionError::NoMatchingDocument { .. } => "no_matching_document",
                ExtractionError::EntryFailed { .. } => "extraction_failed",
            },
            Error::Conversion(e) => match e {
                ConversionError::InputNotFound(_) => "conversion_input_not_found",
                ConversionError::AllStrategiesFailed { .. } => "conversion_failed",
            },
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::FileCollision { .. } => "file_collision",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
        }
    }
}
