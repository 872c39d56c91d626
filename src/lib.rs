//! # tcs-downloader
//!
//! Fetches the bidding document of a Paraguayan public tender from the DNCP
//! API and stores it as a PDF.
//!
//! ## Pipeline
//!
//! 1. List the tender's documents (`GET {base_url}/tender/{id}`)
//! 2. Select the PBC ("Pliego de Bases y Condiciones") or invitation letter
//! 3. Download it into a per-run temporary directory
//! 4. Extract it if it arrived inside a ZIP or RAR archive
//! 5. Convert DOC/DOCX to PDF with pandoc
//! 6. Store `<title>.pdf` in the output directory
//!
//! ## Quick Start
//!
//! ```no_run
//! use tcs_downloader::{Config, TcsDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = TcsDownloader::new(Config::default())?;
//!
//!     match downloader.process_tender_documents("440437", "./pliegos").await {
//!         Ok(pdf) => println!("saved {}", pdf.display()),
//!         Err(e) if e.is_not_found() => println!("tender has no PBC: {e}"),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// DNCP API client
pub mod client;
/// Configuration types
pub mod config;
/// DOC/DOCX to PDF conversion
pub mod conversion;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// End-to-end pipeline
pub mod pipeline;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;
/// Document name and category matching
pub mod validation;

// Re-export commonly used types
pub use client::DncpClient;
pub use config::{ApiConfig, Config, FileCollisionAction, OutputConfig, ToolsConfig};
pub use conversion::{DocumentConverter, NoOpConverter, PandocConverter};
pub use error::{
    ApiError, ConversionError, DownloadError, Error, ExtractionError, Result,
};
pub use pipeline::TcsDownloader;
pub use types::{ArchiveType, Document, DocumentFormat, TenderId};
pub use validation::{check_document_mime_type, is_valid_document, select_document};
