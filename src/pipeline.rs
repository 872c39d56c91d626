//! End-to-end pipeline: list → select → download → extract → convert → store

use crate::client::DncpClient;
use crate::config::Config;
use crate::conversion::{DocumentConverter, converter_from_config};
use crate::error::{Error, Result};
use crate::extraction;
use crate::types::{Document, DocumentFormat, TenderId};
use crate::utils::{get_unique_path, safe_file_name};
use crate::validation;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// Downloads the PBC or invitation letter of a tender and stores it as PDF
///
/// Every step runs in sequence and the first failure aborts the run.
/// Intermediate files live in a per-run temporary directory that is removed
/// when the run ends, whether it succeeded or not.
///
/// # Examples
///
/// ```no_run
/// use tcs_downloader::{Config, TcsDownloader};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = TcsDownloader::new(Config::default())?;
/// let pdf = downloader.process_tender_documents("440437", "./pliegos").await?;
/// println!("saved {}", pdf.display());
/// # Ok(())
/// # }
/// ```
pub struct TcsDownloader {
    config: Config,
    client: DncpClient,
    converter: Arc<dyn DocumentConverter>,
}

impl TcsDownloader {
    /// Create a downloader; pandoc is located according to `config.tools`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        let client = DncpClient::new(&config.api)?;
        let converter = converter_from_config(&config.tools);
        info!(
            api = client.base_url(),
            converter = converter.name(),
            "tcs-downloader initialized"
        );

        Ok(Self {
            config,
            client,
            converter,
        })
    }

    /// Replace the DOC/DOCX converter
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the document list of a tender
    pub async fn get_document_list(&self, tender_id: impl Display) -> Result<Vec<Document>> {
        let tender_id = TenderId::new(tender_id)?;
        self.client.get_document_list(&tender_id).await
    }

    /// Pick the PBC or invitation letter from a document list
    pub fn select_document<'a>(&self, documents: &'a [Document]) -> Result<&'a Document> {
        validation::select_document(documents)
    }

    /// Download a document into `dest_dir`
    pub async fn download_document(&self, document: &Document, dest_dir: &Path) -> Result<PathBuf> {
        self.client.download_document(document, dest_dir).await
    }

    /// Extract the PBC or invitation letter from a ZIP/RAR archive
    pub async fn extract_document(&self, archive_path: &Path, dest_path: &Path) -> Result<PathBuf> {
        extraction::extract_document(archive_path, dest_path).await
    }

    /// Convert a DOC/DOCX document to PDF in `output_dir`
    pub async fn convert_docx_to_pdf(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        self.converter.convert_to_pdf(input, output_dir).await
    }

    /// Run the whole pipeline for one tender
    ///
    /// The PDF is stored as `output_dir/<stem of the document title>.pdf`;
    /// an existing file is handled per `output.file_collision`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty tender id or an unusable `output_dir`
    /// - [`Error::DocumentNotFound`] or
    ///   [`ExtractionError::NoMatchingDocument`](crate::error::ExtractionError::NoMatchingDocument)
    ///   when the tender has no PBC or invitation letter
    /// - [`Error::UnsupportedFormat`] when the document is neither PDF, DOC/DOCX
    ///   nor a ZIP/RAR archive holding one
    /// - any error of the download, extraction or conversion step
    pub async fn process_tender_documents(
        &self,
        tender_id: impl Display,
        output_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let tender_id = TenderId::new(tender_id)?;
        let output_dir = output_dir.as_ref();
        if output_dir.as_os_str().is_empty() {
            return Err(Error::Validation("output_dir must not be empty".to_string()));
        }
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            Error::Validation(format!(
                "cannot create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        info!(%tender_id, ?output_dir, "processing tender documents");

        let documents = self.client.get_document_list(&tender_id).await?;
        let document = validation::select_document(&documents)?;
        let title = document.title.as_deref().unwrap_or_default();
        info!(
            %tender_id,
            %title,
            category = document.document_type_details.as_deref().unwrap_or_default(),
            "selected document"
        );

        let workspace = self.create_workspace()?;
        debug!(%tender_id, workspace = ?workspace.path(), "created temporary workspace");

        let downloaded = self
            .client
            .download_document(document, workspace.path())
            .await?;

        let pdf = match DocumentFormat::from_path(&downloaded) {
            Some(format) if format.archive_type().is_some() => {
                info!(%tender_id, archive = ?downloaded, "extracting document from archive");
                let extracted = extraction::extract_document(
                    &downloaded,
                    &workspace.path().join("extracted"),
                )
                .await?;
                self.ensure_pdf(&extracted, workspace.path()).await?
            }
            _ => self.ensure_pdf(&downloaded, workspace.path()).await?,
        };

        let final_path = self.final_path(output_dir, title, &downloaded)?;
        tokio::fs::copy(&pdf, &final_path).await?;

        info!(%tender_id, path = ?final_path, "stored PDF");
        Ok(final_path)
    }

    fn create_workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tcs-downloader-");
        let workspace = match &self.config.output.temp_dir {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(workspace)
    }

    /// Turn a PDF or DOC/DOCX file into a PDF path
    async fn ensure_pdf(&self, file: &Path, workspace: &Path) -> Result<PathBuf> {
        match DocumentFormat::from_path(file) {
            Some(DocumentFormat::Pdf) => Ok(file.to_path_buf()),
            Some(format) if format.needs_conversion() => {
                info!(input = ?file, converter = self.converter.name(), "converting to PDF");
                self.converter
                    .convert_to_pdf(file, &workspace.join("converted"))
                    .await
            }
            _ => Err(Error::UnsupportedFormat(format!(
                "cannot produce a PDF from {}",
                file.display()
            ))),
        }
    }

    fn final_path(&self, output_dir: &Path, title: &str, downloaded: &Path) -> Result<PathBuf> {
        let name = safe_file_name(title);
        let stem = name
            .as_deref()
            .map(Path::new)
            .unwrap_or(downloaded)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        get_unique_path(
            &output_dir.join(format!("{}.pdf", stem)),
            self.config.output.file_collision,
        )
    }
}
