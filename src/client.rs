//! HTTP client for the DNCP document API

use crate::config::ApiConfig;
use crate::error::{ApiError, DownloadError, Error, Result};
use crate::types::{Document, TenderId};
use crate::utils::safe_file_name;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Wire shape of `GET /tender/{id}`
#[derive(Debug, Deserialize)]
struct TenderResponse {
    tender: Option<TenderDocuments>,
}

#[derive(Debug, Deserialize)]
struct TenderDocuments {
    documents: Option<Vec<Document>>,
}

/// Client for listing and downloading tender documents
#[derive(Clone, Debug)]
pub struct DncpClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DncpClient {
    /// Create a client from API configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "Failed to create HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are built from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tender_url(&self, tender_id: &TenderId) -> Result<url::Url> {
        let raw = format!(
            "{}/tender/{}",
            self.base_url,
            urlencoding::encode(tender_id.as_str())
        );
        url::Url::parse(&raw).map_err(|e| {
            ApiError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Fetch the document list of a tender
    ///
    /// # Errors
    ///
    /// - [`ApiError`] on transport failure, non-success status, invalid JSON
    ///   or a payload without `tender.documents`
    /// - [`Error::DocumentNotFound`] if the tender has no documents
    pub async fn get_document_list(&self, tender_id: &TenderId) -> Result<Vec<Document>> {
        let url = self.tender_url(tender_id)?;
        let request_failed = |reason: String| ApiError::RequestFailed {
            tender_id: tender_id.to_string(),
            reason,
        };

        debug!(%tender_id, %url, "fetching tender documents");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_failed(format!("HTTP {}", status)).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| request_failed(e.to_string()))?;

        let payload: TenderResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson {
                tender_id: tender_id.to_string(),
                reason: e.to_string(),
            })?;

        let documents = payload
            .tender
            .and_then(|t| t.documents)
            .ok_or_else(|| ApiError::UnexpectedShape {
                tender_id: tender_id.to_string(),
            })?;

        if documents.is_empty() {
            return Err(Error::DocumentNotFound {
                message: format!("no documents found for tender {}", tender_id),
                available: Vec::new(),
            });
        }

        info!(%tender_id, count = documents.len(), "fetched document list");
        Ok(documents)
    }

    /// Download a document into `dest_dir`
    ///
    /// The file is named after the last path component of the document's
    /// title. Returns the written path.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the document has no URL or usable title, or
    ///   the URL does not parse
    /// - [`DownloadError`] on transport failure, non-success status, an empty
    ///   body or a failed write
    pub async fn download_document(&self, document: &Document, dest_dir: &Path) -> Result<PathBuf> {
        let raw_url = document
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::Validation("document has no download URL".to_string()))?;
        let title = document
            .title
            .as_deref()
            .ok_or_else(|| Error::Validation("document has no title".to_string()))?;
        let file_name = safe_file_name(title).ok_or_else(|| {
            Error::Validation(format!("document title is not a usable file name: {:?}", title))
        })?;
        let url = url::Url::parse(raw_url.trim())
            .map_err(|e| Error::Validation(format!("invalid document URL {}: {}", raw_url, e)))?;

        let request_failed = |reason: String| DownloadError::RequestFailed {
            title: title.to_string(),
            reason,
        };

        debug!(%title, %url, ?dest_dir, "downloading document");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_failed(format!("HTTP {}", status)).into());
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| request_failed(e.to_string()))?;

        if content.is_empty() {
            return Err(DownloadError::EmptyFile {
                title: title.to_string(),
            }
            .into());
        }

        let path = dest_dir.join(&file_name);
        let write_failed = |e: std::io::Error| DownloadError::WriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        };
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(write_failed)?;
        tokio::fs::write(&path, &content)
            .await
            .map_err(write_failed)?;

        info!(%title, path = ?path, bytes = content.len(), "downloaded document");
        Ok(path)
    }
}
