//! Configuration types for tcs-downloader

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// DNCP API client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the document API; tenders are fetched from `{base_url}/tender/{id}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for API queries and document downloads (default: 60 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// External tool paths (pandoc, PDF engine) used for DOC/DOCX conversion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to pandoc executable (auto-detected if None)
    #[serde(default)]
    pub pandoc_path: Option<PathBuf>,

    /// Whether to search PATH for pandoc if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// PDF engine tried first (default: "pdflatex")
    #[serde(default = "default_pdf_engine")]
    pub pdf_engine: String,

    /// Directories prepended to the converter's PATH when they exist
    ///
    /// Covers TeX installations that are not on PATH by default (MacTeX, TeX Live, Homebrew).
    #[serde(default = "default_tex_search_paths")]
    pub tex_search_paths: Vec<PathBuf>,

    /// Maximum run time of a single converter invocation (default: 120 seconds)
    #[serde(default = "default_conversion_timeout", with = "duration_serde")]
    pub conversion_timeout: Duration,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pandoc_path: None,
            search_path: true,
            pdf_engine: default_pdf_engine(),
            tex_search_paths: default_tex_search_paths(),
            conversion_timeout: default_conversion_timeout(),
        }
    }
}

/// Where and how final PDFs and temporary files are written
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// What to do when the final PDF already exists (default: overwrite)
    #[serde(default)]
    pub file_collision: FileCollisionAction,

    /// Root for per-run temporary workspaces (system temp dir if None)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

/// Main configuration for [`TcsDownloader`](crate::TcsDownloader)
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// API client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// External converter settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Output and temporary file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Parse a configuration from JSON; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if the
    /// JSON is malformed or a field has the wrong type
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if
    /// serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to filename
    Rename,
    /// Overwrite existing file (default)
    #[default]
    Overwrite,
    /// Refuse to write, keep existing
    Skip,
}

fn default_base_url() -> String {
    "https://www.contrataciones.gov.py/datos/api/v3/doc".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    format!("tcs-downloader/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn default_pdf_engine() -> String {
    "pdflatex".to_string()
}

fn default_tex_search_paths() -> Vec<PathBuf> {
    [
        "/Library/TeX/texbin",
        "/usr/local/texlive/2023/bin/universal-darwin",
        "/usr/local/texlive/2024/bin/universal-darwin",
        "/opt/homebrew/bin",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

fn default_conversion_timeout() -> Duration {
    Duration::from_secs(120)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
