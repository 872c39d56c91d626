//! CLI-based converter using the external pandoc binary

use super::traits::DocumentConverter;
use crate::config::ToolsConfig;
use crate::error::{ConversionError, Error};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One way of producing a PDF with pandoc
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// DOCX → PDF with the configured PDF engine
    PreferredEngine,
    /// DOCX → PDF with pandoc's default engine
    PandocDefault,
    /// DOCX → HTML → PDF
    ViaHtml,
    /// DOCX → HTML → PDF rendered by weasyprint
    Weasyprint,
}

impl ConversionStrategy {
    /// Attempt order
    pub const ALL: [ConversionStrategy; 4] = [
        Self::PreferredEngine,
        Self::PandocDefault,
        Self::ViaHtml,
        Self::Weasyprint,
    ];

    fn label<'a>(self, pdf_engine: &'a str) -> &'a str {
        match self {
            Self::PreferredEngine => pdf_engine,
            Self::PandocDefault => "pandoc default",
            Self::ViaHtml => "via HTML",
            Self::Weasyprint => "weasyprint",
        }
    }
}

/// CLI-based converter using the external pandoc binary
///
/// Tries every [`ConversionStrategy`] in order and returns the first one that
/// produces a non-empty PDF.
///
/// # Examples
///
/// ```no_run
/// use tcs_downloader::conversion::{DocumentConverter, PandocConverter};
/// use std::path::{Path, PathBuf};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Create with explicit path
/// let converter = PandocConverter::new(PathBuf::from("/usr/bin/pandoc"));
///
/// // Or auto-discover from PATH
/// let converter = PandocConverter::from_path()
///     .expect("pandoc not found in PATH");
///
/// let pdf = converter.convert_to_pdf(Path::new("carta.docx"), Path::new("/tmp")).await?;
/// # Ok(())
/// # }
/// ```
pub struct PandocConverter {
    binary_path: PathBuf,
    pdf_engine: String,
    tex_search_paths: Vec<PathBuf>,
    timeout: Duration,
}

impl PandocConverter {
    /// Create a new converter with an explicit binary path and default settings
    pub fn new(binary_path: PathBuf) -> Self {
        Self::with_tools(binary_path, &ToolsConfig::default())
    }

    /// Attempt to find pandoc in PATH
    pub fn from_path() -> Option<Self> {
        which::which("pandoc").ok().map(Self::new)
    }

    /// Create a converter from configuration
    ///
    /// Uses `pandoc_path` when set, otherwise searches PATH if `search_path`
    /// is enabled. Returns `None` when no binary is available.
    pub fn from_config(tools: &ToolsConfig) -> Option<Self> {
        let binary_path = match &tools.pandoc_path {
            Some(path) => path.clone(),
            None if tools.search_path => which::which("pandoc").ok()?,
            None => return None,
        };
        Some(Self::with_tools(binary_path, tools))
    }

    fn with_tools(binary_path: PathBuf, tools: &ToolsConfig) -> Self {
        Self {
            binary_path,
            pdf_engine: tools.pdf_engine.clone(),
            tex_search_paths: tools.tex_search_paths.clone(),
            timeout: tools.conversion_timeout,
        }
    }

    /// Set the PDF engine used by the first strategy
    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    /// Set the maximum run time of a single pandoc invocation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the pandoc binary this converter runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// PATH for the child process with existing TeX directories prepended
    ///
    /// Returns `None` when nothing needs to be added.
    fn child_path_env(&self) -> Option<OsString> {
        let current = std::env::var_os("PATH").unwrap_or_default();
        let mut dirs: Vec<PathBuf> = std::env::split_paths(&current).collect();
        let mut added = false;

        for extra in &self.tex_search_paths {
            if extra.is_dir() && !dirs.contains(extra) {
                dirs.insert(0, extra.clone());
                added = true;
            }
        }

        if added {
            std::env::join_paths(dirs).ok()
        } else {
            None
        }
    }

    /// Run pandoc once; non-zero exit, spawn failure and timeout are errors
    async fn run_pandoc(&self, args: &[&OsStr]) -> crate::Result<()> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args).kill_on_drop(true);
        if let Some(path) = self.child_path_env() {
            cmd.env("PATH", path);
        }

        debug!(binary = ?self.binary_path, ?args, "running pandoc");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                Error::ExternalTool(format!(
                    "pandoc timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| Error::ExternalTool(format!("Failed to execute pandoc: {}", e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::ExternalTool(format!(
                "pandoc exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }

    /// Run one strategy, writing `pdf_path`
    async fn run_strategy(
        &self,
        strategy: ConversionStrategy,
        input: &Path,
        pdf_path: &Path,
    ) -> crate::Result<()> {
        let engine_arg = OsString::from(format!("--pdf-engine={}", self.pdf_engine));
        let output_flag = OsStr::new("-o");

        match strategy {
            ConversionStrategy::PreferredEngine => {
                self.run_pandoc(&[
                    input.as_os_str(),
                    output_flag,
                    pdf_path.as_os_str(),
                    engine_arg.as_os_str(),
                ])
                .await
            }
            ConversionStrategy::PandocDefault => {
                self.run_pandoc(&[input.as_os_str(), output_flag, pdf_path.as_os_str()])
                    .await
            }
            ConversionStrategy::ViaHtml | ConversionStrategy::Weasyprint => {
                let html_path = pdf_path.with_extension("html");
                let weasyprint = OsStr::new("--pdf-engine=weasyprint");

                let result: crate::Result<()> = async {
                    self.run_pandoc(&[input.as_os_str(), output_flag, html_path.as_os_str()])
                        .await?;

                    let mut args = vec![html_path.as_os_str(), output_flag, pdf_path.as_os_str()];
                    if strategy == ConversionStrategy::Weasyprint {
                        args.push(weasyprint);
                    }
                    self.run_pandoc(&args).await
                }
                .await;

                // Intermediate HTML never outlives the attempt
                let _ = tokio::fs::remove_file(&html_path).await;
                result
            }
        }
    }
}

#[async_trait]
impl DocumentConverter for PandocConverter {
    async fn convert_to_pdf(&self, input: &Path, output_dir: &Path) -> crate::Result<PathBuf> {
        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()).into());
        }

        tokio::fs::create_dir_all(output_dir).await?;

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let pdf_path = output_dir.join(format!("{}.pdf", stem));

        let mut errors = Vec::new();

        for (i, strategy) in ConversionStrategy::ALL.into_iter().enumerate() {
            let label = strategy.label(&self.pdf_engine);
            debug!(
                ?input,
                attempt = i + 1,
                total = ConversionStrategy::ALL.len(),
                strategy = label,
                "trying conversion strategy"
            );

            // A leftover from a failed attempt must not count as success
            let _ = tokio::fs::remove_file(&pdf_path).await;

            match self.run_strategy(strategy, input, &pdf_path).await {
                Ok(()) => match tokio::fs::metadata(&pdf_path).await {
                    Ok(meta) if meta.len() > 0 => {
                        info!(
                            ?input,
                            pdf = ?pdf_path,
                            strategy = label,
                            "converted document to PDF"
                        );
                        return Ok(pdf_path);
                    }
                    _ => {
                        warn!(?input, strategy = label, "conversion produced an empty PDF");
                        errors.push(format!("{}: PDF generated but empty", label));
                    }
                },
                Err(e) => {
                    warn!(?input, strategy = label, error = %e, "conversion attempt failed");
                    errors.push(format!("{}: {}", label, e));
                }
            }
        }

        Err(ConversionError::AllStrategiesFailed {
            input: input.to_path_buf(),
            errors,
        }
        .into())
    }

    fn name(&self) -> &'static str {
        "cli-pandoc"
    }
}
