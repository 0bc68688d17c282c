//! HTML → PDF engine: the one call that turns generated HTML into PDF bytes.
//!
//! Layout, image scaling and the PDF file format all belong to the engine.
//! This crate only hands it a document and collects what comes back.
//! [`PdfEngine`] is the seam, so tests and library users can plug in their own
//! renderer. [`ChromeEngine`] is the default: it drives a local Chrome/Chromium
//! with `--headless --print-to-pdf`.
//!
//! ## Why write the HTML to disk?
//!
//! Headless Chrome prints a URL, not stdin. The document goes into a
//! `TempDir` next to the PDF Chrome writes, and both are removed when the
//! directory drops, even if the engine fails. Page images are referenced by
//! absolute `file://` URIs, so the temp location does not affect them.

use crate::error::HtmlPdfError;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

/// Converts a complete HTML document to PDF.
///
/// Implementations are called from a blocking thread
/// (`tokio::task::spawn_blocking`) and may block freely.
pub trait PdfEngine: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Render `html` and write the PDF bytes into `sink`.
    ///
    /// # Returns
    /// Number of bytes written.
    fn convert(&self, html: &str, sink: &mut dyn Write) -> Result<u64, HtmlPdfError>;
}

/// Maximum stderr bytes quoted in [`HtmlPdfError::EngineFailed`].
const STDERR_TAIL: usize = 600;

const HTML_FILE: &str = "document.html";
const PDF_FILE: &str = "document.pdf";

/// Headless Chrome/Chromium printing via `--print-to-pdf`.
#[derive(Debug, Clone)]
pub struct ChromeEngine {
    executable: PathBuf,
}

impl ChromeEngine {
    /// Use a specific executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Use a user-supplied executable, validating that it exists.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HtmlPdfError> {
        chrome_locate::validate_chrome_path(path)
            .map(Self::new)
            .map_err(|e| HtmlPdfError::EngineNotFound(e.to_string()))
    }

    /// Discover Chrome via [`chrome_locate::find_chrome`].
    pub fn discover() -> Result<Self, HtmlPdfError> {
        chrome_locate::find_chrome()
            .map(Self::new)
            .map_err(|e| HtmlPdfError::EngineNotFound(e.to_string()))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Command-line arguments for printing `html_url` into `pdf_path`.
    fn print_args(html_url: &str, pdf_path: &Path, profile_dir: &Path) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--disable-extensions".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--allow-file-access-from-files".to_string(),
            "--no-pdf-header-footer".to_string(),
            "--print-to-pdf-no-header".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            format!("--print-to-pdf={}", pdf_path.display()),
            html_url.to_string(),
        ]
    }
}

impl PdfEngine for ChromeEngine {
    fn name(&self) -> &str {
        "chrome"
    }

    fn convert(&self, html: &str, sink: &mut dyn Write) -> Result<u64, HtmlPdfError> {
        let work = TempDir::new().map_err(|e| HtmlPdfError::Internal(format!("tempdir: {e}")))?;
        let html_path = work.path().join(HTML_FILE);
        let pdf_path = work.path().join(PDF_FILE);
        let profile_dir = work.path().join("profile");

        std::fs::write(&html_path, html)
            .map_err(|e| HtmlPdfError::Internal(format!("Failed to write temp HTML: {e}")))?;

        let html_url = url::Url::from_file_path(&html_path)
            .map_err(|()| HtmlPdfError::InvalidPageUri {
                path: html_path.clone(),
            })?;

        let args = Self::print_args(html_url.as_str(), &pdf_path, &profile_dir);
        info!("Printing with {}", self.executable.display());
        debug!("Engine args: {:?}", args);

        let output = Command::new(&self.executable)
            .args(&args)
            .output()
            .map_err(|e| HtmlPdfError::EngineFailed {
                engine: self.name().to_string(),
                detail: format!("could not start '{}': {e}", self.executable.display()),
            })?;

        if !output.status.success() {
            return Err(HtmlPdfError::EngineFailed {
                engine: self.name().to_string(),
                detail: format!("{}: {}", output.status, stderr_tail(&output.stderr)),
            });
        }

        // Chrome exits 0 on some load failures without writing anything.
        let mut pdf = File::open(&pdf_path).map_err(|e| HtmlPdfError::EngineFailed {
            engine: self.name().to_string(),
            detail: format!("no PDF produced ({e}): {}", stderr_tail(&output.stderr)),
        })?;

        let written = io::copy(&mut pdf, sink).map_err(|e| {
            HtmlPdfError::Internal(format!("Failed to copy engine output: {e}"))
        })?;
        debug!("Engine produced {} bytes", written);

        Ok(written)
    }
}

/// Last [`STDERR_TAIL`] bytes of the engine's stderr, lossily decoded.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        return "no stderr output".to_string();
    }
    if text.len() <= STDERR_TAIL {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("\u{2026}{}", &text[start..])
}
