//! Conversion entry points: validate, resolve, render, write.
//!
//! A run moves through fixed stages and stops at the first error:
//!
//! ```text
//! collect ─▶ validate pages ─▶ resolve output ─▶ resolve pages
//!         ─▶ confirm ─▶ render HTML ─▶ write PDF ─▶ done
//! ```
//!
//! Nothing touches the output location until every check has passed. The PDF
//! file is opened with exclusive-create semantics, so an existing file is
//! never overwritten. If the engine fails after the file was created, this
//! run removes it again, so no half-written PDF is left behind.

use crate::config::ConversionConfig;
use crate::error::HtmlPdfError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::engine::{ChromeEngine, PdfEngine};
use crate::pipeline::pages::resolve_pages;
use crate::pipeline::target::OutputTarget;
use crate::pipeline::template;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The verb passed to the confirmation gate.
pub const CREATE_ACTION: &str = "Create";

/// Output buffer between the engine and the PDF file.
const WRITE_BUFFER: usize = 16 * 1024;

/// Accumulates page expressions as they arrive (arguments, stdin lines, …).
///
/// Nothing is resolved while collecting; order of arrival is page order.
#[derive(Debug, Clone, Default)]
pub struct PageCollector {
    pages: Vec<String>,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: impl Into<String>) {
        self.pages.push(page.into());
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// End of input. Fails with [`HtmlPdfError::NoPages`] if nothing arrived.
    pub fn finish(self) -> Result<Vec<String>, HtmlPdfError> {
        if self.pages.is_empty() {
            Err(HtmlPdfError::NoPages)
        } else {
            Ok(self.pages)
        }
    }
}

impl<S: Into<String>> Extend<S> for PageCollector {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.pages.extend(iter.into_iter().map(Into::into));
    }
}

/// Convert page images into a single PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `pages`: page expressions (paths or wildcard patterns), in page order
/// * `output`: where to write; may be `None` only when nothing will be written
/// * `config`: title, geometry, dry-run / confirmation, engine
///
/// # Returns
/// `Ok(ConversionOutput)` with the generated HTML, whether or not a PDF was
/// written (check `output.written`).
///
/// # Errors
/// - [`HtmlPdfError::NoPages`] before anything else is looked at
/// - any output-path error from [`OutputTarget::resolve`]
/// - [`HtmlPdfError::PagesNotFound`] listing every unresolved expression
/// - [`HtmlPdfError::OutputExists`], engine and write errors when writing
pub async fn out_pdf<S: AsRef<str>>(
    pages: &[S],
    output: Option<&OutputTarget>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, HtmlPdfError> {
    let total_start = Instant::now();

    // ── Step 1: Validate page list ───────────────────────────────────────
    if pages.is_empty() {
        return Err(HtmlPdfError::NoPages);
    }
    info!("Starting conversion of {} page expression(s)", pages.len());

    // ── Step 2: Resolve output path ──────────────────────────────────────
    let resolve_start = Instant::now();
    let output_path = output.map(OutputTarget::resolve).transpose()?;
    if let Some(ref p) = output_path {
        info!("Output: {}", p.display());
    }

    // ── Step 3: Resolve pages ────────────────────────────────────────────
    let resolved = resolve_pages(pages).into_result()?;
    if resolved.is_empty() {
        return Err(HtmlPdfError::NoPages);
    }
    let resolve_duration_ms = resolve_start.elapsed().as_millis() as u64;
    info!("Resolved {} page file(s)", resolved.len());

    // ── Step 4: Confirmation gate ────────────────────────────────────────
    let write_to = confirm_write(output_path.as_deref(), config)?;

    // ── Step 5: Render HTML ──────────────────────────────────────────────
    let html = template::render_pages(
        &resolved,
        &config.title,
        config.page_size,
        config.orientation,
    )?;
    debug!("Generated HTML:\n{}", html);

    let mut stats = ConversionStats {
        page_count: resolved.len(),
        resolve_duration_ms,
        ..ConversionStats::default()
    };

    let Some(path) = write_to else {
        info!("Dry run: no file written");
        stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
        return Ok(ConversionOutput {
            html,
            output_path,
            pages: resolved,
            written: false,
            bytes_written: 0,
            stats,
        });
    };

    // ── Step 6: Write PDF ────────────────────────────────────────────────
    let engine = resolve_engine(config)?;
    let file = create_exclusive(&path)?;

    let engine_start = Instant::now();
    let task_path = path.clone();
    let task_html = html.clone();
    let joined = tokio::task::spawn_blocking(move || {
        write_pdf(engine.as_ref(), &task_html, file, &task_path)
    })
    .await;
    stats.engine_duration_ms = engine_start.elapsed().as_millis() as u64;

    // The file handle has been dropped on every branch by now.
    let bytes_written = match joined {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            discard_partial(&path);
            return Err(e);
        }
        Err(e) => {
            discard_partial(&path);
            return Err(HtmlPdfError::Internal(format!("Engine task panicked: {}", e)));
        }
    };

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Wrote {} ({} pages, {} bytes) in {}ms",
        path.display(),
        stats.page_count,
        bytes_written,
        stats.total_duration_ms
    );

    Ok(ConversionOutput {
        html,
        output_path,
        pages: resolved,
        written: true,
        bytes_written,
        stats,
    })
}

/// Synchronous wrapper around [`out_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn out_pdf_sync<S: AsRef<str>>(
    pages: &[S],
    output: Option<&OutputTarget>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, HtmlPdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| HtmlPdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(out_pdf(pages, output, config))
}

/// Resolve the pages and render the HTML, without any output path or engine.
pub fn render_html<S: AsRef<str>>(
    pages: &[S],
    config: &ConversionConfig,
) -> Result<String, HtmlPdfError> {
    if pages.is_empty() {
        return Err(HtmlPdfError::NoPages);
    }
    let resolved = resolve_pages(pages).into_result()?;
    template::render_pages(&resolved, &config.title, config.page_size, config.orientation)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Decide whether this run writes, and where.
///
/// `dry_run` wins over everything. A write needs a target; with one, the
/// optional gate gets the final say.
fn confirm_write(
    output_path: Option<&Path>,
    config: &ConversionConfig,
) -> Result<Option<PathBuf>, HtmlPdfError> {
    if config.dry_run {
        return Ok(None);
    }

    let path = output_path.ok_or_else(|| {
        HtmlPdfError::InvalidArgument("no output path given; pass --path or --literal-path".into())
    })?;

    if let Some(ref gate) = config.confirm {
        if !gate.should_process(path, CREATE_ACTION) {
            info!("Write to {} declined", path.display());
            return Ok(None);
        }
    }

    Ok(Some(path.to_path_buf()))
}

/// Pick the engine, from most-specific to least-specific: a pre-built engine,
/// an explicit Chrome path, then discovery.
fn resolve_engine(config: &ConversionConfig) -> Result<Arc<dyn PdfEngine>, HtmlPdfError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }
    let chrome = match config.chrome_path {
        Some(ref path) => ChromeEngine::from_path(path)?,
        None => ChromeEngine::discover()?,
    };
    debug!("Using Chrome at {}", chrome.executable().display());
    Ok(Arc::new(chrome))
}

/// Open `path` for writing, failing if anything already exists there.
fn create_exclusive(path: &Path) -> Result<File, HtmlPdfError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                HtmlPdfError::OutputExists {
                    path: path.to_path_buf(),
                }
            } else {
                HtmlPdfError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })
}

/// Run the engine into `file`. The file is closed when this returns.
fn write_pdf(
    engine: &dyn PdfEngine,
    html: &str,
    file: File,
    path: &Path,
) -> Result<u64, HtmlPdfError> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER, file);
    let written = engine.convert(html, &mut writer)?;
    let file = writer
        .into_inner()
        .map_err(|e| HtmlPdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e.into_error(),
        })?;
    file.sync_all().map_err(|e| HtmlPdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(written)
}

/// Remove a file this run created before failing.
fn discard_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not remove incomplete {}: {}", path.display(), e);
    } else {
        debug!("Removed incomplete {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::NeverConfirm;

    #[test]
    fn collector_keeps_arrival_order() {
        let mut c = PageCollector::new();
        c.push("b.png");
        c.extend(["a.png", "c.png"]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.finish().unwrap(), vec!["b.png", "a.png", "c.png"]);
    }

    #[test]
    fn empty_collector_is_no_pages() {
        let c = PageCollector::new();
        assert!(c.is_empty());
        assert!(matches!(c.finish().unwrap_err(), HtmlPdfError::NoPages));
    }

    #[test]
    fn dry_run_needs_no_target() {
        let config = ConversionConfig::builder().dry_run(true).build().unwrap();
        assert_eq!(confirm_write(None, &config).unwrap(), None);
    }

    #[test]
    fn write_without_target_is_rejected() {
        let config = ConversionConfig::default();
        assert!(matches!(
            confirm_write(None, &config).unwrap_err(),
            HtmlPdfError::InvalidArgument(_)
        ));
    }

    #[test]
    fn declined_gate_skips_write() {
        let config = ConversionConfig::builder()
            .confirm(Arc::new(NeverConfirm))
            .build()
            .unwrap();
        assert_eq!(confirm_write(Some(Path::new("/tmp/x.pdf")), &config).unwrap(), None);
    }

    #[test]
    fn approved_write_returns_target() {
        let config = ConversionConfig::default();
        assert_eq!(
            confirm_write(Some(Path::new("/tmp/x.pdf")), &config).unwrap(),
            Some(PathBuf::from("/tmp/x.pdf"))
        );
    }

    #[test]
    fn create_exclusive_refuses_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = create_exclusive(file.path()).unwrap_err();
        assert!(matches!(err, HtmlPdfError::OutputExists { .. }));
    }
}
