//! # htmlpdf
//!
//! Combine a list of page images into a single PDF, one image per page.
//!
//! The crate does no PDF work itself. It builds a small paginated HTML
//! document (one `<img>` per page, each sized to the physical page and
//! followed by a page break) and hands it to an HTML-to-PDF engine. The
//! default engine is a local headless Chrome/Chromium.
//!
//! ## Pipeline Overview
//!
//! ```text
//! page expressions
//!  │
//!  ├─ 1. Collect   arguments / piped lines, in arrival order
//!  ├─ 2. Target    resolve --path pattern or --literal-path to one file
//!  ├─ 3. Pages     expand wildcards, report every miss at once
//!  ├─ 4. Confirm   dry run or caller gate may decline the write
//!  ├─ 5. Template  paginated HTML with @page size + orientation
//!  └─ 6. Engine    HTML → PDF bytes → exclusive-create output file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use htmlpdf::{out_pdf, ConversionConfig, OutputTarget, PageOrientation, PageSize};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .title("Report")
//!         .page_size(PageSize::Letter)
//!         .orientation(PageOrientation::Landscape)
//!         .build()?;
//!     let target = OutputTarget::Path("report.pdf".into());
//!     let output = out_pdf(&["scans/p*.png"], Some(&target), &config).await?;
//!     eprintln!("{} pages, {} bytes", output.stats.page_count, output.bytes_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `out-pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! htmlpdf = { version = "0.3", default-features = false }
//! ```
//!
//! ## Page Sizes
//!
//! | Size | mm (portrait) | CSS keyword |
//! |------|---------------|-------------|
//! | A5 | 148 × 210 | `a5` |
//! | A4 (default) | 210 × 297 | `a4` |
//! | A3 | 297 × 420 | `a3` |
//! | B5 | 176 × 250 | `b5` |
//! | B4 | 250 × 353 | `b4` |
//! | JIS-B5 | 182 × 257 | `jis-b5` |
//! | JIS-B4 | 257 × 364 | `jis-b4` |
//! | Letter | 215.9 × 279.4 | `letter` |
//! | Legal | 215.9 × 355.6 | `legal` |
//! | Ledger | 279.4 × 431.8 | `ledger` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod confirm;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageOrientation, PageSize};
pub use confirm::{AlwaysConfirm, Confirm, ConfirmCallback, NeverConfirm};
pub use convert::{out_pdf, out_pdf_sync, render_html, PageCollector, CREATE_ACTION};
pub use error::{HtmlPdfError, PathOrigin};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::engine::{ChromeEngine, PdfEngine};
pub use pipeline::pages::{resolve_pages, PageResolution};
pub use pipeline::target::{resolve_output_path, OutputTarget};
pub use pipeline::template::render;
