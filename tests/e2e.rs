//! End-to-end tests for htmlpdf against a real headless Chrome.
//!
//! Page images are generated on the fly with the `image` crate, so no fixture
//! files are needed. The tests are gated behind the `E2E_ENABLED` environment
//! variable and also skip when no Chrome/Chromium can be located.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To point at a specific browser:
//!   E2E_ENABLED=1 HTMLPDF_CHROME=/usr/bin/chromium cargo test --test e2e

use htmlpdf::{
    out_pdf, ChromeEngine, ConversionConfig, HtmlPdfError, OutputTarget, PageOrientation,
    PageSize, PdfEngine,
};
use image::{Rgb, RgbImage};
use std::path::Path;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set *and* Chrome can be found.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if !chrome_locate::is_chrome_available() {
            println!("SKIP — no Chrome/Chromium found");
            println!("       Set HTMLPDF_CHROME to the browser executable");
            return;
        }
    }};
}

/// Write a solid-colour PNG and return its path as a page expression.
fn write_page(dir: &Path, name: &str, width: u32, height: u32, colour: [u8; 3]) -> String {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(colour))
        .save(&path)
        .unwrap();
    path.to_string_lossy().into_owned()
}

/// Count `/Type /Page` objects (excluding `/Type /Pages`) in an uncompressed
/// page tree. Chrome writes page dictionaries in the clear.
fn count_pdf_pages(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}

fn assert_pdf(bytes: &[u8], context: &str) {
    assert!(
        bytes.starts_with(b"%PDF-"),
        "[{context}] output does not start with a PDF header"
    );
    assert!(
        bytes.len() > 500,
        "[{context}] PDF is suspiciously small: {} bytes",
        bytes.len()
    );
}

// ── Conversion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_two_pages_letter_landscape() {
    e2e_skip_unless_ready!();

    let dir = tempfile::tempdir().unwrap();
    let pages = vec![
        write_page(dir.path(), "p1.png", 800, 600, [200, 30, 30]),
        write_page(dir.path(), "p2.png", 600, 800, [30, 30, 200]),
    ];
    let out = OutputTarget::Path(dir.path().join("report.pdf").to_string_lossy().into_owned());
    let config = ConversionConfig::builder()
        .title("Report")
        .page_size(PageSize::Letter)
        .orientation(PageOrientation::Landscape)
        .build()
        .unwrap();

    let output = out_pdf(&pages, Some(&out), &config).await.unwrap();
    println!(
        "wrote {} bytes in {}ms (engine {}ms)",
        output.bytes_written, output.stats.total_duration_ms, output.stats.engine_duration_ms
    );

    let bytes = std::fs::read(dir.path().join("report.pdf")).unwrap();
    assert_pdf(&bytes, "letter landscape");
    assert_eq!(bytes.len() as u64, output.bytes_written);

    let pages_in_pdf = count_pdf_pages(&bytes);
    if pages_in_pdf > 0 {
        assert_eq!(pages_in_pdf, 2, "one PDF page per image");
    }
}

#[tokio::test]
async fn test_wildcard_pages_a5() {
    e2e_skip_unless_ready!();

    let dir = tempfile::tempdir().unwrap();
    for (i, colour) in [[10, 120, 10], [120, 10, 120], [200, 200, 0]].iter().enumerate() {
        write_page(dir.path(), &format!("scan{}.png", i + 1), 400, 560, *colour);
    }
    let pattern = dir.path().join("scan*.png").to_string_lossy().into_owned();
    let out = OutputTarget::LiteralPath(dir.path().join("scans.pdf").to_string_lossy().into_owned());
    let config = ConversionConfig::builder()
        .page_size(PageSize::A5)
        .build()
        .unwrap();

    let output = out_pdf(&[pattern], Some(&out), &config).await.unwrap();
    assert_eq!(output.stats.page_count, 3);

    let bytes = std::fs::read(dir.path().join("scans.pdf")).unwrap();
    assert_pdf(&bytes, "a5 wildcard");
}

#[tokio::test]
async fn test_engine_direct() {
    e2e_skip_unless_ready!();

    let engine = ChromeEngine::discover().unwrap();
    println!("engine: {}", engine.executable().display());

    let html = "<!DOCTYPE html><html><body><p>hello</p></body></html>";
    let mut sink = Vec::new();
    let written = engine.convert(html, &mut sink).unwrap();
    assert_eq!(written as usize, sink.len());
    assert_pdf(&sink, "direct");
}

#[tokio::test]
async fn test_existing_output_untouched_with_real_engine() {
    e2e_skip_unless_ready!();

    let dir = tempfile::tempdir().unwrap();
    let pages = vec![write_page(dir.path(), "p.png", 100, 100, [0, 0, 0])];
    let existing = dir.path().join("exists.pdf");
    std::fs::write(&existing, b"keep me").unwrap();

    let engine: Arc<dyn PdfEngine> = Arc::new(ChromeEngine::discover().unwrap());
    let config = ConversionConfig::builder().engine(engine).build().unwrap();
    let out = OutputTarget::Path(existing.to_string_lossy().into_owned());

    let err = out_pdf(&pages, Some(&out), &config).await.unwrap_err();
    assert!(matches!(err, HtmlPdfError::OutputExists { .. }), "got: {err}");
    assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
}
