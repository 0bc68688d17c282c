//! Result types returned by the conversion entry points.

use serde::Serialize;
use std::path::PathBuf;

/// Everything a conversion produced, whether or not a file was written.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The generated HTML document (CRLF line endings).
    pub html: String,

    /// Resolved output path. `None` only when no target was given (dry run).
    pub output_path: Option<PathBuf>,

    /// Resolved page files, in page order.
    pub pages: Vec<PathBuf>,

    /// `true` if the PDF was written to `output_path`.
    pub written: bool,

    /// Size of the written PDF; 0 when nothing was written.
    pub bytes_written: u64,

    pub stats: ConversionStats,
}

/// Timing and size figures for a single conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Number of pages (= `<img>` elements = physical PDF pages).
    pub page_count: usize,
    /// Time spent resolving the output path and the page list.
    pub resolve_duration_ms: u64,
    /// Time spent inside the PDF engine; 0 for dry runs.
    pub engine_duration_ms: u64,
    pub total_duration_ms: u64,
}
