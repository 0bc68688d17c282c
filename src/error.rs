//! Error types for the htmlpdf library.
//!
//! Every failure is fatal to the single invocation that hit it: nothing is
//! retried and nothing is downgraded to a warning. Validation errors are
//! raised before any file is created, so callers never see partial output.
//!
//! The variants group into the taxonomy the CLI reports:
//!
//! | Kind | Variants |
//! |------|----------|
//! | invalid argument | [`HtmlPdfError::InvalidArgument`], [`HtmlPdfError::InvalidConfig`] |
//! | not found | [`HtmlPdfError::NoPages`], [`HtmlPdfError::OutputNotFound`] |
//! | ambiguous | [`HtmlPdfError::AmbiguousOutput`] |
//! | invalid target | [`HtmlPdfError::InvalidTarget`] |
//! | missing directory | [`HtmlPdfError::MissingDirectory`] |
//! | pages not found | [`HtmlPdfError::PagesNotFound`] |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// How the user spelled the output path.
///
/// Carried by [`HtmlPdfError::MissingDirectory`] so the message can tell a
/// literal path apart from one that went through wildcard handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOrigin {
    /// `--literal-path`: used exactly as given.
    Literal,
    /// `--path`: wildcard metacharacters are honoured.
    Pattern,
}

impl fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOrigin::Literal => f.write_str("literal path"),
            PathOrigin::Pattern => f.write_str("path"),
        }
    }
}

/// All fatal errors returned by the htmlpdf library.
#[derive(Debug, Error)]
pub enum HtmlPdfError {
    // ── Argument errors ───────────────────────────────────────────────────
    /// A required input was empty, or a value is outside its closed set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Page errors ───────────────────────────────────────────────────────
    /// No page paths were supplied at all.
    #[error("No pages supplied.\nPass image paths as arguments or pipe them on stdin.")]
    NoPages,

    /// One or more page expressions did not resolve to an existing file.
    #[error("{} page(s) not found: {}", .pages.len(), join_quoted(.pages))]
    PagesNotFound { pages: Vec<String> },

    /// A resolved page path cannot be expressed as a `file://` URI.
    #[error("Page '{path}' cannot be converted to a file URI")]
    InvalidPageUri { path: PathBuf },

    // ── Output path errors ────────────────────────────────────────────────
    /// The output pattern matched nothing.
    #[error("Output path '{pattern}' not found: the pattern matched no files")]
    OutputNotFound { pattern: String },

    /// The output pattern matched more than one entry.
    #[error(
        "Output path '{pattern}' is ambiguous: it matched {} entries ({}).\n\
         Use --literal-path to name the file exactly.",
        .matches.len(),
        join_paths(.matches)
    )]
    AmbiguousOutput {
        pattern: String,
        matches: Vec<PathBuf>,
    },

    /// The output pattern matched a directory.
    #[error("Output path '{path}' is a directory; it must name a file")]
    InvalidTarget { path: PathBuf },

    /// The output file's parent directory does not exist.
    #[error("Directory for {origin} '{path}' does not exist")]
    MissingDirectory { path: PathBuf, origin: PathOrigin },

    /// A wildcard expression could not be parsed.
    #[error("Invalid wildcard pattern '{pattern}': {detail}")]
    InvalidPattern { pattern: String, detail: String },

    // ── Write errors ──────────────────────────────────────────────────────
    /// The output file already exists; htmlpdf never overwrites.
    #[error("Output file '{path}' already exists; refusing to overwrite")]
    OutputExists { path: PathBuf },

    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// No HTML → PDF engine executable could be located.
    #[error("PDF engine not available: {0}")]
    EngineNotFound(String),

    /// The engine ran but did not produce a PDF.
    #[error("PDF engine '{engine}' failed: {detail}")]
    EngineFailed { engine: String, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
