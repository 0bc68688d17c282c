//! Configuration types for image-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The page list itself is passed next to
//! the config (see [`crate::convert::out_pdf`]) so one config can be reused
//! for many documents.
//!
//! [`PageSize`] and [`PageOrientation`] are closed sets. Strings are turned
//! into them at the boundary ([`std::str::FromStr`], clap value enums), so the
//! template renderer only ever sees valid values.

use crate::confirm::ConfirmCallback;
use crate::error::HtmlPdfError;
use crate::pipeline::engine::PdfEngine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for an image-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use htmlpdf::{ConversionConfig, PageOrientation, PageSize};
///
/// let config = ConversionConfig::builder()
///     .title("Quarterly report")
///     .page_size(PageSize::Letter)
///     .orientation(PageOrientation::Landscape)
///     .dry_run(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Document title, placed verbatim in `<title>`. Default: empty.
    ///
    /// Not HTML-escaped. Callers embedding untrusted text must escape it
    /// themselves.
    pub title: String,

    /// Physical page size for the `@page` rule. Default: [`PageSize::A4`].
    pub page_size: PageSize,

    /// Page orientation for the `@page` rule. Default: [`PageOrientation::Portrait`].
    pub orientation: PageOrientation,

    /// Compute everything, write nothing. Default: false.
    ///
    /// The generated HTML is still returned in
    /// [`crate::output::ConversionOutput::html`].
    pub dry_run: bool,

    /// Asked once, right before the output file would be created.
    /// Declining behaves exactly like `dry_run`.
    pub confirm: Option<Arc<dyn ConfirmCallback>>,

    /// Pre-constructed engine. Takes precedence over `chrome_path`.
    pub engine: Option<Arc<dyn PdfEngine>>,

    /// Chrome/Chromium executable. If None along with `engine`, the
    /// executable is discovered with [`chrome_locate::find_chrome`].
    pub chrome_path: Option<PathBuf>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("title", &self.title)
            .field("page_size", &self.page_size)
            .field("orientation", &self.orientation)
            .field("dry_run", &self.dry_run)
            .field("confirm", &self.confirm.as_ref().map(|_| "<dyn ConfirmCallback>"))
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field("chrome_path", &self.chrome_path)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn orientation(mut self, orientation: PageOrientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    pub fn confirm(mut self, cb: Arc<dyn ConfirmCallback>) -> Self {
        self.config.confirm = Some(cb);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn PdfEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, HtmlPdfError> {
        let c = &self.config;
        if let Some(ref p) = c.chrome_path {
            if p.as_os_str().is_empty() {
                return Err(HtmlPdfError::InvalidConfig(
                    "chrome path must not be empty".into(),
                ));
            }
            if c.engine.is_some() {
                return Err(HtmlPdfError::InvalidConfig(
                    "set either an engine or a chrome path, not both".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Physical page size, one of the CSS `@page { size: … }` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSize {
    A5,
    /// 210 × 297 mm. (default)
    #[default]
    A4,
    A3,
    B5,
    B4,
    /// JIS B5, 182 × 257 mm (differs from ISO B5).
    JisB5,
    /// JIS B4, 257 × 364 mm.
    JisB4,
    /// US Letter, 8.5 × 11 in.
    Letter,
    /// US Legal, 8.5 × 14 in.
    Legal,
    /// US Ledger, 11 × 17 in.
    Ledger,
}

impl PageSize {
    pub const ALL: [PageSize; 10] = [
        PageSize::A5,
        PageSize::A4,
        PageSize::A3,
        PageSize::B5,
        PageSize::B4,
        PageSize::JisB5,
        PageSize::JisB4,
        PageSize::Letter,
        PageSize::Legal,
        PageSize::Ledger,
    ];

    /// The lower-case CSS keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            PageSize::A5 => "a5",
            PageSize::A4 => "a4",
            PageSize::A3 => "a3",
            PageSize::B5 => "b5",
            PageSize::B4 => "b4",
            PageSize::JisB5 => "jis-b5",
            PageSize::JisB4 => "jis-b4",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::Ledger => "ledger",
        }
    }

    /// Portrait `(width, height)` in millimetres, per CSS Paged Media.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A5 => (148.0, 210.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A3 => (297.0, 420.0),
            PageSize::B5 => (176.0, 250.0),
            PageSize::B4 => (250.0, 353.0),
            PageSize::JisB5 => (182.0, 257.0),
            PageSize::JisB4 => (257.0, 364.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Ledger => (279.4, 431.8),
        }
    }

    /// `(width, height)` in millimetres after applying `orientation`.
    pub fn oriented_mm(self, orientation: PageOrientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            PageOrientation::Portrait => (w, h),
            PageOrientation::Landscape => (h, w),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for PageSize {
    type Err = HtmlPdfError;

    /// Case-insensitive; `jisb5` and `jis-b5` both name JIS B5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        PageSize::ALL
            .into_iter()
            .find(|size| size.keyword().replace('-', "") == norm)
            .ok_or_else(|| {
                HtmlPdfError::InvalidArgument(format!(
                    "unknown page size '{s}' (expected one of: {})",
                    PageSize::ALL.map(PageSize::keyword).join(", ")
                ))
            })
    }
}

/// Page orientation, the second token of the `@page` size rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// (default)
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// The lower-case CSS keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for PageOrientation {
    type Err = HtmlPdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(PageOrientation::Portrait),
            "landscape" => Ok(PageOrientation::Landscape),
            _ => Err(HtmlPdfError::InvalidArgument(format!(
                "unknown page orientation '{s}' (expected portrait or landscape)"
            ))),
        }
    }
}
