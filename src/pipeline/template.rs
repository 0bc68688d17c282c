//! HTML generation: one `<img>` per page, one page break between pages.
//!
//! The document is a fixed skeleton. The `@page` rule carries the size and
//! orientation keywords, and two image classes size each image to the page
//! box. `pagebreak` forces a break *before* its image and is applied to every
//! page but the last, so the engine emits exactly one physical page per image.
//! `object-fit: scale-down` keeps the aspect ratio and never upscales.
//!
//! Output is UTF-8 with CRLF line endings and is a pure function of the
//! inputs: the same pages, title and geometry always give the same bytes.

use crate::config::{PageOrientation, PageSize};
use crate::error::HtmlPdfError;
use std::path::{Path, PathBuf};
use url::Url;

const TITLE_TOKEN: &str = "%%TITLE%%";
const SIZE_TOKEN: &str = "%%SIZE%%";
const ORIENTATION_TOKEN: &str = "%%ORIENTATION%%";
const WIDTH_TOKEN: &str = "%%WIDTH%%";
const HEIGHT_TOKEN: &str = "%%HEIGHT%%";

const PAGE_CLASS: &str = "page";
const PAGE_BREAK_CLASS: &str = "pagebreak";

const HTML_HEADER: &str = concat!(
    "<!DOCTYPE html>\r\n",
    "<html lang=\"en\">\r\n",
    "<head>\r\n",
    "  <meta charset=\"utf-8\" />\r\n",
    "  <title>%%TITLE%%</title>\r\n",
    "  <style type=\"text/css\">\r\n",
    "    @page { size: %%SIZE%% %%ORIENTATION%%; margin: 0; }\r\n",
    "    html, body { margin: 0; padding: 0; }\r\n",
    "    .page {\r\n",
    "      display: block;\r\n",
    "      object-fit: scale-down;\r\n",
    "      margin: 0; padding: 0;\r\n",
    "      width: %%WIDTH%%; height: %%HEIGHT%%;\r\n",
    "    }\r\n",
    "    .pagebreak {\r\n",
    "      display: block;\r\n",
    "      object-fit: scale-down;\r\n",
    "      margin: 0; padding: 0;\r\n",
    "      width: %%WIDTH%%; height: %%HEIGHT%%;\r\n",
    "      page-break-before: always;\r\n",
    "      break-before: page;\r\n",
    "    }\r\n",
    "  </style>\r\n",
    "</head>\r\n",
    "<body>\r\n",
);

const HTML_FOOTER: &str = "</body>\r\n</html>\r\n";

/// Rough per-`<img>` line length, used to size the output buffer up front.
const PAGE_LINE_ESTIMATE: usize = 96;

/// Convert an absolute page path to a percent-encoded `file://` URI.
///
/// Relative paths are rejected rather than guessed at, since the engine
/// renders from a temp directory where a relative `src` would point elsewhere.
pub fn page_uri(path: &Path) -> Result<Url, HtmlPdfError> {
    Url::from_file_path(path).map_err(|()| HtmlPdfError::InvalidPageUri {
        path: path.to_path_buf(),
    })
}

/// Render the document for already-converted page URIs.
///
/// Callers guarantee `pages` is non-empty; with no pages the result is a
/// valid but empty `<body>`.
pub fn render(
    pages: &[Url],
    title: &str,
    size: PageSize,
    orientation: PageOrientation,
) -> String {
    let (width, height) = size.oriented_mm(orientation);

    // Title goes last so a title that happens to contain another token is
    // never expanded.
    let head = HTML_HEADER
        .replace(SIZE_TOKEN, size.keyword())
        .replace(ORIENTATION_TOKEN, orientation.keyword())
        .replace(WIDTH_TOKEN, &format!("{width}mm"))
        .replace(HEIGHT_TOKEN, &format!("{height}mm"))
        .replacen(TITLE_TOKEN, title, 1);

    let mut html =
        String::with_capacity(head.len() + HTML_FOOTER.len() + pages.len() * PAGE_LINE_ESTIMATE);
    html.push_str(&head);

    let last = pages.len().saturating_sub(1);
    for (i, uri) in pages.iter().enumerate() {
        let class = if i == last { PAGE_CLASS } else { PAGE_BREAK_CLASS };
        html.push_str("  <img class=\"");
        html.push_str(class);
        html.push_str("\" src=\"");
        html.push_str(uri.as_str());
        html.push_str("\" />\r\n");
    }

    html.push_str(HTML_FOOTER);
    html
}

/// Convert each page path with [`page_uri`], then [`render`].
pub fn render_pages(
    pages: &[PathBuf],
    title: &str,
    size: PageSize,
    orientation: PageOrientation,
) -> Result<String, HtmlPdfError> {
    let uris = pages
        .iter()
        .map(|p| page_uri(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render(&uris, title, size, orientation))
}
