//! Pipeline stages for image-to-PDF conversion.
//!
//! Each submodule implements exactly one step. The two resolvers and the
//! template are pure file-system / string work; only [`engine`] leaves the
//! process.
//!
//! ## Data Flow
//!
//! ```text
//! target ──▶ pages ──▶ template ──▶ engine
//! (output)   (glob)    (HTML)       (Chrome → PDF bytes)
//! ```
//!
//! 1. [`target`]: resolve `--path` / `--literal-path` to one file path
//! 2. [`pages`]: expand page expressions, collecting every miss
//! 3. [`template`]: build the paginated HTML document
//! 4. [`engine`]: print the HTML to PDF through an external engine

pub mod engine;
pub mod pages;
pub mod target;
pub mod template;
