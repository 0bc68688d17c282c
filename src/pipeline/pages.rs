//! Page resolution: expand page expressions into existing image files.
//!
//! Unlike the output path, a page miss is not an immediate error. Every
//! expression is tried and misses are collected, so the user gets one report
//! listing *all* unresolved inputs rather than fixing them one run at a time.
//! [`PageResolution::into_result`] is where the caller aborts.

use crate::error::HtmlPdfError;
use crate::pipeline::target::{absolute, has_wildcards};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of resolving a page list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageResolution {
    /// Absolute file paths, in input order then expansion order.
    pub resolved: Vec<PathBuf>,
    /// Original expressions that matched no file, as the user typed them.
    pub unresolved: Vec<String>,
}

impl PageResolution {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Fail with [`HtmlPdfError::PagesNotFound`] if anything is unresolved.
    pub fn into_result(self) -> Result<Vec<PathBuf>, HtmlPdfError> {
        if self.unresolved.is_empty() {
            Ok(self.resolved)
        } else {
            Err(HtmlPdfError::PagesNotFound {
                pages: self.unresolved,
            })
        }
    }
}

/// Resolve every page expression against the file system.
///
/// Only regular files are kept (symlinks are followed, so broken links drop
/// out). Directories are skipped. A pattern that matches nothing is tried once
/// more as a plain path.
pub fn resolve_pages<S: AsRef<str>>(raw_inputs: &[S]) -> PageResolution {
    let mut resolution = PageResolution::default();

    for raw in raw_inputs {
        let raw = raw.as_ref();
        let found = expand(raw);
        if found.is_empty() {
            debug!("Page '{}' did not resolve", raw);
            resolution.unresolved.push(raw.to_string());
            continue;
        }
        for path in &found {
            if image::ImageFormat::from_path(path).is_err() {
                warn!(
                    "Page '{}' has no recognised image extension; passing it to the engine anyway",
                    path.display()
                );
            }
        }
        resolution.resolved.extend(found);
    }

    debug!(
        "Resolved {} page file(s), {} unresolved input(s)",
        resolution.resolved.len(),
        resolution.unresolved.len()
    );
    resolution
}

/// All existing files one expression names. Empty on any failure.
fn expand(raw: &str) -> Vec<PathBuf> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let literal = || keep_file(Path::new(raw)).into_iter().collect::<Vec<_>>();

    if !has_wildcards(raw) {
        return literal();
    }

    let matched: Vec<PathBuf> = match glob::glob(raw) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter_map(|p| keep_file(&p))
            .collect(),
        Err(e) => {
            debug!("Page pattern '{}' is invalid: {}", raw, e);
            Vec::new()
        }
    };

    // A file whose name merely contains metacharacters, e.g. `scan[1].png`.
    if matched.is_empty() {
        literal()
    } else {
        matched
    }
}

fn keep_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        absolute(path).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, b"x").unwrap();
        p
    }

    fn s(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png");
        let missing = s(&dir.path().join("missing.png"));

        let r = resolve_pages(&[s(&a), missing.clone()]);
        assert_eq!(r.resolved, vec![a]);
        assert_eq!(r.unresolved, vec![missing]);
        assert!(!r.is_complete());
    }

    #[test]
    fn wildcard_expands_in_lexical_order_after_earlier_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let cover = touch(dir.path(), "cover.jpg");
        let p2 = touch(dir.path(), "p2.png");
        let p1 = touch(dir.path(), "p1.png");

        let r = resolve_pages(&[s(&cover), s(&dir.path().join("p*.png"))]);
        assert_eq!(r.resolved, vec![cover, p1, p2]);
        assert!(r.is_complete());
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png");
        let r = resolve_pages(&[s(&a), s(&a)]);
        assert_eq!(r.resolved, vec![a.clone(), a]);
    }

    #[test]
    fn directories_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("scans")).unwrap();

        let plain = s(&dir.path().join("scans"));
        let pattern = s(&dir.path().join("sc*"));
        let r = resolve_pages(&[plain.clone(), pattern.clone()]);
        assert!(r.resolved.is_empty());
        assert_eq!(r.unresolved, vec![plain, pattern]);
    }

    #[test]
    fn unmatched_pattern_is_reported_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = s(&dir.path().join("*.tiff"));
        let r = resolve_pages(&[pattern.clone()]);
        assert_eq!(r.unresolved, vec![pattern]);
    }

    #[test]
    fn malformed_pattern_is_unresolved() {
        let r = resolve_pages(&["scan[.png"]);
        assert_eq!(r.unresolved, vec!["scan[.png".to_string()]);
    }

    #[test]
    fn existing_file_with_metacharacters_resolves_literally() {
        let dir = tempfile::tempdir().unwrap();
        let bracketed = touch(dir.path(), "scan[1].png");
        let r = resolve_pages(&[s(&bracketed)]);
        assert_eq!(r.resolved, vec![bracketed]);
        assert!(r.is_complete());
    }

    #[test]
    fn unclosed_bracket_file_resolves_literally() {
        let dir = tempfile::tempdir().unwrap();
        let odd = touch(dir.path(), "scan[.png");
        let r = resolve_pages(&[s(&odd)]);
        assert_eq!(r.resolved, vec![odd]);
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling.png");
        std::os::unix::fs::symlink(dir.path().join("gone.png"), &link).unwrap();
        let r = resolve_pages(&[s(&link)]);
        assert_eq!(r.unresolved.len(), 1);
    }

    #[test]
    fn into_result_aborts_on_misses() {
        let r = PageResolution {
            resolved: vec![PathBuf::from("/a.png")],
            unresolved: vec!["b.png".into()],
        };
        match r.into_result().unwrap_err() {
            HtmlPdfError::PagesNotFound { pages } => assert_eq!(pages, vec!["b.png"]),
            other => panic!("unexpected: {other}"),
        }
    }
}
