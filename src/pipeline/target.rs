//! Output path resolution: turn the user's path or pattern into one file path.
//!
//! A literal path, or any path without wildcard metacharacters, may name a
//! file that does not exist yet. Its parent directory has to exist and it must
//! not name a directory. A pattern must match exactly one existing file. Zero
//! matches, several matches, or a directory are all errors, because picking
//! one silently would write the PDF somewhere the user did not mean.

use crate::error::{HtmlPdfError, PathOrigin};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that make a path a wildcard pattern.
const WILDCARD_CHARS: [char; 3] = ['*', '?', '['];

/// Which command-line form the output path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Wildcards allowed (`--path`).
    Path(String),
    /// Used exactly as given (`--literal-path`).
    LiteralPath(String),
}

impl OutputTarget {
    pub fn raw(&self) -> &str {
        match self {
            OutputTarget::Path(s) | OutputTarget::LiteralPath(s) => s,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, OutputTarget::LiteralPath(_))
    }

    /// Resolve with [`resolve_output_path`].
    pub fn resolve(&self) -> Result<PathBuf, HtmlPdfError> {
        resolve_output_path(self.raw(), self.is_literal())
    }
}

/// Check if the input contains wildcard metacharacters.
pub fn has_wildcards(input: &str) -> bool {
    input.contains(WILDCARD_CHARS)
}

/// Resolve the output path.
///
/// # Errors
/// - [`HtmlPdfError::InvalidArgument`]: empty input
/// - [`HtmlPdfError::MissingDirectory`]: direct path whose parent is absent
/// - [`HtmlPdfError::OutputNotFound`]: pattern matched nothing
/// - [`HtmlPdfError::AmbiguousOutput`]: pattern matched more than one entry
/// - [`HtmlPdfError::InvalidTarget`]: pattern matched a directory
/// - [`HtmlPdfError::InvalidPattern`]: pattern could not be parsed
pub fn resolve_output_path(raw: &str, is_literal: bool) -> Result<PathBuf, HtmlPdfError> {
    if raw.trim().is_empty() {
        return Err(HtmlPdfError::InvalidArgument(
            "output path must not be empty".into(),
        ));
    }

    if is_literal || !has_wildcards(raw) {
        let origin = if is_literal {
            PathOrigin::Literal
        } else {
            PathOrigin::Pattern
        };
        return resolve_direct(raw, origin);
    }

    let matches: Vec<PathBuf> = glob::glob(raw)
        .map_err(|e| HtmlPdfError::InvalidPattern {
            pattern: raw.to_string(),
            detail: e.to_string(),
        })?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("Skipping unreadable entry while expanding '{}': {}", raw, e);
                None
            }
        })
        .collect();

    if matches.len() > 1 {
        return Err(HtmlPdfError::AmbiguousOutput {
            pattern: raw.to_string(),
            matches,
        });
    }

    match matches.into_iter().next() {
        None => Err(HtmlPdfError::OutputNotFound {
            pattern: raw.to_string(),
        }),
        Some(single) if single.is_dir() => Err(HtmlPdfError::InvalidTarget {
            path: absolute(&single)?,
        }),
        Some(single) => {
            let path = absolute(&single)?;
            debug!("Output pattern '{}' → {}", raw, path.display());
            Ok(path)
        }
    }
}

/// A path taken at face value: make it absolute, require its parent, and
/// refuse an existing directory.
fn resolve_direct(raw: &str, origin: PathOrigin) -> Result<PathBuf, HtmlPdfError> {
    let path = absolute(Path::new(raw))?;

    if path.is_dir() {
        return Err(HtmlPdfError::InvalidTarget { path });
    }

    let parent_exists = path.parent().map(Path::is_dir).unwrap_or(false);
    if !parent_exists {
        return Err(HtmlPdfError::MissingDirectory { path, origin });
    }

    debug!("Output {} → {}", origin, path.display());
    Ok(path)
}

/// Fully qualify `path` against the current directory.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, HtmlPdfError> {
    std::path::absolute(path).map_err(|e| {
        HtmlPdfError::InvalidArgument(format!("cannot qualify '{}': {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn pattern(dir: &Path, tail: &str) -> String {
        dir.join(tail).to_string_lossy().into_owned()
    }

    #[test]
    fn test_has_wildcards() {
        assert!(has_wildcards("out*.pdf"));
        assert!(has_wildcards("out?.pdf"));
        assert!(has_wildcards("out[12].pdf"));
        assert!(!has_wildcards("/tmp/out.pdf"));
        assert!(!has_wildcards(""));
    }

    #[test]
    fn literal_new_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let raw = pattern(dir.path(), "new.pdf");
        let p = resolve_output_path(&raw, true).unwrap();
        assert_eq!(p, dir.path().join("new.pdf"));
        assert!(!p.exists());
    }

    #[test]
    fn literal_path_keeps_metacharacters() {
        let dir = tempfile::tempdir().unwrap();
        let raw = pattern(dir.path(), "report[1].pdf");
        let p = resolve_output_path(&raw, true).unwrap();
        assert_eq!(p.file_name().unwrap(), "report[1].pdf");
    }

    #[test]
    fn literal_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let raw = pattern(dir.path(), "nope/out.pdf");
        let err = resolve_output_path(&raw, true).unwrap_err();
        assert!(matches!(
            err,
            HtmlPdfError::MissingDirectory {
                origin: PathOrigin::Literal,
                ..
            }
        ));
    }

    #[test]
    fn plain_path_missing_parent_is_tagged_as_pattern_origin() {
        let dir = tempfile::tempdir().unwrap();
        let raw = pattern(dir.path(), "nope/out.pdf");
        let err = resolve_output_path(&raw, false).unwrap_err();
        assert!(matches!(
            err,
            HtmlPdfError::MissingDirectory {
                origin: PathOrigin::Pattern,
                ..
            }
        ));
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let p = resolve_output_path("out.pdf", false).unwrap();
        assert!(p.is_absolute());
        assert_eq!(p.file_name().unwrap(), "out.pdf");
    }

    #[test]
    fn pattern_single_file_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("book.pdf"), b"").unwrap();
        let p = resolve_output_path(&pattern(dir.path(), "bo*.pdf"), false).unwrap();
        assert_eq!(p, dir.path().join("book.pdf"));
    }

    #[test]
    fn pattern_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_output_path(&pattern(dir.path(), "*.pdf"), false).unwrap_err();
        assert!(matches!(err, HtmlPdfError::OutputNotFound { .. }));
    }

    #[test]
    fn pattern_multiple_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"").unwrap();
        fs::write(dir.path().join("b.pdf"), b"").unwrap();
        match resolve_output_path(&pattern(dir.path(), "*.pdf"), false).unwrap_err() {
            HtmlPdfError::AmbiguousOutput { matches, .. } => assert_eq!(matches.len(), 2),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn pattern_matching_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("outdir")).unwrap();
        let err = resolve_output_path(&pattern(dir.path(), "out*"), false).unwrap_err();
        assert!(matches!(err, HtmlPdfError::InvalidTarget { .. }));
    }

    #[test]
    fn existing_directory_is_not_a_target() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().to_string_lossy().into_owned();
        for literal in [true, false] {
            match resolve_output_path(&raw, literal).unwrap_err() {
                HtmlPdfError::InvalidTarget { path } => assert_eq!(path, dir.path()),
                other => panic!("unexpected: {other}"),
            }
        }
    }

    #[test]
    fn pattern_matching_directory_reports_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("outdir")).unwrap();
        match resolve_output_path(&pattern(dir.path(), "outd?r"), false).unwrap_err() {
            HtmlPdfError::InvalidTarget { path } => {
                assert!(path.is_absolute());
                assert_eq!(path, dir.path().join("outdir"));
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn malformed_pattern() {
        let err = resolve_output_path("out[.pdf", false).unwrap_err();
        assert!(matches!(err, HtmlPdfError::InvalidPattern { .. }));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            resolve_output_path("  ", true).unwrap_err(),
            HtmlPdfError::InvalidArgument(_)
        ));
    }

    #[test]
    fn target_accessors() {
        let t = OutputTarget::LiteralPath("x.pdf".into());
        assert!(t.is_literal());
        assert_eq!(t.raw(), "x.pdf");
        assert!(!OutputTarget::Path("x.pdf".into()).is_literal());
    }
}
