//! # chrome-locate
//!
//! Find a locally installed Chrome or Chromium executable so it can be driven
//! in headless mode (`--print-to-pdf`) as an HTML → PDF engine.
//!
//! ## How it works
//!
//! On first call to [`find_chrome`]:
//!
//! 1. Checks `HTMLPDF_CHROME`, then `CHROME_PATH`, for an explicit executable.
//! 2. Searches every directory on `PATH` for the platform's known binary names
//!    (`google-chrome`, `chromium`, `chrome.exe`, …).
//! 3. Falls back to well-known install locations (`/Applications/…` on macOS,
//!    `Program Files` on Windows, `/opt/google/chrome` on Linux).
//!
//! The first hit is memoised for the rest of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrome_locate::{find_chrome, validate_chrome_path};
//!
//! // Option A: discover
//! let chrome = find_chrome().expect("no Chrome installed");
//!
//! // Option B: an explicit path from the user
//! let chrome = validate_chrome_path("/usr/bin/chromium").expect("not an executable");
//! ```
//!
//! ## Environment variable overrides
//!
//! - `HTMLPDF_CHROME`: path to the executable; skips discovery.
//! - `CHROME_PATH`: same, honoured for compatibility with other tooling.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variables consulted, in order, before any discovery.
pub const ENV_OVERRIDES: [&str; 2] = ["HTMLPDF_CHROME", "CHROME_PATH"];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by chrome-locate operations.
#[derive(Error, Debug)]
pub enum ChromeLocateError {
    /// The current OS has no known Chrome layout.
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// An override (env var or explicit path) names something that is not a file.
    #[error("Chrome executable '{path}' (from {source_name}) does not exist or is not a file")]
    InvalidOverride { path: PathBuf, source_name: String },

    /// Discovery exhausted every candidate.
    #[error(
        "No Chrome or Chromium executable found (searched PATH and {searched} install locations).\n\
         Install Chrome/Chromium or set HTMLPDF_CHROME=/path/to/chrome."
    )]
    NotFound { searched: usize },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

struct PlatformInfo {
    /// Executable names looked up on `PATH`.
    binary_names: &'static [&'static str],
    /// Absolute install locations tried after `PATH`.
    install_paths: Vec<PathBuf>,
}

fn detect_platform() -> Result<PlatformInfo, ChromeLocateError> {
    match std::env::consts::OS {
        "linux" | "freebsd" | "openbsd" | "netbsd" => Ok(PlatformInfo {
            binary_names: &[
                "google-chrome-stable",
                "google-chrome",
                "chromium",
                "chromium-browser",
                "chrome",
            ],
            install_paths: vec![
                PathBuf::from("/opt/google/chrome/chrome"),
                PathBuf::from("/usr/lib/chromium/chromium"),
                PathBuf::from("/snap/bin/chromium"),
            ],
        }),
        "macos" => {
            let bundles = [
                "Google Chrome.app/Contents/MacOS/Google Chrome",
                "Chromium.app/Contents/MacOS/Chromium",
                "Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
            ];
            let mut install_paths: Vec<PathBuf> = bundles
                .iter()
                .map(|b| Path::new("/Applications").join(b))
                .collect();
            if let Some(home) = dirs::home_dir() {
                install_paths.extend(bundles.iter().map(|b| home.join("Applications").join(b)));
            }
            Ok(PlatformInfo {
                binary_names: &["google-chrome", "chromium"],
                install_paths,
            })
        }
        "windows" => {
            let suffix = Path::new("Google")
                .join("Chrome")
                .join("Application")
                .join("chrome.exe");
            let mut install_paths = Vec::new();
            for var in ["ProgramFiles", "ProgramFiles(x86)"] {
                if let Some(dir) = std::env::var_os(var) {
                    install_paths.push(PathBuf::from(dir).join(&suffix));
                }
            }
            if let Some(local) = dirs::data_local_dir() {
                install_paths.push(local.join(&suffix));
            }
            Ok(PlatformInfo {
                binary_names: &["chrome.exe", "chromium.exe", "msedge.exe"],
                install_paths,
            })
        }
        os => Err(ChromeLocateError::UnsupportedPlatform { os: os.to_string() }),
    }
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns the Chrome executable, discovering it on first call.
///
/// Safe to call from multiple threads; discovery runs at most a few times
/// (racing callers all reach the same answer) and is cached afterwards.
pub fn find_chrome() -> Result<PathBuf, ChromeLocateError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = discover(std::env::var_os("PATH"))?;

    // Best-effort cache in the OnceLock (ignore race; both will succeed).
    let _ = RESOLVED_PATH.set(path.clone());

    Ok(path)
}

/// Returns `true` if [`find_chrome`] would succeed.
pub fn is_chrome_available() -> bool {
    find_chrome().is_ok()
}

/// Checks a user-supplied executable path without running discovery.
pub fn validate_chrome_path(path: impl AsRef<Path>) -> Result<PathBuf, ChromeLocateError> {
    let path = path.as_ref();
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ChromeLocateError::InvalidOverride {
            path: path.to_path_buf(),
            source_name: "explicit path".to_string(),
        })
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn discover(search_path: Option<OsString>) -> Result<PathBuf, ChromeLocateError> {
    // 1. Environment variable override. A set-but-wrong override is an error,
    //    not a reason to silently pick some other browser.
    for var in ENV_OVERRIDES {
        if let Some(value) = std::env::var_os(var).filter(|v| !v.is_empty()) {
            let p = PathBuf::from(value);
            if p.is_file() {
                return Ok(p);
            }
            return Err(ChromeLocateError::InvalidOverride {
                path: p,
                source_name: var.to_string(),
            });
        }
    }

    let info = detect_platform()?;

    // 2. PATH lookup.
    if let Some(found) = search_in_path(search_path.as_deref(), info.binary_names) {
        return Ok(found);
    }

    // 3. Well-known install locations.
    info.install_paths
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or(ChromeLocateError::NotFound {
            searched: info.install_paths.len(),
        })
}

/// First `dir/name` on the search path that is a file, trying names in order
/// within each directory.
fn search_in_path(search_path: Option<&std::ffi::OsStr>, names: &[&str]) -> Option<PathBuf> {
    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_platform_is_supported() {
        detect_platform().expect("current platform should be supported");
    }

    #[test]
    fn platform_info_fields_nonempty() {
        let info = detect_platform().unwrap();
        assert!(!info.binary_names.is_empty());
        // Windows install paths come from env vars that may be unset.
        if !cfg!(windows) {
            assert!(!info.install_paths.is_empty());
        }
    }

    #[test]
    fn search_in_path_finds_first_named_binary() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("chromium");
        std::fs::write(&bin, b"").unwrap();

        let path = std::env::join_paths([dir.path()]).unwrap();
        let found = search_in_path(Some(&path), &["google-chrome", "chromium"]);
        assert_eq!(found, Some(bin));
    }

    #[test]
    fn search_in_path_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("chromium")).unwrap();

        let path = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(search_in_path(Some(&path), &["chromium"]), None);
    }

    #[test]
    fn search_in_path_without_path_var() {
        assert_eq!(search_in_path(None, &["chromium"]), None);
    }

    #[test]
    fn validate_rejects_missing_file() {
        let err = validate_chrome_path("/definitely/not/here/chrome").unwrap_err();
        assert!(matches!(err, ChromeLocateError::InvalidOverride { .. }));
        assert!(err.to_string().contains("explicit path"));
    }

    #[test]
    fn validate_accepts_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let p = validate_chrome_path(file.path()).unwrap();
        assert_eq!(p, file.path());
    }
}
