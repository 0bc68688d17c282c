//! Confirmation gate consulted before the output PDF is created.
//!
//! Inject an [`Arc<dyn ConfirmCallback>`] via
//! [`crate::config::ConversionConfigBuilder::confirm`] to decide, per run,
//! whether the write actually happens. A declined run still resolves every
//! path and renders the HTML, so the caller can inspect what would have been
//! produced.
//!
//! # Example
//!
//! ```rust
//! use htmlpdf::{ConfirmCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct OnlyUnderTmp;
//!
//! impl ConfirmCallback for OnlyUnderTmp {
//!     fn should_process(&self, target: &Path, _action: &str) -> bool {
//!         target.starts_with("/tmp")
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .confirm(Arc::new(OnlyUnderTmp))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Asked once per conversion, after validation and before any file exists.
///
/// The default implementation approves everything, so implementors only
/// override it when they need a real decision.
pub trait ConfirmCallback: Send + Sync {
    /// Return `false` to skip the write.
    ///
    /// # Arguments
    /// * `target`: resolved, absolute output path
    /// * `action`: short verb describing the operation (`"Create"`)
    fn should_process(&self, target: &Path, action: &str) -> bool {
        let _ = (target, action);
        true
    }
}

/// Approves every write. Behaves like having no gate at all.
pub struct AlwaysConfirm;

impl ConfirmCallback for AlwaysConfirm {}

/// Declines every write, turning any run into a dry run.
pub struct NeverConfirm;

impl ConfirmCallback for NeverConfirm {
    fn should_process(&self, _target: &Path, _action: &str) -> bool {
        false
    }
}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type Confirm = Arc<dyn ConfirmCallback>;
