//! Configuration options for copy sessions.
//!
//! # Example
//!
//! ```
//! use treecopy::CopyOptions;
//!
//! let options = CopyOptions::default()
//!     .without_attributes()
//!     .without_fsync();
//! assert!(!options.preserve_attributes);
//! ```

/// Options for a copy session.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods. Options are fixed for the lifetime of a
/// [`CopySession`](crate::CopySession).
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `preserve_attributes` | `true` | Copy modification times of files and directories |
/// | `fsync` | `true` | Sync file content to disk before the atomic rename |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Whether to preserve modification times (default: true)
    ///
    /// Files get the source mtime installed together with their content.
    /// Directories get it when created and again once all their children
    /// have been written, since child writes bump the directory mtime.
    pub preserve_attributes: bool,

    /// Whether to sync files to disk before renaming them into place (default: true)
    pub fsync: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_attributes: true,
            fsync: true,
        }
    }
}

impl CopyOptions {
    /// Set whether modification times are preserved
    #[must_use]
    pub fn with_preserve_attributes(mut self, preserve: bool) -> Self {
        self.preserve_attributes = preserve;
        self
    }

    /// Copy content and structure only
    #[must_use]
    pub fn without_attributes(mut self) -> Self {
        self.preserve_attributes = false;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }
}
