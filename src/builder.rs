//! Builder API for ergonomic copying.
//!
//! The builder provides a fluent interface over [`copy_tree`] that is often
//! more convenient than constructing [`CopyOptions`] by hand.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use treecopy::TreeCopyBuilder;
//!
//! // Copy with defaults; diagnostics go to stderr
//! let stats = TreeCopyBuilder::new("assets.zip!/web", "public").run();
//! println!("Copied {} files", stats.files_copied);
//! ```
//!
//! ## Collecting Diagnostics
//!
//! ```no_run
//! use treecopy::{Error, TreeCopyBuilder};
//!
//! let mut diagnostics: Vec<Error> = Vec::new();
//! let stats = TreeCopyBuilder::new("src", "dst")
//!     .no_preserve()  // content and structure only
//!     .no_fsync()     // faster, less durable
//!     .run_with(&mut diagnostics);
//!
//! for error in &diagnostics {
//!     eprintln!("{error}");
//! }
//! ```

use crate::copy::{CopyStats, copy_tree};
use crate::options::CopyOptions;
use crate::sink::DiagnosticSink;
use std::path::{Path, PathBuf};

/// A builder for configuring and executing a tree copy.
///
/// # Example
///
/// ```no_run
/// use treecopy::TreeCopyBuilder;
///
/// let stats = TreeCopyBuilder::new("/data/project", "/backup/project")
///     .preserve(true)
///     .run();
/// assert_eq!(stats.errors, 0);
/// ```
#[derive(Debug, Clone)]
pub struct TreeCopyBuilder {
    source: String,
    target: PathBuf,
    options: CopyOptions,
}

impl TreeCopyBuilder {
    /// Create a builder copying the tree at `source` into `target`.
    ///
    /// `source` is a plain path or `<container>!<inner path>`. Uses default
    /// options (preserve modification times, fsync).
    pub fn new<S: Into<String>, P: AsRef<Path>>(source: S, target: P) -> Self {
        Self {
            source: source.into(),
            target: target.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Set whether modification times are preserved.
    #[must_use]
    pub fn preserve(mut self, preserve: bool) -> Self {
        self.options = self.options.with_preserve_attributes(preserve);
        self
    }

    /// Copy content and structure only, without modification times.
    #[must_use]
    pub fn no_preserve(mut self) -> Self {
        self.options = self.options.without_attributes();
        self
    }

    /// Skip fsync before each rename.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Replace all options at once.
    #[must_use]
    pub fn options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the current options.
    #[must_use]
    pub fn get_options(&self) -> &CopyOptions {
        &self.options
    }

    /// Run the copy, sending diagnostics to the default sink.
    ///
    /// The default sink is `tracing` when the `tracing` feature is enabled,
    /// standard error otherwise.
    pub fn run(self) -> CopyStats {
        #[cfg(feature = "tracing")]
        let mut sink = crate::sink::TracingSink;
        #[cfg(not(feature = "tracing"))]
        let mut sink = crate::sink::StderrSink;
        self.run_with(&mut sink)
    }

    /// Run the copy, sending diagnostics to `sink`.
    pub fn run_with(self, sink: &mut dyn DiagnosticSink) -> CopyStats {
        copy_tree(&self.source, &self.target, &self.options, sink)
    }
}
