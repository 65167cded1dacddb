//! Recursive tree copy.
//!
//! [`TreeCopier`] is the copy policy plugged into the
//! [`TreeWalker`](crate::walk::TreeWalker): directories are created on the
//! way down, files are copied as they are met, and directory modification
//! times are fixed up on the way back up. Every failure is reported to the
//! session's [`DiagnosticSink`] and the walk continues.

mod dir;
mod file;
mod utils;

use crate::error::Error;
use crate::options::CopyOptions;
use crate::path::PathPair;
use crate::provider::{NodeMeta, SourceProvider};
use crate::session::CopySession;
use crate::sink::DiagnosticSink;
use crate::walk::{Visit, Visitor, WalkError};
use std::path::Path;
use std::time::Instant;

use dir::{DirState, enter_directory, leave_directory, stamp_created};
use file::copy_file;

/// Statistics from a copy session.
///
/// There is no overall success flag: a copy is complete when
/// `errors == 0`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use treecopy::{CopyOptions, StderrSink, copy_tree};
///
/// let stats = copy_tree("assets.zip!/web", Path::new("out"), &CopyOptions::default(), &mut StderrSink);
/// println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
/// if stats.errors > 0 {
///     println!("{} entries could not be copied", stats.errors);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyStats {
    /// Number of files successfully copied
    pub files_copied: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Number of directories created
    pub dirs_created: u64,
    /// Number of directories that already existed and were kept
    pub dirs_existing: u64,
    /// Number of errors reported to the sink
    pub errors: u64,
    /// Duration of the copy operation
    pub duration: std::time::Duration,
}

/// Copy policy driven by the tree walker.
pub(crate) struct TreeCopier<'a, P: SourceProvider + ?Sized> {
    provider: &'a P,
    source_root: &'a Path,
    target_root: &'a Path,
    options: &'a CopyOptions,
    sink: &'a mut dyn DiagnosticSink,
    stats: CopyStats,
}

impl<'a, P: SourceProvider + ?Sized> TreeCopier<'a, P> {
    pub(crate) fn new(
        provider: &'a P,
        source_root: &'a Path,
        target_root: &'a Path,
        options: &'a CopyOptions,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            provider,
            source_root,
            target_root,
            options,
            sink,
            stats: CopyStats::default(),
        }
    }

    pub(crate) fn into_stats(self) -> CopyStats {
        self.stats
    }

    fn pair(&self, node: &Path) -> PathPair {
        PathPair::new(self.source_root, node, self.target_root)
    }

    fn report(&mut self, error: Error) {
        self.stats.errors += 1;
        self.sink.report(error);
    }
}

impl<P: SourceProvider + ?Sized> Visitor for TreeCopier<'_, P> {
    fn pre_visit_directory(&mut self, dir: &Path, meta: &NodeMeta) -> Visit {
        let pair = self.pair(dir);
        let is_root = pair.is_root(self.target_root);
        match enter_directory(&pair, is_root) {
            Ok(DirState::Created) => {
                self.stats.dirs_created += 1;
                if let Err(e) = stamp_created(&pair, meta, self.options) {
                    self.report(e);
                }
                Visit::Continue
            }
            Ok(DirState::Existing) => {
                self.stats.dirs_existing += 1;
                Visit::Continue
            }
            Err(e) => {
                self.report(e);
                Visit::SkipSubtree
            }
        }
    }

    fn visit_file(&mut self, file: &Path, meta: &NodeMeta) {
        let pair = self.pair(file);
        match copy_file(self.provider, &pair.src, &pair.dst, meta, self.options) {
            Ok(bytes) => {
                self.stats.files_copied += 1;
                self.stats.bytes_copied += bytes;
            }
            Err(e) => self.report(e),
        }
    }

    fn post_visit_directory(&mut self, dir: &Path) {
        if !self.options.preserve_attributes {
            return;
        }
        let pair = self.pair(dir);
        if let Err(e) = leave_directory(self.provider, &pair) {
            self.report(e);
        }
    }

    fn visit_failed(&mut self, path: &Path, error: WalkError) {
        let error = match error {
            WalkError::Cycle => Error::CycleDetected(path.to_path_buf()),
            WalkError::Unsupported => Error::UnsupportedNode(path.to_path_buf()),
            WalkError::Io(source) => Error::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        };
        self.report(error);
    }
}

/// Copy the tree at `locator` into `target`.
///
/// `locator` is a plain path or `<container>!<inner path>` for a directory
/// inside a zip archive. Every failure is reported to `sink`; the returned
/// [`CopyStats`] counts them in `errors`. If the session cannot be opened
/// (bad locator, unreadable container, missing source) that single error is
/// reported and nothing is copied.
///
/// The container, if any, is closed before this function returns.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use treecopy::{CopyOptions, Error, copy_tree};
///
/// let mut diagnostics: Vec<Error> = Vec::new();
/// let stats = copy_tree("/srv/site", Path::new("/backup/site"), &CopyOptions::default(), &mut diagnostics);
/// for error in &diagnostics {
///     eprintln!("{error}");
/// }
/// assert_eq!(stats.errors as usize, diagnostics.len());
/// ```
pub fn copy_tree(
    locator: &str,
    target: &Path,
    options: &CopyOptions,
    sink: &mut dyn DiagnosticSink,
) -> CopyStats {
    let start_time = Instant::now();

    let mut session = match CopySession::open(locator, target, options.clone()) {
        Ok(session) => session,
        Err(e) => {
            sink.report(e);
            return CopyStats {
                errors: 1,
                duration: start_time.elapsed(),
                ..CopyStats::default()
            };
        }
    };

    let mut stats = match session.run(sink) {
        Ok(stats) => stats,
        Err(e) => {
            sink.report(e);
            CopyStats {
                errors: 1,
                ..CopyStats::default()
            }
        }
    };

    if let Err(e) = session.close() {
        sink.report(e);
        stats.errors += 1;
    }

    stats.duration = start_time.elapsed();
    stats
}

// =============================================================================
// Tests
// =============================================================================
