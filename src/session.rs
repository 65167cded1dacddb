//! Copy sessions.
//!
//! A [`CopySession`] binds one source (a directory, or a directory inside a
//! zip container) to one target root for the duration of a copy. When the
//! source is an archive the session owns the open container and releases it
//! exactly once: on [`CopySession::close`], or on drop if it was never closed
//! explicitly.

use crate::copy::{CopyStats, TreeCopier};
use crate::error::{Error, Result};
use crate::locator::SourceLocator;
use crate::options::CopyOptions;
use crate::provider::{NativeProvider, SourceProvider, ZipProvider};
use crate::sink::DiagnosticSink;
use crate::walk::TreeWalker;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One copy request: a resolved source root, a target root and fixed options.
///
/// # Example
///
/// ```no_run
/// use treecopy::{CopyOptions, CopySession, Error};
///
/// let mut session = CopySession::open("site.zip!/public", "out", CopyOptions::default())?;
/// let mut diagnostics: Vec<Error> = Vec::new();
/// let stats = session.run(&mut diagnostics)?;
/// session.close()?;
/// println!("{} files, {} errors", stats.files_copied, stats.errors);
/// # Ok::<(), treecopy::Error>(())
/// ```
pub struct CopySession {
    provider: Box<dyn SourceProvider>,
    container: Option<PathBuf>,
    source_root: PathBuf,
    target_root: PathBuf,
    options: CopyOptions,
    closed: bool,
}

impl std::fmt::Debug for CopySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopySession")
            .field("container", &self.container)
            .field("source_root", &self.source_root)
            .field("target_root", &self.target_root)
            .field("options", &self.options)
            .field("closed", &self.closed)
            .finish()
    }
}

impl CopySession {
    /// Parse `locator` and open a session copying it into `target_root`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLocator`] if the locator cannot be parsed
    /// - [`Error::ContainerOpen`] if the archive cannot be opened
    /// - [`Error::SourceNotFound`] if the source root does not exist
    pub fn open(locator: &str, target_root: impl AsRef<Path>, options: CopyOptions) -> Result<Self> {
        Self::from_locator(SourceLocator::parse(locator)?, target_root, options)
    }

    /// Open a session from an already parsed locator.
    ///
    /// # Errors
    ///
    /// Same as [`CopySession::open`], minus locator parsing.
    pub fn from_locator(
        locator: SourceLocator,
        target_root: impl AsRef<Path>,
        options: CopyOptions,
    ) -> Result<Self> {
        let (provider, container, source_root) = match locator {
            SourceLocator::Plain(path) => (Box::new(NativeProvider) as Box<dyn SourceProvider>, None, path),
            SourceLocator::Archive { container, inner } => {
                // nothing is resolved inside a container that failed to open
                let provider = ZipProvider::open(&container).map_err(|source| Error::ContainerOpen {
                    path: container.clone(),
                    source,
                })?;
                (Box::new(provider) as Box<dyn SourceProvider>, Some(container), inner)
            }
        };

        let session = Self {
            provider,
            container,
            source_root,
            target_root: target_root.as_ref().to_path_buf(),
            options,
            closed: false,
        };

        // An unreadable root is left for the walk to report; only absence is fatal.
        if let Err(e) = session.provider.metadata(&session.source_root) {
            if e.kind() == io::ErrorKind::NotFound {
                return Err(Error::SourceNotFound(session.display_source()));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = %session.display_source().display(),
            target = %session.target_root.display(),
            preserve = session.options.preserve_attributes,
            "opened copy session"
        );

        Ok(session)
    }

    /// Root of the tree being copied, in the provider's namespace.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory the tree is copied into.
    #[must_use]
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Container file, when the source is inside an archive.
    #[must_use]
    pub fn container(&self) -> Option<&Path> {
        self.container.as_deref()
    }

    /// Options fixed for this session.
    #[must_use]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// The provider the session reads from.
    ///
    /// After [`close`](Self::close) every provider call on an archive session
    /// fails.
    #[must_use]
    pub fn provider(&self) -> &dyn SourceProvider {
        self.provider.as_ref()
    }

    /// Whether [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Copy the tree, reporting every failure to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContainerClosed`] if the session was already closed.
    /// Per-entry failures are never returned; they go to `sink` and are
    /// counted in [`CopyStats::errors`].
    pub fn run(&self, sink: &mut dyn DiagnosticSink) -> Result<CopyStats> {
        if self.closed {
            return Err(Error::ContainerClosed(self.display_source()));
        }

        let start_time = Instant::now();
        let provider = self.provider.as_ref();
        let mut copier = TreeCopier::new(
            provider,
            &self.source_root,
            &self.target_root,
            &self.options,
            sink,
        );
        TreeWalker::new(provider).walk(&self.source_root, &mut copier);

        let mut stats = copier.into_stats();
        stats.duration = start_time.elapsed();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            files = stats.files_copied,
            bytes = stats.bytes_copied,
            errors = stats.errors,
            "copy finished"
        );

        Ok(stats)
    }

    /// Release the container, if any.
    ///
    /// Idempotent: only the first call closes anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContainerClose`] if the container could not be
    /// released. Completed copies are unaffected.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.provider.close().map_err(|source| Error::ContainerClose {
            path: self.display_source(),
            source,
        })
    }

    fn display_source(&self) -> PathBuf {
        match &self.container {
            Some(container) => container.join(&self.source_root),
            None => self.source_root.clone(),
        }
    }
}

impl Drop for CopySession {
    fn drop(&mut self) {
        if let Err(_e) = self.close() {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", _e);
        }
    }
}
