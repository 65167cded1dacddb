//! Error types for treecopy.
//!
//! This module provides the [`Error`] enum containing every failure a copy
//! session can produce, and the [`Result`] type alias.
//!
//! Only session-level errors ([`Error::InvalidLocator`],
//! [`Error::ContainerOpen`]) stop a copy before it starts. Everything else is
//! handed to a [`DiagnosticSink`](crate::DiagnosticSink) and the copy keeps
//! going.
//!
//! # Error Categories
//!
//! | Category | Errors | Effect |
//! |----------|--------|--------|
//! | Session | [`Error::InvalidLocator`], [`Error::ContainerOpen`], [`Error::SourceNotFound`] | nothing copied |
//! | Subtree | [`Error::DirectoryCreate`] | children skipped |
//! | Entry | [`Error::FileCopy`], [`Error::AttributeFixup`], [`Error::Unreadable`], [`Error::UnsupportedNode`] | entry skipped |
//! | Traversal | [`Error::CycleDetected`] | branch not re-entered |
//! | Teardown | [`Error::ContainerClose`] | completed copies kept |
//! | Lifecycle | [`Error::ContainerClosed`] | handle used after close |

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for treecopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a copy session.
///
/// Every variant renders as a single human-readable line naming the
/// operation, the offending path(s) and the underlying cause.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The source locator could not be split into container and inner path
    #[error("Invalid source locator {locator:?}: {reason}")]
    InvalidLocator {
        /// The locator as given
        locator: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The archive container could not be opened
    #[error("Unable to open container {path}: {source}")]
    ContainerOpen {
        /// Container file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The archive container could not be closed cleanly
    #[error("Unable to close container {path}: {source}")]
    ContainerClose {
        /// Container file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The container was used after the session closed it
    #[error("Container already closed: {0}")]
    ContainerClosed(PathBuf),

    /// Source root does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Target directory could not be created; its subtree was skipped
    #[error("Unable to create: {path}: {source}")]
    DirectoryCreate {
        /// Target directory path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Modification time could not be applied to a target
    #[error("Unable to copy all attributes to: {path}: {source}")]
    AttributeFixup {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// File content could not be copied
    #[error("Unable to copy: {src} to {dst}: {source}")]
    FileCopy {
        /// Source path (inside the source provider)
        src: PathBuf,
        /// Target path
        dst: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A source node could not be read during traversal
    #[error("Unable to copy: {path}: {source}")]
    Unreadable {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A source node is neither a file nor a directory (socket, device, ...)
    #[error("Skipping special file: {0}")]
    UnsupportedNode(PathBuf),

    /// Symlink loop detected (directory is its own ancestor)
    #[error("cycle detected: {0}")]
    CycleDetected(PathBuf),
}

impl Error {
    /// Whether this error stops the session before anything is copied.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidLocator { .. } | Self::ContainerOpen { .. } | Self::SourceNotFound(_)
        )
    }

    /// Stable snake_case name of the variant, for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLocator { .. } => "invalid_locator",
            Self::ContainerOpen { .. } => "container_open",
            Self::ContainerClose { .. } => "container_close",
            Self::ContainerClosed(_) => "container_closed",
            Self::SourceNotFound(_) => "source_not_found",
            Self::DirectoryCreate { .. } => "directory_create",
            Self::AttributeFixup { .. } => "attribute_fixup",
            Self::FileCopy { .. } => "file_copy",
            Self::Unreadable { .. } => "unreadable",
            Self::UnsupportedNode(_) => "unsupported_node",
            Self::CycleDetected(_) => "cycle_detected",
        }
    }
}

/// Build the error returned by provider calls made after the container closed.
pub(crate) fn closed_error() -> io::Error {
    io::Error::other("container is closed")
}
