//! Source providers.
//!
//! A [`SourceProvider`] is everything the walker and the copiers need from
//! the place a tree is read from: node attributes, directory listings and
//! file bytes. The concrete provider is picked once when a
//! [`CopySession`](crate::CopySession) opens, so traversal and copy code never
//! branch on where the source lives.

mod archive;
mod native;

pub use archive::ZipProvider;
pub use native::NativeProvider;

use filetime::FileTime;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a source node, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Anything else (socket, FIFO, device)
    Other,
}

/// Identity of a directory, used to detect traversal cycles.
///
/// On Unix this is `(dev, ino)`.
pub type NodeId = (u64, u64);

/// Attributes of one source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMeta {
    /// What the node is
    pub kind: NodeKind,
    /// Content length in bytes (0 for directories)
    pub len: u64,
    /// Last modification time, if the provider records one
    pub modified: Option<FileTime>,
    /// Stable identity, if the provider can have cycles (symlinks)
    pub id: Option<NodeId>,
}

impl NodeMeta {
    /// Whether the node is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }
}

/// Read access to a source tree.
///
/// Paths handed to a provider are paths in the provider's own namespace: a
/// native path for [`NativeProvider`], an archive-relative path for
/// [`ZipProvider`].
pub trait SourceProvider {
    /// Read the attributes of `path`, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<NodeMeta>;

    /// List the children of the directory at `path` as full provider paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Copy the content of the file at `path` into `dst`, returning bytes copied.
    fn copy_into(&self, path: &Path, dst: &File) -> io::Result<u64>;

    /// Release any resource held by the provider.
    ///
    /// Must be idempotent. After a successful close every other method fails.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
