//! Zip container provider.
//!
//! The archive's central directory is indexed once at open time. Directory
//! entries that the archive only implies (a file `a/b/c.txt` with no `a/` or
//! `a/b/` entries) are added to the index, so every archive walks like a
//! complete tree.

use super::{NodeKind, NodeMeta, SourceProvider};
use crate::error::closed_error;
use crate::locator::normalize_inner;
use filetime::FileTime;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::{DateTime, ZipArchive};

type Archive = ZipArchive<BufReader<File>>;

#[derive(Debug, Clone)]
struct ZipNode {
    kind: NodeKind,
    len: u64,
    modified: Option<FileTime>,
    /// Index in the archive, `None` for implied directories
    index: Option<usize>,
    children: Vec<PathBuf>,
    /// The archive holds both a file and a directory at this path
    conflict: bool,
}

impl ZipNode {
    fn implied_dir() -> Self {
        Self {
            kind: NodeKind::Dir,
            len: 0,
            modified: None,
            index: None,
            children: Vec::new(),
            conflict: false,
        }
    }

    fn file(index: usize, len: u64, modified: Option<FileTime>) -> Self {
        Self {
            kind: NodeKind::File,
            len,
            modified,
            index: Some(index),
            children: Vec::new(),
            conflict: false,
        }
    }
}

/// Reads a tree from a zip container.
///
/// Provider paths are archive-relative (`data/x.txt`); the empty path is the
/// archive root. The container file stays open until [`close`] is called or
/// the provider is dropped.
///
/// [`close`]: SourceProvider::close
pub struct ZipProvider {
    path: PathBuf,
    archive: RefCell<Option<Archive>>,
    nodes: BTreeMap<PathBuf, ZipNode>,
}

impl fmt::Debug for ZipProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipProvider")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl ZipProvider {
    /// Open the container at `path` and index its entries.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or is not a readable zip archive.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;
        let nodes = index_entries(&mut archive)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(container = %path.display(), entries = archive.len(), "opened container");

        Ok(Self {
            path: path.to_path_buf(),
            archive: RefCell::new(Some(archive)),
            nodes,
        })
    }

    /// Path of the container file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the container is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.archive.borrow().is_some()
    }

    fn node(&self, path: &Path) -> io::Result<&ZipNode> {
        if !self.is_open() {
            return Err(closed_error());
        }
        let node = self.nodes.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry {} in {}", path.display(), self.path.display()),
            )
        })?;
        if node.conflict {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} is both a file and a directory in {}",
                    path.display(),
                    self.path.display()
                ),
            ));
        }
        Ok(node)
    }
}

impl SourceProvider for ZipProvider {
    fn metadata(&self, path: &Path) -> io::Result<NodeMeta> {
        let node = self.node(path)?;
        Ok(NodeMeta {
            kind: node.kind,
            len: node.len,
            modified: node.modified,
            id: None,
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let node = self.node(path)?;
        if node.kind != NodeKind::Dir {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(node.children.clone())
    }

    fn copy_into(&self, path: &Path, dst: &File) -> io::Result<u64> {
        let index = match self.node(path)? {
            ZipNode {
                kind: NodeKind::File,
                index: Some(index),
                ..
            } => *index,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a file", path.display()),
                ));
            }
        };

        let mut archive = self.archive.borrow_mut();
        let archive = archive.as_mut().ok_or_else(closed_error)?;
        let mut entry = archive.by_index(index).map_err(zip_error)?;
        io::copy(&mut entry, &mut &*dst)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.archive.get_mut().take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(container = %self.path.display(), "closed container");
        }
        Ok(())
    }
}

/// Build the path index, adding implied parent directories.
///
/// Only entry headers are read, so an entry that cannot be decompressed
/// (unsupported method, encryption) is indexed like any other and fails on
/// its own when copied. A path that names both a file entry and a directory
/// is kept in the tree but marked as a conflict.
fn index_entries(archive: &mut Archive) -> io::Result<BTreeMap<PathBuf, ZipNode>> {
    let mut nodes = BTreeMap::new();
    nodes.insert(PathBuf::new(), ZipNode::implied_dir());
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(zip_error)?;
        let Some(path) = entry.enclosed_name().and_then(|name| normalize_inner(name)) else {
            // absolute or `..` names would land outside the tree
            #[cfg(feature = "tracing")]
            tracing::warn!(entry = entry.name(), "ignoring unsafe archive entry name");
            continue;
        };
        if path.as_os_str().is_empty() {
            continue;
        }

        for ancestor in path.ancestors().skip(1) {
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert_with(ZipNode::implied_dir);
        }

        let modified = dos_time_to_filetime(entry.last_modified());
        if entry.is_dir() {
            let node = nodes.entry(path).or_insert_with(ZipNode::implied_dir);
            node.modified = modified;
            node.index = Some(i);
        } else {
            files.push((path, ZipNode::file(i, entry.size(), modified)));
        }
    }

    // directories are all known now, so a clash does not depend on entry order
    for (path, file) in files {
        match nodes.get_mut(&path) {
            Some(node) if node.kind == NodeKind::Dir => {
                #[cfg(feature = "tracing")]
                tracing::warn!(entry = %path.display(), "archive entry is both a file and a directory");
                node.conflict = true;
            }
            _ => {
                nodes.insert(path, file);
            }
        }
    }

    let paths: Vec<PathBuf> = nodes
        .keys()
        .filter(|path| !path.as_os_str().is_empty())
        .cloned()
        .collect();
    for path in paths {
        let parent = path.parent().unwrap_or(Path::new("")).to_path_buf();
        if let Some(parent) = nodes.get_mut(&parent) {
            parent.children.push(path);
        }
    }

    Ok(nodes)
}

fn zip_error(error: ZipError) -> io::Error {
    match error {
        ZipError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

/// Convert an MS-DOS timestamp (no zone, read as UTC) to a [`FileTime`].
///
/// Dates the calendar rejects (day 0, month 13) have no time.
fn dos_time_to_filetime(time: DateTime) -> Option<FileTime> {
    let time = time.to_time().ok()?;
    Some(FileTime::from_unix_time(time.unix_timestamp(), 0))
}
