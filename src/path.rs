//! Source-to-target path mapping.

use std::path::{Component, Path, PathBuf};

/// A source node and the target path it is copied to.
///
/// The target is the node's path relative to the source root, joined onto the
/// target root. Only normal components of the relative part are joined, so a
/// mapped path never leaves the target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    /// Path of the node in the source provider
    pub src: PathBuf,
    /// Path on the target filesystem
    pub dst: PathBuf,
}

impl PathPair {
    /// Map `node` (under `source_root`) onto `target_root`.
    #[must_use]
    pub fn new(source_root: &Path, node: &Path, target_root: &Path) -> Self {
        let relative = node.strip_prefix(source_root).unwrap_or(node);
        let mut dst = target_root.to_path_buf();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                dst.push(part);
            }
        }
        Self {
            src: node.to_path_buf(),
            dst,
        }
    }

    /// Whether this pair maps the source root itself.
    #[must_use]
    pub fn is_root(&self, target_root: &Path) -> bool {
        self.dst == target_root
    }
}
