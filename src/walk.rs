//! Depth-first tree traversal.
//!
//! [`TreeWalker`] walks any [`SourceProvider`] top-down and drives a
//! [`Visitor`]. A directory's pre-order hook runs before any of its children
//! are visited and its post-order hook after all of them, so a visitor can
//! create a directory first and fix up its timestamp last.
//!
//! A failure to visit one node never stops the walk. It is passed to
//! [`Visitor::visit_failed`] and the walk moves on to the next sibling.

use crate::provider::{NodeId, NodeKind, NodeMeta, SourceProvider};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// What the walker does after a directory's pre-order hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the directory
    Continue,
    /// Do not visit the directory's children or call its post-order hook
    SkipSubtree,
}

/// Why a node could not be visited.
#[derive(Debug)]
pub enum WalkError {
    /// Reading the node's attributes or listing it failed
    Io(io::Error),
    /// The directory is one of its own ancestors (reached through a symlink)
    Cycle,
    /// The node is neither a file nor a directory
    Unsupported,
}

/// Callbacks invoked by [`TreeWalker`].
pub trait Visitor {
    /// Called for a directory before its children.
    fn pre_visit_directory(&mut self, dir: &Path, meta: &NodeMeta) -> Visit;

    /// Called for every file.
    fn visit_file(&mut self, file: &Path, meta: &NodeMeta);

    /// Called for a directory after all its children.
    fn post_visit_directory(&mut self, dir: &Path);

    /// Called for a node that could not be visited.
    fn visit_failed(&mut self, path: &Path, error: WalkError);
}

/// Pre-order, depth-first walker over a [`SourceProvider`].
///
/// Symlinks are followed (the provider reports the link target's
/// attributes) and there is no depth limit. Directory identities on the
/// current ancestor chain are tracked so a symlink pointing back up the tree
/// is reported as a cycle instead of recursing forever.
pub struct TreeWalker<'a, P: SourceProvider + ?Sized> {
    provider: &'a P,
    ancestors: HashSet<NodeId>,
}

impl<'a, P: SourceProvider + ?Sized> TreeWalker<'a, P> {
    /// Create a walker reading from `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            ancestors: HashSet::new(),
        }
    }

    /// Walk the tree rooted at `root`.
    pub fn walk<V: Visitor + ?Sized>(&mut self, root: &Path, visitor: &mut V) {
        self.ancestors.clear();
        self.visit(root, visitor);
    }

    fn visit<V: Visitor + ?Sized>(&mut self, path: &Path, visitor: &mut V) {
        let meta = match self.provider.metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                visitor.visit_failed(path, WalkError::Io(e));
                return;
            }
        };

        match meta.kind {
            NodeKind::File => visitor.visit_file(path, &meta),
            NodeKind::Other => visitor.visit_failed(path, WalkError::Unsupported),
            NodeKind::Dir => self.visit_directory(path, &meta, visitor),
        }
    }

    fn visit_directory<V: Visitor + ?Sized>(&mut self, dir: &Path, meta: &NodeMeta, visitor: &mut V) {
        if let Some(id) = meta.id {
            if self.ancestors.contains(&id) {
                visitor.visit_failed(dir, WalkError::Cycle);
                return;
            }
        }

        let children = match self.provider.read_dir(dir) {
            Ok(children) => children,
            Err(e) => {
                visitor.visit_failed(dir, WalkError::Io(e));
                return;
            }
        };

        if visitor.pre_visit_directory(dir, meta) == Visit::SkipSubtree {
            return;
        }

        if let Some(id) = meta.id {
            self.ancestors.insert(id);
        }
        for child in &children {
            self.visit(child, visitor);
        }
        if let Some(id) = meta.id {
            self.ancestors.remove(&id);
        }

        visitor.post_visit_directory(dir);
    }
}
