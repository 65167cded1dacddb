//! Directory creation and timestamp fix-up.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::path::PathPair;
use crate::provider::{NodeMeta, SourceProvider};
use std::fs;
use std::io;

use super::utils::apply_mtime;

/// What [`enter_directory`] found at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirState {
    /// The directory was created
    Created,
    /// A directory was already there and is used as-is
    Existing,
}

/// Create the target directory for `pair`.
///
/// The target root is created with its missing parents; every other
/// directory is created alone, its parent having been entered first.
/// An existing directory is accepted.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] if the directory cannot be created or
/// a non-directory occupies the target path. The caller skips the subtree.
pub(crate) fn enter_directory(pair: &PathPair, is_root: bool) -> Result<DirState> {
    if is_root && pair.dst.is_dir() {
        return Ok(DirState::Existing);
    }

    let created = if is_root {
        fs::create_dir_all(&pair.dst)
    } else {
        fs::create_dir(&pair.dst)
    };

    match created {
        Ok(()) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(dst = %pair.dst.display(), "created directory");
            Ok(DirState::Created)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && pair.dst.is_dir() => {
            Ok(DirState::Existing)
        }
        Err(source) => Err(Error::DirectoryCreate {
            path: pair.dst.clone(),
            source,
        }),
    }
}

/// Give a directory that [`enter_directory`] just created the source mtime.
///
/// Runs before the children are copied; [`leave_directory`] sets it again
/// once they are done. Does nothing unless attributes are preserved.
///
/// # Errors
///
/// Returns [`Error::AttributeFixup`] if the mtime cannot be set. The
/// directory is still usable and its subtree is still copied.
pub(crate) fn stamp_created(pair: &PathPair, meta: &NodeMeta, options: &CopyOptions) -> Result<()> {
    if !options.preserve_attributes {
        return Ok(());
    }
    match meta.modified {
        Some(mtime) => apply_mtime(&pair.dst, mtime).map_err(|source| Error::AttributeFixup {
            path: pair.dst.clone(),
            source,
        }),
        None => Ok(()),
    }
}

/// Copy the source directory's modification time onto the target.
///
/// Re-reads the source attributes, since the walk may have taken a while.
/// Implied archive directories carry no timestamp and are left alone.
///
/// # Errors
///
/// Returns [`Error::AttributeFixup`] if the source cannot be read or the
/// target's mtime cannot be set.
pub(crate) fn leave_directory<P: SourceProvider + ?Sized>(provider: &P, pair: &PathPair) -> Result<()> {
    let wrap = |source| Error::AttributeFixup {
        path: pair.dst.clone(),
        source,
    };

    let meta = provider.metadata(&pair.src).map_err(wrap)?;
    if let Some(mtime) = meta.modified {
        apply_mtime(&pair.dst, mtime).map_err(wrap)?;
    }
    Ok(())
}
