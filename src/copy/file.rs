//! Single file copy.
//!
//! Content is written to a temporary file next to the target and renamed
//! into place, so the target is replaced in one step and never observed
//! half-written. When attributes are preserved the modification time is set
//! on the temporary file before the rename and arrives with the content.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::provider::{NodeMeta, SourceProvider};
use std::path::Path;

use super::utils::{apply_mtime, temp_file_in};

/// Copy one file from `provider` to `dst`, replacing whatever file is there.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns [`Error::FileCopy`] if the content cannot be read or written, the
/// modification time cannot be set, or `dst` cannot be replaced (for example
/// because it is a directory).
pub(crate) fn copy_file<P: SourceProvider + ?Sized>(
    provider: &P,
    src: &Path,
    dst: &Path,
    meta: &NodeMeta,
    options: &CopyOptions,
) -> Result<u64> {
    let wrap = |source| Error::FileCopy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };

    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = temp_file_in(dst_parent).map_err(wrap)?;
    let bytes = provider.copy_into(src, temp_file.as_file()).map_err(wrap)?;

    if options.fsync {
        temp_file.as_file().sync_all().map_err(wrap)?;
    }

    if options.preserve_attributes {
        if let Some(mtime) = meta.modified {
            apply_mtime(temp_file.path(), mtime).map_err(wrap)?;
        }
    }

    // rename over any existing file
    temp_file.persist(dst).map_err(|e| wrap(e.error))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(src = %src.display(), dst = %dst.display(), bytes, "copied file");

    Ok(bytes)
}
