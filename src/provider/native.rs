//! Native filesystem provider.

use super::{NodeId, NodeKind, NodeMeta, SourceProvider};
use filetime::FileTime;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Reads a tree from the local filesystem, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProvider;

impl SourceProvider for NativeProvider {
    fn metadata(&self, path: &Path) -> io::Result<NodeMeta> {
        // fs::metadata follows symlinks, which is how the tree is walked
        let meta = fs::metadata(path)?;
        let file_type = meta.file_type();
        let kind = if file_type.is_dir() {
            NodeKind::Dir
        } else if file_type.is_file() {
            NodeKind::File
        } else {
            NodeKind::Other
        };

        Ok(NodeMeta {
            kind,
            len: if kind == NodeKind::File { meta.len() } else { 0 },
            modified: Some(FileTime::from_last_modification_time(&meta)),
            id: Some(node_id(path, &meta)),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn copy_into(&self, path: &Path, dst: &File) -> io::Result<u64> {
        let src = File::open(path)?;
        copy_to_end(&src, dst)
    }
}

/// Device and inode of the node.
#[cfg(unix)]
fn node_id(_path: &Path, meta: &fs::Metadata) -> NodeId {
    use std::os::unix::fs::MetadataExt;
    (meta.dev(), meta.ino())
}

/// Without inode numbers the canonical path stands in for identity.
#[cfg(not(unix))]
fn node_id(path: &Path, _meta: &fs::Metadata) -> NodeId {
    use std::hash::{BuildHasher, RandomState};

    // one hasher state per process, so ids from different calls compare
    static STATE: std::sync::OnceLock<RandomState> = std::sync::OnceLock::new();
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    (0, STATE.get_or_init(RandomState::new).hash_one(&resolved))
}

/// Copy from the current position of `src` until it reports end of file.
#[cfg(not(target_os = "linux"))]
fn copy_to_end(src: &File, dst: &File) -> io::Result<u64> {
    io::copy(&mut &*src, &mut &*dst)
}

/// Copy from the current position of `src` until it reports end of file.
///
/// Uses `copy_file_range` so the data stays in the kernel, falling back to a
/// userspace copy when the first call shows the file pair cannot use it.
#[cfg(target_os = "linux")]
fn copy_to_end(src: &File, dst: &File) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    const CHUNK: usize = 64 * 1024 * 1024;
    let mut copied: u64 = 0;

    loop {
        // SAFETY: both descriptors stay open for the call; null offsets use
        // and advance each file's own position.
        let n = unsafe {
            libc::copy_file_range(
                src.as_raw_fd(),
                std::ptr::null_mut(),
                dst.as_raw_fd(),
                std::ptr::null_mut(),
                CHUNK,
                0,
            )
        };

        match u64::try_from(n) {
            Ok(0) => return Ok(copied),
            Ok(n) => copied += n,
            Err(_) => {
                let err = io::Error::last_os_error();
                let unsupported = matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EOPNOTSUPP)
                );
                if copied == 0 && unsupported {
                    return io::copy(&mut &*src, &mut &*dst);
                }
                return Err(err);
            }
        }
    }
}
