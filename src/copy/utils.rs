//! Helpers shared by the file and directory copiers.

use filetime::{FileTime, set_file_mtime};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

const TEMP_PREFIX: &str = ".treecopy-";

/// Create a temporary file in `dir` to be renamed over the real target.
///
/// On Unix the file is created with mode `0o666` so the process umask
/// applies, like a plain `File::create`, rather than tempfile's private `0o600`.
pub(crate) fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .permissions(Permissions::from_mode(0o666))
            .tempfile_in(dir)
    }
    #[cfg(not(unix))]
    {
        tempfile::Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)
    }
}

/// Set the modification time of `path`, leaving its access time alone.
pub(crate) fn apply_mtime(path: &Path, mtime: FileTime) -> io::Result<()> {
    set_file_mtime(path, mtime)
}
