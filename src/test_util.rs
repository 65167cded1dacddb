//! Fixtures shared by unit tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::DateTime;
use zip::write::{FileOptions, ZipWriter};

/// One entry of a test archive.
pub(crate) struct ZipEntry<'a> {
    pub name: &'a str,
    /// `None` for a directory entry
    pub content: Option<&'a [u8]>,
}

impl<'a> ZipEntry<'a> {
    pub(crate) fn dir(name: &'a str) -> Self {
        Self { name, content: None }
    }

    pub(crate) fn file(name: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            content: Some(content),
        }
    }
}

/// Fixed timestamp stamped on every entry: 2020-05-17 10:30:00.
pub(crate) const ENTRY_UNIX_TIME: i64 = 1_589_711_400;

/// Write a zip archive at `path` with the given entries.
pub(crate) fn write_zip(path: &Path, entries: &[ZipEntry<'_>]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let stamp = DateTime::from_date_and_time(2020, 5, 17, 10, 30, 0).unwrap();
    let options = FileOptions::default().last_modified_time(stamp);

    for entry in entries {
        match entry.content {
            None => zip.add_directory(entry.name, options).unwrap(),
            Some(content) => {
                zip.start_file(entry.name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
    }
    zip.finish().unwrap();
}

/// Rewrite the compression method recorded for entry `name`, in both its
/// local header and its central directory record. The data is left as is,
/// so a method the reader does not support makes that entry unreadable.
pub(crate) fn set_compression_method(path: &Path, name: &str, method: u16) {
    const LOCAL: &[u8] = b"PK\x03\x04";
    const CENTRAL: &[u8] = b"PK\x01\x02";

    let mut bytes = std::fs::read(path).unwrap();
    let name = name.as_bytes();
    let mut patched = 0;
    let mut pos = 0;
    while pos + 46 <= bytes.len() {
        let header = &bytes[pos..pos + 4];
        // (offset of the method field, offset of the name length, offset of the name)
        let layout = if header == LOCAL {
            Some((8, 26, 30))
        } else if header == CENTRAL {
            Some((10, 28, 46))
        } else {
            None
        };
        if let Some((method_at, len_at, name_at)) = layout {
            let len = usize::from(u16::from_le_bytes([bytes[pos + len_at], bytes[pos + len_at + 1]]));
            if bytes.get(pos + name_at..pos + name_at + len) == Some(name) {
                bytes[pos + method_at..pos + method_at + 2].copy_from_slice(&method.to_le_bytes());
                patched += 1;
            }
        }
        pos += 1;
    }
    assert_eq!(patched, 2, "entry not found in both headers");
    std::fs::write(path, bytes).unwrap();
}
