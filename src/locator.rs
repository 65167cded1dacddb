//! Source locator parsing.
//!
//! A locator is either a plain filesystem path or `<container>!<inner>`, the
//! form used to address a directory inside an archive (`pkg.zip!/data`,
//! `jar:file:///opt/app.jar!/assets`).
//!
//! Exactly one `!` selects the archive form. A locator with more than one
//! `!` is rejected rather than split at a guess.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

const SEPARATOR: char = '!';

/// Where a copy reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// A directory (or file) on the native filesystem
    Plain(PathBuf),
    /// A path inside an archive container
    Archive {
        /// Container file on the native filesystem
        container: PathBuf,
        /// Normalised path inside the container, empty for the archive root
        inner: PathBuf,
    },
}

impl SourceLocator {
    /// Parse a locator string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocator`] if the locator is empty, has more
    /// than one `!`, names an empty container, or has an inner path that
    /// climbs out of the archive root.
    pub fn parse(locator: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidLocator {
            locator: locator.to_string(),
            reason,
        };

        if locator.is_empty() {
            return Err(invalid("empty locator"));
        }

        let mut parts = locator.split(SEPARATOR);
        let head = parts.next().unwrap_or_default();
        let Some(inner) = parts.next() else {
            return Ok(Self::Plain(PathBuf::from(locator)));
        };
        if parts.next().is_some() {
            return Err(invalid("expected exactly one '!' separator"));
        }

        let container = strip_scheme(head);
        if container.is_empty() {
            return Err(invalid("empty container path"));
        }
        let inner = normalize_inner(inner).ok_or_else(|| invalid("inner path escapes the archive root"))?;

        Ok(Self::Archive {
            container: PathBuf::from(container),
            inner,
        })
    }
}

/// Strip `jar:`/`zip:` scheme prefixes and a `file://` prefix from a container URI.
fn strip_scheme(uri: &str) -> &str {
    let mut rest = uri;
    for scheme in ["jar:", "zip:"] {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
        }
    }
    rest.strip_prefix("file://").unwrap_or(rest)
}

/// Normalise an archive-internal path to a relative path with no `.` parts.
///
/// Returns `None` when the path contains `..`.
pub(crate) fn normalize_inner(inner: impl AsRef<Path>) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in inner.as_ref().components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}
