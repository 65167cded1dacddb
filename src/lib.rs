//! # treecopy
//!
//! Recursive tree copy from a directory, or from a directory inside a zip
//! container, onto the local filesystem.
//!
//! ## Core Features
//!
//! - **Archive sources**: `pkg.zip!/data` copies the `data` directory out of a zip
//! - **Timestamp preserving**: Files and directories keep their modification times
//! - **Best effort**: One failed entry never aborts the copy; failures are reported and counted
//! - **Atomic file writes**: Content lands in a temp file that is renamed over the target
//! - **Symlink following**: Links are copied as what they point to, loops are detected
//! - **Non-destructive merge**: Existing directories are kept, existing files are overwritten
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use treecopy::TreeCopyBuilder;
//!
//! let stats = TreeCopyBuilder::new("theme.zip!/assets", "site/assets").run();
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use std::path::Path;
//! use treecopy::{CopyOptions, Error, copy_tree};
//!
//! let options = CopyOptions::default().without_fsync();
//! let mut diagnostics: Vec<Error> = Vec::new();
//! let stats = copy_tree("data", Path::new("backup"), &options, &mut diagnostics);
//! if stats.errors == 0 {
//!     println!("complete");
//! }
//! ```
//!
//! ## Traversal Order
//!
//! The walk is depth-first and pre-order. A directory is created before any
//! of its children are visited, and its modification time is set after all
//! of them have been written, so child writes cannot disturb it.
//!
//! ## Source Locators
//!
//! A locator with no `!` is a plain path. `<container>!<inner>` addresses a
//! path inside a zip archive; the container may be written as a plain path or
//! a `jar:file://` / `zip:file://` URI. More than one `!` is rejected.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] and [`CopyStats`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod locator;
mod options;
mod path;
mod provider;
mod session;
mod sink;
pub mod walk;

#[cfg(test)]
mod test_util;

pub use builder::TreeCopyBuilder;
pub use copy::{CopyStats, copy_tree};
pub use error::{Error, Result};
pub use locator::SourceLocator;
pub use options::CopyOptions;
pub use path::PathPair;
pub use provider::{NativeProvider, NodeId, NodeKind, NodeMeta, SourceProvider, ZipProvider};
pub use session::CopySession;
pub use sink::{DiagnosticSink, StderrSink};

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use sink::TracingSink;
