//! Diagnostic sinks.
//!
//! Per-entry failures are not returned to the caller. They are reported to
//! a [`DiagnosticSink`] as they happen and the copy carries on.

use crate::error::Error;

/// Receives every error reported during a copy session.
pub trait DiagnosticSink {
    /// Report one error.
    fn report(&mut self, error: Error);
}

/// Collects reported errors in order.
impl DiagnosticSink for Vec<Error> {
    fn report(&mut self, error: Error) {
        self.push(error);
    }
}

/// Writes each reported error as one line on standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, error: Error) {
        eprintln!("{error}");
    }
}

/// Emits each reported error as a `tracing` warning.
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl DiagnosticSink for TracingSink {
    fn report(&mut self, error: Error) {
        tracing::warn!("{}", error);
    }
}
