//! Diagnostic accumulator for a single run.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::cell::{Cell, RefCell};

/// Collects diagnostics emitted while a run progresses.
///
/// A run is single-threaded, so the sink uses interior mutability instead of
/// locks; phases share it through `&DiagnosticSink`.
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
    error_count: Cell<usize>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            error_count: Cell::new(0),
        }
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Error {
            self.error_count.set(self.error_count.get() + 1);
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Returns `true` if an error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count.get() > 0
    }

    /// Number of error-severity diagnostics recorded.
    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }

    /// Number of diagnostics of exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drains all diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Returns a copy of the recorded diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Consumes the sink, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
