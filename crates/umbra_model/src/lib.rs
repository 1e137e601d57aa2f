//! Structural model extraction for Verilog design text.
//!
//! This is not a Verilog front end. The scanner understands just enough of
//! the language to find module headers, port declarations, instantiations
//! and port connections, and to work out the bit width of simple connection
//! actuals. Everything else in the text is stepped over.
//!
//! [`extract`] returns an [`Extraction`]: the [`DesignModel`] together with
//! the warnings produced for elements that were malformed and skipped.

#![warn(missing_docs)]

pub mod errors;
pub mod lexer;
pub mod model;
pub mod scanner;
pub mod token;
pub mod width;

pub use model::{
    positional_formal, ActualWidth, Connection, DesignModel, Instantiation, Module, Port,
};
pub use scanner::scan;

use umbra_diagnostics::{Diagnostic, DiagnosticSink};
use umbra_source::FileId;

/// A model and the diagnostics collected while building it.
#[derive(Debug)]
pub struct Extraction {
    /// The (possibly partial) structural model.
    pub model: DesignModel,
    /// Warnings for skipped or defaulted elements.
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts the structural model of `source`.
pub fn extract(source: &str, file: FileId) -> Extraction {
    let sink = DiagnosticSink::new();
    let model = scan(source, file, &sink);
    tracing::info!(
        modules = model.len(),
        warnings = sink.diagnostics().len(),
        "extracted structural model"
    );
    Extraction {
        model,
        diagnostics: sink.into_diagnostics(),
    }
}
