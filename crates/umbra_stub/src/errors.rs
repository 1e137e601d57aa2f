//! Diagnostic codes for interface synthesis.

use umbra_diagnostics::{Category, Diagnostic, DiagnosticCode};
use umbra_source::Span;

/// Stub port whose width could not be inferred from any connection.
pub const I201: DiagnosticCode = DiagnosticCode {
    category: Category::Interface,
    number: 201,
};

/// Creates the advisory for a stub port with no resolvable width.
pub fn note_unresolved_width(module: &str, port: &str, span: Span) -> Diagnostic {
    Diagnostic::note(
        I201,
        format!("width of port `{port}` of `{module}` could not be inferred"),
        span,
    )
    .with_note("the port is declared one bit wide")
}
