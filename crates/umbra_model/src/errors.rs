//! Diagnostic codes and helper functions for structural extraction.
//!
//! Codes `P100`--`P105` are all warnings: the offending element is skipped
//! (or given a conservative default) and extraction carries on with the rest
//! of the design.

use umbra_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use umbra_source::Span;

/// Malformed token (unterminated comment or string, empty escaped name).
pub const P100: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 100,
};

/// Module header whose port or parameter list is never closed.
pub const P101: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 101,
};

/// Instantiation with unbalanced parentheses.
pub const P102: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 102,
};

/// Module without `endmodule`.
pub const P103: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 103,
};

/// Module declared more than once.
pub const P104: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 104,
};

/// Header port never given a direction.
pub const P105: DiagnosticCode = DiagnosticCode {
    category: Category::Parse,
    number: 105,
};

/// Creates a diagnostic for a malformed token.
pub fn warn_malformed_token(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(P100, msg, span)
}

/// Creates a diagnostic for an unterminated module header.
pub fn warn_unterminated_header(module: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        P101,
        format!("unterminated header for module `{module}`"),
        span,
    )
    .with_note("the module is skipped")
}

/// Creates a diagnostic for an unbalanced instantiation.
pub fn warn_unbalanced_instantiation(target: &str, instance: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        P102,
        format!("unbalanced parentheses in instantiation `{instance}` of `{target}`"),
        span,
    )
    .with_note("the instantiation is skipped")
}

/// Creates a diagnostic for a module missing its `endmodule`.
pub fn warn_missing_endmodule(module: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        P103,
        format!("module `{module}` has no matching `endmodule`"),
        span,
    )
    .with_note("the module is skipped")
}

/// Creates a diagnostic for a duplicate module declaration.
pub fn warn_duplicate_module(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::warning(P104, format!("duplicate module `{name}`"), span)
        .with_label(Label::secondary(prev_span, "first declared here"))
        .with_note("the first declaration is kept")
}

/// Creates a diagnostic for a header port with no direction declaration.
pub fn warn_undeclared_direction(module: &str, port: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        P105,
        format!("port `{port}` of module `{module}` has no direction"),
        span,
    )
    .with_help(format!("declare `input {port};` or `output {port};` in the module body"))
    .with_note("treated as an input")
}
