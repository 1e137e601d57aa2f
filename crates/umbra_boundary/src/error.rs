//! Fatal boundary errors and their diagnostic codes.

use thiserror::Error;
use umbra_diagnostics::{Category, Diagnostic, DiagnosticCode};
use umbra_source::Span;

/// Boundary module missing from the design.
pub const B301: DiagnosticCode = DiagnosticCode {
    category: Category::Boundary,
    number: 301,
};

/// Whitebox target not below the boundary.
pub const B302: DiagnosticCode = DiagnosticCode {
    category: Category::Boundary,
    number: 302,
};

/// Cyclic module instantiation.
pub const B303: DiagnosticCode = DiagnosticCode {
    category: Category::Boundary,
    number: 303,
};

/// Errors that abort boundary propagation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The boundary module is not part of the design.
    #[error("boundary module `{module}` not found in the design")]
    BoundaryNotFound {
        /// The requested boundary.
        module: String,
    },

    /// A whitebox target is not reachable from the boundary.
    #[error("whitebox target `{module}` is not instantiated below boundary `{boundary}`")]
    UnknownWhiteboxTarget {
        /// The offending whitebox name.
        module: String,
        /// The boundary it was checked against.
        boundary: String,
    },

    /// The module hierarchy contains a cycle.
    #[error("cyclic instantiation among modules {}", format_members(.cycle))]
    CyclicDependency {
        /// Modules on the cycle.
        cycle: Vec<String>,
    },
}

fn format_members(cycle: &[String]) -> String {
    cycle
        .iter()
        .map(|m| format!("`{m}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl BoundaryError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            BoundaryError::BoundaryNotFound { .. } => B301,
            BoundaryError::UnknownWhiteboxTarget { .. } => B302,
            BoundaryError::CyclicDependency { .. } => B303,
        }
    }

    /// Converts the error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), Span::DUMMY);
        match self {
            BoundaryError::BoundaryNotFound { .. } => {
                diag.with_help("pass `--boundary` or set `boundary.module` in umbra.toml")
            }
            BoundaryError::UnknownWhiteboxTarget { .. } => diag
                .with_help("whitebox targets must be instantiated, directly or indirectly, by the boundary"),
            BoundaryError::CyclicDependency { .. } => {
                diag.with_note("a module directly or indirectly instantiates itself")
            }
        }
    }
}
