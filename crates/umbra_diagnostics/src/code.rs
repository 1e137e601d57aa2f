//! Diagnostic codes with a per-phase prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase that produced a diagnostic, which determines its code prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Structural model extraction, prefixed with `P`.
    Parse,
    /// Interface synthesis, prefixed with `I`.
    Interface,
    /// Boundary propagation, prefixed with `B`.
    Boundary,
}

impl Category {
    /// Returns the prefix letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Parse => 'P',
            Category::Interface => 'I',
            Category::Boundary => 'B',
        }
    }
}

/// A diagnostic code such as `P101` or `I201`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Producing phase.
    pub category: Category,
    /// Number within the phase.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(Category::Parse.prefix(), 'P');
        assert_eq!(Category::Interface.prefix(), 'I');
        assert_eq!(Category::Boundary.prefix(), 'B');
    }

    #[test]
    fn display_zero_pads() {
        assert_eq!(DiagnosticCode::new(Category::Parse, 101).to_string(), "P101");
        assert_eq!(DiagnosticCode::new(Category::Boundary, 7).to_string(), "B007");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Interface, 201);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
