//! Structured diagnostics for element-local problems found during a run.
//!
//! A malformed header, an unbalanced instantiation or an interface port whose
//! width cannot be inferred must not abort preparation of a design with
//! thousands of instances. Such problems become [`Diagnostic`]s, collected
//! in a [`DiagnosticSink`] and handed back alongside the partial result.
//! [`TerminalRenderer`] formats them rustc-style.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
