//! The preparation pipeline.
//!
//! A run reads one pre-merged design text and produces one output text:
//!
//! 1. extract the structural model ([`umbra_model`]),
//! 2. synthesize stand-ins for dangling references ([`umbra_stub`]),
//! 3. partition and mark the subtree below the boundary ([`umbra_boundary`]),
//! 4. emit the input text with marker insertions and the stand-ins appended.
//!
//! Stand-ins join the model before the dependency graph is built, so they
//! take part in boundary decisions like any declared module.

#![warn(missing_docs)]

pub mod emit;
pub mod error;
pub mod options;
pub mod script;

pub use emit::{emit, STUB_SEPARATOR};
pub use error::FlowError;
pub use options::PrepareOptions;
pub use script::synthesis_script;

use umbra_boundary::{propagate, Partition};
use umbra_common::ContentHash;
use umbra_config::{ResolvedBoundary, DEFAULT_MARKER};
use umbra_diagnostics::{Diagnostic, DiagnosticSink};
use umbra_model::{scan, DesignModel};
use umbra_source::{FileId, TextEdit};
use umbra_stub::{synthesize, RoleTable};

/// The result of a run.
#[derive(Debug)]
pub struct Prepared {
    /// The emitted design text.
    pub text: String,
    /// The final model, including stand-ins and blackbox flags.
    pub model: DesignModel,
    /// The boundary partition, when a boundary was given.
    pub partition: Option<Partition>,
    /// Modules instantiated but not declared in the input, first-seen order.
    pub dangling: Vec<String>,
    /// Names of synthesized stand-ins in creation order.
    pub stubs: Vec<String>,
    /// Warnings and notes from every phase.
    pub diagnostics: Vec<Diagnostic>,
    /// XXH3 fingerprint of `text`.
    pub fingerprint: ContentHash,
}

/// Runs extraction, interface synthesis, boundary marking (when
/// `options.boundary` is set) and emission.
pub fn prepare(
    source: &str,
    file: FileId,
    options: &PrepareOptions,
) -> Result<Prepared, FlowError> {
    run(source, file, Some(&options.roles), options.boundary.as_ref())
}

/// Runs extraction and interface synthesis only.
pub fn synthesize_only(source: &str, file: FileId, roles: &RoleTable) -> Prepared {
    let sink = DiagnosticSink::new();
    let mut model = scan(source, file, &sink);
    let dangling = model.dangling_references();
    let stubs = synthesize(&mut model, roles, &sink).stubs;
    let parts = Parts {
        model,
        partition: None,
        dangling,
        stubs,
    };
    finish(source, &[], parts, DEFAULT_MARKER, sink)
}

/// Runs extraction and boundary marking only. Dangling references stay
/// dangling.
pub fn blackbox_only(
    source: &str,
    file: FileId,
    boundary: &ResolvedBoundary,
) -> Result<Prepared, FlowError> {
    run(source, file, None, Some(boundary))
}

fn run(
    source: &str,
    file: FileId,
    roles: Option<&RoleTable>,
    boundary: Option<&ResolvedBoundary>,
) -> Result<Prepared, FlowError> {
    let sink = DiagnosticSink::new();
    let mut model = scan(source, file, &sink);
    let dangling = model.dangling_references();
    tracing::info!(
        modules = model.len(),
        dangling = dangling.len(),
        "extracted structural model"
    );

    let stubs = match roles {
        Some(roles) => synthesize(&mut model, roles, &sink).stubs,
        None => Vec::new(),
    };

    let (edits, partition, marker) = match boundary {
        Some(b) => {
            let result = propagate(&mut model, &b.module, &b.whitebox, &b.marker)?;
            (result.edits, Some(result.partition), b.marker.as_str())
        }
        None => (Vec::new(), None, DEFAULT_MARKER),
    };

    let parts = Parts {
        model,
        partition,
        dangling,
        stubs,
    };
    Ok(finish(source, &edits, parts, marker, sink))
}

struct Parts {
    model: DesignModel,
    partition: Option<Partition>,
    dangling: Vec<String>,
    stubs: Vec<String>,
}

fn finish(
    source: &str,
    edits: &[TextEdit],
    parts: Parts,
    marker: &str,
    sink: DiagnosticSink,
) -> Prepared {
    let Parts {
        model,
        partition,
        dangling,
        stubs,
    } = parts;
    let text = emit(source, edits, &model, &stubs, marker);
    let fingerprint = ContentHash::of_text(&text);
    tracing::debug!(%fingerprint, bytes = text.len(), "emitted design text");
    Prepared {
        text,
        model,
        partition,
        dangling,
        stubs,
        diagnostics: sink.into_diagnostics(),
        fingerprint,
    }
}
