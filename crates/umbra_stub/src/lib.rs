//! Interface synthesis for dangling module references.
//!
//! A module that is instantiated but never declared cannot be elaborated by
//! the downstream synthesis tool. For each such reference, [`synthesize`]
//! builds a minimal stand-in whose ports are inferred from every
//! instantiation site: widths from the connected actuals, directions from an
//! ordered [`RoleTable`] of name patterns. The stand-ins carry no behavior.
//!
//! The fixed `plusarg_reader` primitive is always provided unless the design
//! already declares it.

#![warn(missing_docs)]

pub mod errors;
pub mod infer;
pub mod render;
pub mod roles;

pub use infer::infer_ports;
pub use render::{render_stub, PLUSARG_READER};
pub use roles::RoleTable;

use umbra_common::Direction;
use umbra_diagnostics::DiagnosticSink;
use umbra_model::{DesignModel, Module, Port};

/// The outcome of interface synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesis {
    /// Names of the modules added to the model, in creation order.
    pub stubs: Vec<String>,
}

impl Synthesis {
    /// Returns `true` if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

/// Adds a stand-in for every dangling reference in `model`, plus the fixed
/// `plusarg_reader` stand-in when it is not declared.
///
/// Running this again on a model that already contains the stand-ins adds
/// nothing.
pub fn synthesize(model: &mut DesignModel, roles: &RoleTable, sink: &DiagnosticSink) -> Synthesis {
    let mut synthesis = Synthesis::default();

    for name in model.dangling_references() {
        if name == PLUSARG_READER {
            continue;
        }
        let ports = infer_ports(model, &name, roles, sink);
        tracing::debug!(module = %name, ports = ports.len(), "synthesized interface stub");
        add(model, Module::stub(name, ports), &mut synthesis);
    }

    if !model.contains(PLUSARG_READER) {
        let ports = vec![Port::new("out", Direction::Output, 1)];
        add(model, Module::stub(PLUSARG_READER, ports), &mut synthesis);
    }

    tracing::info!(stubs = synthesis.stubs.len(), "interface synthesis complete");
    synthesis
}

fn add(model: &mut DesignModel, stub: Module, synthesis: &mut Synthesis) {
    let name = stub.name.clone();
    if model.insert(stub).is_ok() {
        synthesis.stubs.push(name);
    }
}
