//! Boundary-scoped blackboxing.
//!
//! Everything instantiated (directly or indirectly) below the boundary
//! module is made opaque to the downstream synthesis tool, except the
//! whitebox targets and their own descendants. Preservation wins: a module
//! reachable both through a whitebox target and through an opaque sibling is
//! preserved.
//!
//! [`propagate`] computes the [`Partition`], flags the model and returns the
//! marker insertions for the design text. Configuration problems (missing
//! boundary, stray whitebox target, instantiation cycles) are fatal
//! [`BoundaryError`]s.

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod marker;
pub mod partition;

pub use error::BoundaryError;
pub use graph::DependencyGraph;
pub use marker::{apply_markers, marker_text};
pub use partition::{Partition, Placement};

use umbra_model::DesignModel;
use umbra_source::TextEdit;

/// The outcome of boundary propagation.
#[derive(Debug, Clone)]
pub struct Propagation {
    /// The module partition.
    pub partition: Partition,
    /// Marker insertions for declared modules, in model order.
    pub edits: Vec<TextEdit>,
}

/// Partitions the subtree below `boundary` and marks the blackboxed part.
pub fn propagate<I, S>(
    model: &mut DesignModel,
    boundary: &str,
    whitebox: I,
    marker: &str,
) -> Result<Propagation, BoundaryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let partition = {
        let graph = DependencyGraph::from_model(model);
        Partition::compute(&graph, boundary, whitebox)?
    };
    let edits = apply_markers(model, &partition, marker);
    tracing::info!(
        boundary,
        under = partition.under_boundary.len(),
        blackboxed = partition.blackboxed.len(),
        preserved = partition.preserved.len(),
        "boundary propagation complete"
    );
    Ok(Propagation { partition, edits })
}
