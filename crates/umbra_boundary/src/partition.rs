//! Splitting the subtree below a boundary into blackboxed and preserved sets.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::BoundaryError;
use crate::graph::DependencyGraph;

/// Where a module ended up relative to the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Not reachable from the boundary (including the boundary itself).
    Outside,
    /// Below the boundary and not covered by any whitebox target.
    Blackboxed,
    /// A whitebox target or one of its descendants.
    Preserved,
}

/// The result of boundary propagation.
///
/// `blackboxed` and `preserved` are disjoint and together make up
/// `under_boundary`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// The boundary module.
    pub boundary: String,
    /// Modules reachable from the boundary through one or more edges.
    pub under_boundary: BTreeSet<String>,
    /// Whitebox targets and all their descendants.
    pub preserved: BTreeSet<String>,
    /// `under_boundary` minus `preserved`.
    pub blackboxed: BTreeSet<String>,
}

impl Partition {
    /// Computes the partition for `boundary` with the given whitebox targets.
    ///
    /// Fails if the graph has a cycle, if the boundary is not a module of the
    /// design, or if a whitebox target is not below the boundary.
    pub fn compute<I, S>(
        graph: &DependencyGraph<'_>,
        boundary: &str,
        whitebox: I,
    ) -> Result<Self, BoundaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(cycle) = graph.find_cycle() {
            return Err(BoundaryError::CyclicDependency { cycle });
        }
        if !graph.contains(boundary) {
            return Err(BoundaryError::BoundaryNotFound {
                module: boundary.to_string(),
            });
        }

        let under_boundary = graph.descendants(boundary);
        let mut preserved = BTreeSet::new();
        for target in whitebox {
            let target = target.as_ref();
            if !under_boundary.contains(target) {
                return Err(BoundaryError::UnknownWhiteboxTarget {
                    module: target.to_string(),
                    boundary: boundary.to_string(),
                });
            }
            preserved.extend(graph.closure(target));
        }
        let blackboxed = under_boundary.difference(&preserved).cloned().collect();

        Ok(Self {
            boundary: boundary.to_string(),
            under_boundary,
            preserved,
            blackboxed,
        })
    }

    /// Placement of `module`.
    pub fn placement(&self, module: &str) -> Placement {
        if self.preserved.contains(module) {
            Placement::Preserved
        } else if self.blackboxed.contains(module) {
            Placement::Blackboxed
        } else {
            Placement::Outside
        }
    }
}
