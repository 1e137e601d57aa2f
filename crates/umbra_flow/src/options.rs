//! Run options assembled from configuration and command-line overrides.

use umbra_config::{resolve_boundary, BoundaryOverrides, ResolvedBoundary, UmbraConfig};
use umbra_stub::RoleTable;

use crate::error::FlowError;

/// Everything a run needs besides the design text.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Boundary selection; `None` skips boundary marking.
    pub boundary: Option<ResolvedBoundary>,
    /// Port-role rules for interface synthesis.
    pub roles: RoleTable,
}

impl PrepareOptions {
    /// Interface synthesis only, with the default role table.
    pub fn stubs_only() -> Self {
        Self {
            boundary: None,
            roles: RoleTable::defaults(),
        }
    }

    /// Builds options from a loaded configuration.
    ///
    /// The boundary is resolved only when `require_boundary` is set or the
    /// configuration or overrides name one.
    pub fn from_config(
        config: &UmbraConfig,
        overrides: &BoundaryOverrides,
        require_boundary: bool,
    ) -> Result<Self, FlowError> {
        let roles = RoleTable::new(&config.role_rules())?;
        let wants_boundary =
            require_boundary || overrides.module.is_some() || config.boundary.is_some();
        let boundary = if wants_boundary {
            Some(resolve_boundary(config, overrides)?)
        } else {
            None
        };
        Ok(Self { boundary, roles })
    }
}
