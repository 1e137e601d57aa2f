//! Errors that abort a run.

use thiserror::Error;
use umbra_boundary::BoundaryError;
use umbra_config::ConfigError;

/// A fatal run error.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Boundary propagation failed.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// The configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A role pattern failed to compile.
    #[error("invalid role pattern: {0}")]
    RolePattern(#[from] regex::Error),
}
