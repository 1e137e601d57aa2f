//! Loading and validation of `umbra.toml`.
//!
//! The configuration names the boundary module, the whitebox exceptions and
//! the ordered port-role rules the interface synthesizer uses to infer
//! directions. Command-line flags are merged on top via [`resolve_boundary`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod roles;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_boundary, BoundaryOverrides, ResolvedBoundary};
pub use roles::default_role_rules;
pub use types::*;
