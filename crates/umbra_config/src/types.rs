//! Configuration types deserialized from `umbra.toml`.

use serde::{Deserialize, Serialize};
use umbra_common::Direction;

/// Attribute name written in front of blackboxed module declarations.
pub const DEFAULT_MARKER: &str = "blackbox";

/// Default file name for the word-level graph written by the synthesis script.
pub const DEFAULT_SYNTHESIS_OUTPUT: &str = "design.btor2";

/// The whole `umbra.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct UmbraConfig {
    /// Boundary and whitebox selection. Optional so that stub-only runs need no config.
    #[serde(default)]
    pub boundary: Option<BoundaryConfig>,
    /// Ordered port-role rules. `None` selects [`default_role_rules`](crate::default_role_rules).
    #[serde(default)]
    pub roles: Option<Vec<RoleRule>>,
    /// Settings for the rendered synthesis script.
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

impl UmbraConfig {
    /// Returns the configured role rules, or the default table.
    pub fn role_rules(&self) -> Vec<RoleRule> {
        self.roles
            .clone()
            .unwrap_or_else(crate::roles::default_role_rules)
    }
}

/// The `[boundary]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryConfig {
    /// Root of the subtree subject to blackboxing.
    pub module: String,
    /// Modules kept visible together with all their descendants.
    #[serde(default)]
    pub whitebox: Vec<String>,
    /// Attribute name used as the boundary marker.
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// One `[[roles]]` entry: ports whose name matches `pattern` get `direction`.
///
/// Rules are tried in order; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Regular expression matched against the formal port name.
    pub pattern: String,
    /// Direction implied by the role.
    pub direction: Direction,
}

impl RoleRule {
    /// Creates a rule.
    pub fn new(pattern: impl Into<String>, direction: Direction) -> Self {
        Self {
            pattern: pattern.into(),
            direction,
        }
    }
}

/// The `[synthesis]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// Top module handed to the synthesis tool; defaults to the boundary module.
    #[serde(default)]
    pub top: Option<String>,
    /// Word-level graph file the script writes.
    #[serde(default = "default_synthesis_output")]
    pub output: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            top: None,
            output: default_synthesis_output(),
        }
    }
}

fn default_synthesis_output() -> String {
    DEFAULT_SYNTHESIS_OUTPUT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: UmbraConfig = toml::from_str("").unwrap();
        assert!(config.boundary.is_none());
        assert!(config.roles.is_none());
        assert_eq!(config.synthesis.output, DEFAULT_SYNTHESIS_OUTPUT);
        assert!(!config.role_rules().is_empty());
    }

    #[test]
    fn marker_defaults_to_blackbox() {
        let config: UmbraConfig = toml::from_str("[boundary]\nmodule = \"Top\"\n").unwrap();
        let boundary = config.boundary.unwrap();
        assert_eq!(boundary.marker, "blackbox");
        assert!(boundary.whitebox.is_empty());
    }

    #[test]
    fn explicit_roles_replace_defaults() {
        let config: UmbraConfig = toml::from_str(
            r#"
[[roles]]
pattern = "_q$"
direction = "output"
"#,
        )
        .unwrap();
        assert_eq!(
            config.role_rules(),
            vec![RoleRule::new("_q$", Direction::Output)]
        );
    }
}
