//! Merging command-line overrides with the `[boundary]` table.

use crate::error::ConfigError;
use crate::loader::validate_marker;
use crate::types::{UmbraConfig, DEFAULT_MARKER};
use std::collections::BTreeSet;

/// Boundary settings given on the command line.
#[derive(Debug, Default, Clone)]
pub struct BoundaryOverrides {
    /// Replaces `boundary.module`.
    pub module: Option<String>,
    /// When non-empty, replaces `boundary.whitebox`.
    pub whitebox: Vec<String>,
    /// Replaces `boundary.marker`.
    pub marker: Option<String>,
}

/// The boundary selection a run actually uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBoundary {
    /// Verification root.
    pub module: String,
    /// Whitebox targets.
    pub whitebox: BTreeSet<String>,
    /// Marker attribute name.
    pub marker: String,
}

/// Resolves the boundary selection, letting command-line values win.
///
/// Fails with [`ConfigError::MissingField`] when neither the file nor the
/// command line names a boundary module.
pub fn resolve_boundary(
    config: &UmbraConfig,
    overrides: &BoundaryOverrides,
) -> Result<ResolvedBoundary, ConfigError> {
    let file = config.boundary.as_ref();

    let module = overrides
        .module
        .clone()
        .or_else(|| file.map(|b| b.module.clone()))
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("boundary.module".to_string()))?;

    let whitebox: BTreeSet<String> = if overrides.whitebox.is_empty() {
        file.map(|b| b.whitebox.iter().cloned().collect())
            .unwrap_or_default()
    } else {
        overrides.whitebox.iter().cloned().collect()
    };
    if whitebox.iter().any(|w| w.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "whitebox module names must not be empty".to_string(),
        ));
    }

    let marker = overrides
        .marker
        .clone()
        .or_else(|| file.map(|b| b.marker.clone()))
        .unwrap_or_else(|| DEFAULT_MARKER.to_string());
    validate_marker(&marker)?;

    Ok(ResolvedBoundary {
        module,
        whitebox,
        marker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn file_values_used_without_overrides() {
        let config =
            load_config_from_str("[boundary]\nmodule = \"Top\"\nwhitebox = [\"B\"]\n").unwrap();
        let resolved = resolve_boundary(&config, &BoundaryOverrides::default()).unwrap();
        assert_eq!(resolved.module, "Top");
        assert_eq!(resolved.whitebox.into_iter().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(resolved.marker, "blackbox");
    }

    #[test]
    fn overrides_win() {
        let config =
            load_config_from_str("[boundary]\nmodule = \"Top\"\nwhitebox = [\"B\"]\n").unwrap();
        let overrides = BoundaryOverrides {
            module: Some("Tile".to_string()),
            whitebox: vec!["C".to_string(), "D".to_string()],
            marker: None,
        };
        let resolved = resolve_boundary(&config, &overrides).unwrap();
        assert_eq!(resolved.module, "Tile");
        assert!(resolved.whitebox.contains("C"));
        assert!(!resolved.whitebox.contains("B"));
    }

    #[test]
    fn missing_boundary_errors() {
        let config = UmbraConfig::default();
        let err = resolve_boundary(&config, &BoundaryOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn command_line_only() {
        let overrides = BoundaryOverrides {
            module: Some("Top".to_string()),
            ..Default::default()
        };
        let resolved = resolve_boundary(&UmbraConfig::default(), &overrides).unwrap();
        assert_eq!(resolved.module, "Top");
        assert!(resolved.whitebox.is_empty());
    }

    #[test]
    fn invalid_marker_override_errors() {
        let overrides = BoundaryOverrides {
            module: Some("Top".to_string()),
            marker: Some("no spaces".to_string()),
            ..Default::default()
        };
        assert!(resolve_boundary(&UmbraConfig::default(), &overrides).is_err());
    }
}
