//! Reading and validating `umbra.toml`.

use crate::error::ConfigError;
use crate::types::UmbraConfig;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use umbra_common::Direction;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "umbra.toml";

/// Loads and validates a configuration file.
///
/// `path` may name the file itself or a directory containing `umbra.toml`.
pub fn load_config(path: &Path) -> Result<UmbraConfig, ConfigError> {
    let file = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = std::fs::read_to_string(&file)?;
    load_config_from_str(&content)
}

/// Parses and validates configuration text.
pub fn load_config_from_str(content: &str) -> Result<UmbraConfig, ConfigError> {
    let config: UmbraConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &UmbraConfig) -> Result<(), ConfigError> {
    if let Some(boundary) = &config.boundary {
        if boundary.module.trim().is_empty() {
            return Err(ConfigError::MissingField("boundary.module".to_string()));
        }
        let mut seen = BTreeSet::new();
        for name in &boundary.whitebox {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "boundary.whitebox contains an empty module name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "boundary.whitebox lists `{name}` more than once"
                )));
            }
        }
        validate_marker(&boundary.marker)?;
    }

    if let Some(rules) = &config.roles {
        for rule in rules {
            Regex::new(&rule.pattern).map_err(|e| ConfigError::InvalidRolePattern {
                pattern: rule.pattern.clone(),
                reason: e.to_string(),
            })?;
            if rule.direction == Direction::Unknown {
                return Err(ConfigError::ValidationError(format!(
                    "role pattern '{}' must map to input, output or inout",
                    rule.pattern
                )));
            }
        }
    }

    if config.synthesis.output.trim().is_empty() {
        return Err(ConfigError::MissingField("synthesis.output".to_string()));
    }
    Ok(())
}

/// Markers are written verbatim inside `(* ... *)`, so they must be plain identifiers.
pub(crate) fn validate_marker(marker: &str) -> Result<(), ConfigError> {
    let mut chars = marker.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "marker `{marker}` is not a plain attribute name"
        )))
    }
}
