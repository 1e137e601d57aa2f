//! Configuration errors.

/// Errors raised while loading, validating or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required value was not given in the file or on the command line.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value was present but invalid.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A port-role pattern is not a valid regular expression.
    #[error("invalid role pattern '{pattern}': {reason}")]
    InvalidRolePattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("boundary.module".to_string());
        assert_eq!(err.to_string(), "missing required field: boundary.module");
    }

    #[test]
    fn display_invalid_role_pattern() {
        let err = ConfigError::InvalidRolePattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "invalid role pattern '(': unclosed group");
    }

    #[test]
    fn display_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ConfigError::from(io);
        assert!(err.to_string().starts_with("failed to read configuration:"));
    }
}
