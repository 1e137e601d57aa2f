//! Port directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a module port.
///
/// `Unknown` only exists while an interface is still being inferred; every
/// port that reaches emission has a concrete direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven from outside the module.
    Input,
    /// Driven by the module.
    Output,
    /// Bidirectional.
    Inout,
    /// Not yet determined.
    Unknown,
}

impl Direction {
    /// Returns the Verilog keyword for this direction, or `None` for `Unknown`.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Direction::Input => Some("input"),
            Direction::Output => Some("output"),
            Direction::Inout => Some("inout"),
            Direction::Unknown => None,
        }
    }

    /// Maps a Verilog direction keyword to a direction.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            _ => None,
        }
    }

    /// Returns `true` unless this is [`Direction::Unknown`].
    pub fn is_known(self) -> bool {
        self != Direction::Unknown
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("unknown"))
    }
}

/// Error returned when a direction string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown port direction '{}' (expected input, output or inout)",
            self.0
        )
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_keyword(s.trim()).ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_roundtrip() {
        for dir in [Direction::Input, Direction::Output, Direction::Inout] {
            let kw = dir.keyword().unwrap();
            assert_eq!(Direction::from_keyword(kw), Some(dir));
        }
        assert_eq!(Direction::Unknown.keyword(), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(" output ".parse::<Direction>(), Ok(Direction::Output));
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Direction::Inout).unwrap();
        assert_eq!(json, "\"inout\"");
        let back: Direction = serde_json::from_str("\"output\"").unwrap();
        assert_eq!(back, Direction::Output);
    }

    #[test]
    fn display_unknown() {
        assert_eq!(Direction::Unknown.to_string(), "unknown");
        assert!(!Direction::Unknown.is_known());
    }
}
