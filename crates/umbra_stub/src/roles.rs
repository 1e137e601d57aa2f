//! Ordered name-pattern rules mapping port names to directions.

use regex::Regex;
use umbra_common::Direction;
use umbra_config::{default_role_rules, RoleRule};

/// Compiled role rules. The first matching rule decides the direction.
#[derive(Debug, Clone)]
pub struct RoleTable {
    rules: Vec<(Regex, Direction)>,
}

impl RoleTable {
    /// Compiles `rules` in order.
    pub fn new(rules: &[RoleRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Ok((Regex::new(&rule.pattern)?, rule.direction)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// A table with no rules: every inferred port becomes an input.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The default memory-macro table.
    pub fn defaults() -> Self {
        // The default patterns are covered by tests and always compile.
        Self::new(&default_role_rules()).unwrap_or_else(|_| Self::empty())
    }

    /// Direction of the first rule matching `port`, if any.
    pub fn direction_for(&self, port: &str) -> Option<Direction> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(port))
            .map(|&(_, dir)| dir)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
