//! The default port-role table.
//!
//! These rules encode the memory-macro naming used by generated SoC designs:
//! read ports `R<n>_*`, write ports `W<n>_*` and read/write ports `RW<n>_*`.
//! They are a starting point tuned to that family; other designs should
//! supply their own `[[roles]]` in `umbra.toml`.

use crate::types::RoleRule;
use umbra_common::Direction;

/// Returns the default ordered role rules.
pub fn default_role_rules() -> Vec<RoleRule> {
    vec![
        // Data leaving a memory macro.
        RoleRule::new(r"^R[0-9]+_data$", Direction::Output),
        RoleRule::new(r"^RW[0-9]+_rdata$", Direction::Output),
        // Everything else on a memory port is driven by the surrounding logic.
        RoleRule::new(r"^W[0-9]+_data$", Direction::Input),
        RoleRule::new(r"^RW[0-9]+_wdata$", Direction::Input),
        RoleRule::new(r"^(R|W|RW)[0-9]+_(addr|en|clk)$", Direction::Input),
        RoleRule::new(r"^(W|RW)[0-9]+_w?mask$", Direction::Input),
        RoleRule::new(r"^RW[0-9]+_wmode$", Direction::Input),
    ]
}
