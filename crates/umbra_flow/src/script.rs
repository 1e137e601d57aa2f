//! The script handed to the external synthesis tool.
//!
//! The tool reads the prepared design with formal semantics, turns every
//! blackboxed module into a cutpoint, keeps memories as abstract arrays and
//! exports a word-level graph of a self-miter of the top module.

use std::fmt::Write;

/// Renders the synthesis script for `top`, reading `input` and writing the
/// word-level graph to `output`.
pub fn synthesis_script(top: &str, input: &str, output: &str) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "read_verilog -formal {input}");
    let _ = writeln!(s, "hierarchy -check -top {top}");
    s.push_str(
        "\n\
         proc\n\
         flatten\n\
         memory -nomap\n\
         \n\
         # blackboxed modules become free cutpoints\n\
         cutpoint -blackbox\n\
         opt_clean\n\
         \n",
    );
    let _ = writeln!(s, "copy {top} gold");
    let _ = writeln!(s, "copy {top} gate");
    s.push_str(
        "miter -equiv -make_outputs -make_outcmp gold gate miter_result\n\
         \n\
         hierarchy -top miter_result\n\
         flatten\n\
         dffunmap\n\
         memory_nordff\n\
         opt_clean\n\
         \n",
    );
    let _ = writeln!(s, "write_btor -x {output}");
    s
}
