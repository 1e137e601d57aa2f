//! Textual rendering of synthesized modules.

use std::fmt::Write;

use umbra_model::Module;

/// Name of the fixed simulation-query primitive.
pub const PLUSARG_READER: &str = "plusarg_reader";

/// Declaration of [`PLUSARG_READER`]. Simulation reads `out` from a plusarg;
/// formal tools only need it to produce its default.
const PLUSARG_READER_BODY: &str = "\
module plusarg_reader #(
  parameter FORMAT = \"borked=%d\",
  parameter WIDTH = 1,
  parameter [WIDTH-1:0] DEFAULT = 0
) (
  output [WIDTH-1:0] out
);
  assign out = DEFAULT;
endmodule
";

/// Renders a synthesized module, preceded by `(* marker *)` when given.
pub fn render_stub(module: &Module, marker: Option<&str>) -> String {
    let mut out = String::new();
    if module.name == PLUSARG_READER {
        out.push_str("// Fixed stand-in for the simulation plusarg reader.\n");
    } else {
        let _ = writeln!(
            out,
            "// Interface stub for `{}`: ports inferred from its instantiations, no internal behavior.",
            module.name
        );
    }
    if let Some(marker) = marker {
        let _ = writeln!(out, "(* {marker} *)");
    }
    if module.name == PLUSARG_READER {
        out.push_str(PLUSARG_READER_BODY);
        return out;
    }

    if module.ports.is_empty() {
        let _ = writeln!(out, "module {};", spaced(&module.name));
    } else {
        let _ = writeln!(out, "module {} (", spaced(&module.name));
        let last = module.ports.len() - 1;
        for (i, port) in module.ports.iter().enumerate() {
            let dir = port.direction.keyword().unwrap_or("input");
            let range = if port.width > 1 {
                format!(" [{}:0]", port.width - 1)
            } else {
                String::new()
            };
            let sep = if i == last { "" } else { "," };
            let _ = writeln!(out, "  {dir}{range} {}{sep}", spaced(&port.name));
        }
        out.push_str(");\n");
    }
    out.push_str("endmodule\n");
    out
}

/// Escaped identifiers end at whitespace, so they need a trailing space
/// before any punctuation.
fn spaced(name: &str) -> String {
    if name.starts_with('\\') {
        format!("{name} ")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_common::Direction;
    use umbra_model::Port;

    #[test]
    fn renders_ports_with_ranges() {
        let stub = Module::stub(
            "leaf_ext",
            vec![
                Port::new("a", Direction::Input, 8),
                Port::new("R0_data", Direction::Output, 1),
            ],
        );
        let text = render_stub(&stub, None);
        assert!(text.starts_with("// Interface stub for `leaf_ext`"));
        assert!(text.contains("module leaf_ext (\n  input [7:0] a,\n  output R0_data\n);\nendmodule\n"));
    }

    #[test]
    fn renders_marker() {
        let stub = Module::stub("leaf_ext", Vec::new());
        let text = render_stub(&stub, Some("blackbox"));
        assert!(text.contains("(* blackbox *)\nmodule leaf_ext;\nendmodule\n"));
    }

    #[test]
    fn escaped_names_keep_a_space() {
        let stub = Module::stub("\\odd.name", vec![Port::new("\\p[0]", Direction::Input, 1)]);
        let text = render_stub(&stub, None);
        assert!(text.contains("module \\odd.name  ("));
        assert!(text.contains("input \\p[0] \n"));
    }

    #[test]
    fn plusarg_reader_is_fixed() {
        let stub = Module::stub(PLUSARG_READER, vec![Port::new("out", Direction::Output, 1)]);
        let text = render_stub(&stub, None);
        assert!(text.contains("parameter FORMAT = \"borked=%d\""));
        assert!(text.contains("parameter [WIDTH-1:0] DEFAULT = 0"));
        assert!(text.contains("output [WIDTH-1:0] out"));
        assert!(text.contains("assign out = DEFAULT;"));
    }
}
