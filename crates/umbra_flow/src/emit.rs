//! Output text assembly.

use umbra_model::DesignModel;
use umbra_source::{apply_edits, TextEdit};
use umbra_stub::render_stub;

/// Comment line separating the input text from appended stand-ins.
pub const STUB_SEPARATOR: &str = "// ---- interface stubs (generated) ----";

/// Applies marker insertions to `source` and appends the rendered `stubs`.
///
/// Stubs flagged as blackboxed are rendered with `marker`.
pub fn emit(
    source: &str,
    edits: &[TextEdit],
    model: &DesignModel,
    stubs: &[String],
    marker: &str,
) -> String {
    let mut out = apply_edits(source, edits);
    let rendered: Vec<String> = stubs
        .iter()
        .filter_map(|name| model.get(name))
        .map(|stub| render_stub(stub, stub.is_blackboxed.then_some(marker)))
        .collect();
    if rendered.is_empty() {
        return out;
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(STUB_SEPARATOR);
    out.push('\n');
    for stub in rendered {
        out.push('\n');
        out.push_str(&stub);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_common::Direction;
    use umbra_model::{Module, Port};

    fn model_with_stub(blackboxed: bool) -> DesignModel {
        let mut model = DesignModel::new();
        let mut stub = Module::stub("leaf_ext", vec![Port::new("a", Direction::Input, 8)]);
        stub.is_blackboxed = blackboxed;
        model.insert(stub).unwrap();
        model
    }

    #[test]
    fn no_stubs_no_separator() {
        let model = DesignModel::new();
        let text = emit("module m; endmodule", &[], &model, &[], "blackbox");
        assert_eq!(text, "module m; endmodule");
    }

    #[test]
    fn stubs_are_appended_after_separator() {
        let model = model_with_stub(false);
        let text = emit(
            "module m; endmodule",
            &[],
            &model,
            &["leaf_ext".to_string()],
            "blackbox",
        );
        assert!(text.starts_with("module m; endmodule\n\n// ---- interface stubs"));
        assert!(text.contains("module leaf_ext (\n  input [7:0] a\n);"));
        assert!(!text.contains("(* blackbox *)"));
    }

    #[test]
    fn blackboxed_stubs_carry_marker() {
        let model = model_with_stub(true);
        let text = emit("", &[], &model, &["leaf_ext".to_string()], "blackbox");
        assert!(text.contains("(* blackbox *)\nmodule leaf_ext ("));
    }
}
