//! Conformance test helpers for umbra.
//!
//! Runs design text through the pipeline the way the `umbra` binary does
//! (configuration text in, prepared text out) and exposes the pieces
//! integration tests assert on.

#![warn(missing_docs)]

use umbra_config::{BoundaryOverrides, UmbraConfig};
use umbra_diagnostics::{Diagnostic, Severity};
use umbra_flow::{FlowError, PrepareOptions, Prepared};
use umbra_model::{DesignModel, Extraction, Port};
use umbra_source::FileId;
use umbra_stub::RoleTable;

const FILE: FileId = FileId::from_raw(0);

/// Result of a successful run.
pub struct PipelineResult {
    /// Everything the run produced.
    pub prepared: Prepared,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
    /// Number of note-severity diagnostics.
    pub note_count: usize,
}

impl PipelineResult {
    /// The emitted design text.
    pub fn text(&self) -> &str {
        &self.prepared.text
    }

    /// The final model.
    pub fn model(&self) -> &DesignModel {
        &self.prepared.model
    }

    /// Diagnostic codes in emission order, e.g. `["P102", "I201"]`.
    pub fn codes(&self) -> Vec<String> {
        codes(&self.prepared.diagnostics)
    }

    /// Names of the blackboxed modules, sorted.
    pub fn blackboxed(&self) -> Vec<&str> {
        self.prepared
            .partition
            .iter()
            .flat_map(|p| p.blackboxed.iter().map(String::as_str))
            .collect()
    }

    /// Names of the preserved modules, sorted.
    pub fn preserved(&self) -> Vec<&str> {
        self.prepared
            .partition
            .iter()
            .flat_map(|p| p.preserved.iter().map(String::as_str))
            .collect()
    }

    /// `(name, direction keyword, width)` for each port of `module`.
    pub fn ports(&self, module: &str) -> Vec<(String, &'static str, u32)> {
        self.prepared
            .model
            .get(module)
            .map(|m| m.ports.iter().map(port_triple).collect())
            .unwrap_or_default()
    }
}

fn port_triple(port: &Port) -> (String, &'static str, u32) {
    (
        port.name.clone(),
        port.direction.keyword().unwrap_or("?"),
        port.width,
    )
}

/// Builds a configuration with the given boundary and whitebox targets.
pub fn make_config(boundary: &str, whitebox: &[&str]) -> UmbraConfig {
    let list: Vec<String> = whitebox.iter().map(|w| format!("\"{w}\"")).collect();
    let toml_str = format!(
        r#"
[boundary]
module = "{boundary}"
whitebox = [{list}]
"#,
        list = list.join(", "),
    );
    umbra_config::load_config_from_str(&toml_str).unwrap()
}

/// Runs the full pipeline with the given boundary.
pub fn prepare_design(
    source: &str,
    boundary: &str,
    whitebox: &[&str],
) -> Result<PipelineResult, FlowError> {
    let config = make_config(boundary, whitebox);
    prepare_with_config(source, &config)
}

/// Runs the full pipeline with an explicit configuration.
pub fn prepare_with_config(
    source: &str,
    config: &UmbraConfig,
) -> Result<PipelineResult, FlowError> {
    let options = PrepareOptions::from_config(config, &BoundaryOverrides::default(), false)?;
    umbra_flow::prepare(source, FILE, &options).map(finish)
}

/// Runs interface synthesis only, with the default role table.
pub fn stub_design(source: &str) -> PipelineResult {
    finish(umbra_flow::synthesize_only(
        source,
        FILE,
        &RoleTable::defaults(),
    ))
}

/// Extracts the structural model only.
pub fn extract_design(source: &str) -> Extraction {
    umbra_model::extract(source, FILE)
}

/// Diagnostic codes in emission order.
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.code.to_string()).collect()
}

/// The text of the declaration of `module`, from the `module` keyword
/// through `endmodule`.
pub fn module_text<'a>(text: &'a str, module: &str) -> Option<&'a str> {
    let header = format!("module {module}");
    let start = text.match_indices(&header).find_map(|(at, _)| {
        let next = text[at + header.len()..].chars().next();
        let boundary = next.map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'));
        boundary.then_some(at)
    })?;
    let end = text[start..].find("endmodule")? + start + "endmodule".len();
    Some(&text[start..end])
}

/// Returns `true` if the declaration of `module` is directly preceded by
/// the `(* blackbox *)` marker.
pub fn is_marked(text: &str, module: &str) -> bool {
    text.contains(&format!("(* blackbox *)\nmodule {module}"))
}

fn finish(prepared: Prepared) -> PipelineResult {
    let count = |severity| {
        prepared
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    };
    let warning_count = count(Severity::Warning);
    let note_count = count(Severity::Note);
    PipelineResult {
        prepared,
        warning_count,
        note_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_text_respects_name_boundaries() {
        let text = "module Ab; endmodule\nmodule A; endmodule\n";
        assert_eq!(module_text(text, "A"), Some("module A; endmodule"));
        assert_eq!(module_text(text, "Ab"), Some("module Ab; endmodule"));
        assert_eq!(module_text(text, "B"), None);
    }

    #[test]
    fn make_config_sets_boundary() {
        let config = make_config("Top", &["B", "C"]);
        let boundary = config.boundary.unwrap();
        assert_eq!(boundary.module, "Top");
        assert_eq!(boundary.whitebox, vec!["B", "C"]);
    }
}
