//! `umbra prepare`, `umbra stub` and `umbra blackbox`.
//!
//! All three read one merged design, run part or all of the pipeline and
//! write the resulting text. Boundary errors are rendered as diagnostics and
//! turn into exit code 1; configuration and I/O errors propagate to `main`.

use std::error::Error;

use umbra_config::{resolve_boundary, BoundaryOverrides};
use umbra_flow::{blackbox_only, prepare, synthesize_only, FlowError, PrepareOptions, Prepared};
use umbra_source::SourceDb;

use crate::pipeline::{
    load_config, overrides, print_summary, read_input, render_diagnostics, write_output,
};
use crate::{BlackboxArgs, GlobalArgs, PrepareArgs, ReportFormat, StubArgs};

/// Runs the `umbra prepare` command.
pub fn run_prepare(args: &PrepareArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    if args.format == ReportFormat::Json && args.output.is_none() {
        return Err("`--format json` writes to standard output; pass `--output` for the design".into());
    }
    let config = load_config(global)?;
    let options = PrepareOptions::from_config(&config, &overrides(&args.boundary), false)?;

    let mut source_db = SourceDb::new();
    let file = read_input(&args.input, &mut source_db, global)?;
    let source = &source_db.get_file(file).content;

    let result = prepare(source, file, &options);
    finish(result, &source_db, args.output.as_deref(), args.format, global)
}

/// Runs the `umbra stub` command.
pub fn run_stub(args: &StubArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_config(global)?;
    let options = PrepareOptions::from_config(&config, &BoundaryOverrides::default(), false)?;

    let mut source_db = SourceDb::new();
    let file = read_input(&args.input, &mut source_db, global)?;
    let source = &source_db.get_file(file).content;

    let prepared = synthesize_only(source, file, &options.roles);
    finish(
        Ok(prepared),
        &source_db,
        args.output.as_deref(),
        ReportFormat::Text,
        global,
    )
}

/// Runs the `umbra blackbox` command.
pub fn run_blackbox(args: &BlackboxArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_config(global)?;
    let boundary = resolve_boundary(&config, &overrides(&args.boundary))?;

    let mut source_db = SourceDb::new();
    let file = read_input(&args.input, &mut source_db, global)?;
    let source = &source_db.get_file(file).content;

    let result = blackbox_only(source, file, &boundary);
    finish(
        result,
        &source_db,
        args.output.as_deref(),
        ReportFormat::Text,
        global,
    )
}

fn finish(
    result: Result<Prepared, FlowError>,
    source_db: &SourceDb,
    output: Option<&str>,
    format: ReportFormat,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn Error>> {
    let prepared = match result {
        Ok(prepared) => prepared,
        Err(FlowError::Boundary(err)) => {
            let diagnostics = [err.to_diagnostic()];
            render_diagnostics(&diagnostics, source_db, format, global);
            return Ok(1);
        }
        Err(err) => return Err(err.into()),
    };

    render_diagnostics(&prepared.diagnostics, source_db, format, global);
    if !global.quiet {
        print_status(&prepared);
    }
    write_output(&prepared.text, output, global)?;
    if format == ReportFormat::Text {
        print_summary(&prepared.diagnostics, global);
    }
    Ok(0)
}

fn print_status(prepared: &Prepared) {
    let declared = prepared.model.len() - prepared.stubs.len();
    eprintln!("   Extracted {declared} module(s)");
    if !prepared.stubs.is_empty() {
        eprintln!(" Synthesized {} interface stub(s)", prepared.stubs.len());
    }
    if let Some(partition) = &prepared.partition {
        eprintln!(
            "  Blackboxed {} module(s) below `{}`, preserved {}",
            partition.blackboxed.len(),
            partition.boundary,
            partition.preserved.len()
        );
    }
    eprintln!(" Fingerprint {}", prepared.fingerprint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundaryArgs;

    const DESIGN: &str = "module Top(input clk);\n\
                          \x20 A a (.clk(clk));\n\
                          endmodule\n\
                          module A(input clk);\n\
                          \x20 Leaf_ext l (.a(clk));\n\
                          endmodule\n";

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    fn write_design(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("design.v");
        std::fs::write(&path, DESIGN).unwrap();
        path.display().to_string()
    }

    #[test]
    fn prepare_writes_marked_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prepared.v").display().to_string();
        let args = PrepareArgs {
            input: write_design(&dir),
            output: Some(output.clone()),
            boundary: BoundaryArgs {
                boundary: Some("Top".to_string()),
                ..BoundaryArgs::default()
            },
            format: ReportFormat::Text,
        };
        assert_eq!(run_prepare(&args, &quiet()).unwrap(), 0);
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("(* blackbox *)\nmodule A(input clk);"));
        assert!(text.contains("(* blackbox *)\nmodule Leaf_ext ("));
        assert!(text.contains("module plusarg_reader"));
    }

    #[test]
    fn unknown_boundary_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prepared.v");
        let args = PrepareArgs {
            input: write_design(&dir),
            output: Some(output.display().to_string()),
            boundary: BoundaryArgs {
                boundary: Some("Nope".to_string()),
                ..BoundaryArgs::default()
            },
            format: ReportFormat::Text,
        };
        assert_eq!(run_prepare(&args, &quiet()).unwrap(), 1);
        assert!(!output.exists());
    }

    #[test]
    fn json_diagnostics_need_an_output_file() {
        let args = PrepareArgs {
            input: "design.v".to_string(),
            output: None,
            boundary: BoundaryArgs::default(),
            format: ReportFormat::Json,
        };
        assert!(run_prepare(&args, &quiet()).is_err());
    }

    #[test]
    fn stub_leaves_modules_unmarked() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("stubbed.v").display().to_string();
        let args = StubArgs {
            input: write_design(&dir),
            output: Some(output.clone()),
        };
        assert_eq!(run_stub(&args, &quiet()).unwrap(), 0);
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with(DESIGN));
        assert!(text.contains("module Leaf_ext (\n  input a\n);"));
        assert!(!text.contains("(* blackbox *)"));
    }

    #[test]
    fn blackbox_requires_a_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let args = BlackboxArgs {
            input: write_design(&dir),
            output: None,
            boundary: BoundaryArgs::default(),
        };
        let err = run_blackbox(&args, &quiet()).unwrap_err();
        assert!(err.to_string().contains("boundary.module"));
    }
}
