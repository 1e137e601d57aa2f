//! Shared plumbing for the CLI commands: configuration lookup, input
//! loading, diagnostic rendering and output writing.

use std::error::Error;
use std::path::Path;

use umbra_config::{BoundaryOverrides, UmbraConfig, CONFIG_FILE_NAME};
use umbra_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};
use umbra_source::{FileId, SourceDb};

use crate::{BoundaryArgs, GlobalArgs, ReportFormat};

/// Loads `--config`, else `./umbra.toml` when present, else the defaults.
pub fn load_config(global: &GlobalArgs) -> Result<UmbraConfig, Box<dyn Error>> {
    if let Some(path) = &global.config {
        return Ok(umbra_config::load_config(Path::new(path))?);
    }
    load_config_in(Path::new("."))
}

/// Loads `umbra.toml` from `dir` if it exists.
pub fn load_config_in(dir: &Path) -> Result<UmbraConfig, Box<dyn Error>> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "loading configuration");
        Ok(umbra_config::load_config(&candidate)?)
    } else {
        Ok(UmbraConfig::default())
    }
}

/// Converts the boundary flags into config overrides.
pub fn overrides(args: &BoundaryArgs) -> BoundaryOverrides {
    BoundaryOverrides {
        module: args.boundary.clone(),
        whitebox: args.whitebox.clone(),
        marker: args.marker.clone(),
    }
}

/// Reads the design file into `source_db`.
pub fn read_input(
    path: &str,
    source_db: &mut SourceDb,
    global: &GlobalArgs,
) -> Result<FileId, Box<dyn Error>> {
    let file = source_db
        .load_file(Path::new(path))
        .map_err(|e| format!("cannot read `{path}`: {e}"))?;
    if !global.quiet {
        eprintln!("     Reading {path}");
    }
    Ok(file)
}

/// Writes `text` to `output`, or to standard output when `None`.
pub fn write_output(
    text: &str,
    output: Option<&str>,
    global: &GlobalArgs,
) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| format!("cannot write `{path}`: {e}"))?;
            if !global.quiet {
                eprintln!("     Writing {path}");
            }
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Renders diagnostics in the requested format.
///
/// JSON goes to standard output, so it is only used when the design text
/// goes to a file.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    source_db: &SourceDb,
    format: ReportFormat,
    global: &GlobalArgs,
) {
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprintln!("{}", renderer.render(diag, source_db));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Prints the `Result:` summary line.
pub fn print_summary(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let count = |severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    eprintln!(
        "      Result: {} error(s), {} warning(s), {} note(s)",
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Note)
    );
}
