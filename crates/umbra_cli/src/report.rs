//! `umbra report`: the structural model as JSON.

use std::error::Error;

use serde::Serialize;
use umbra_boundary::Partition;
use umbra_diagnostics::Diagnostic;
use umbra_flow::{prepare, FlowError, PrepareOptions, Prepared};
use umbra_model::{Module, Port};
use umbra_source::SourceDb;

use crate::pipeline::{load_config, overrides, read_input, render_diagnostics};
use crate::{GlobalArgs, ReportArgs, ReportFormat};

#[derive(Serialize)]
struct Report<'a> {
    modules: Vec<ModuleSummary<'a>>,
    dangling: &'a [String],
    stubs: &'a [String],
    partition: Option<&'a Partition>,
    fingerprint: String,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct ModuleSummary<'a> {
    name: &'a str,
    ports: &'a [Port],
    instances: Vec<InstanceSummary<'a>>,
    synthesized: bool,
    blackboxed: bool,
    marked_in_input: bool,
}

#[derive(Serialize)]
struct InstanceSummary<'a> {
    name: &'a str,
    module: &'a str,
}

impl<'a> ModuleSummary<'a> {
    fn new(module: &'a Module) -> Self {
        Self {
            name: &module.name,
            ports: &module.ports,
            instances: module
                .instantiations
                .iter()
                .map(|inst| InstanceSummary {
                    name: &inst.instance_name,
                    module: &inst.target_module,
                })
                .collect(),
            synthesized: module.is_synthesized_stub,
            blackboxed: module.is_blackboxed,
            marked_in_input: module.marked_in_input,
        }
    }
}

fn build_report(prepared: &Prepared) -> Report<'_> {
    Report {
        modules: prepared.model.iter().map(ModuleSummary::new).collect(),
        dangling: &prepared.dangling,
        stubs: &prepared.stubs,
        partition: prepared.partition.as_ref(),
        fingerprint: prepared.fingerprint.to_string(),
        diagnostics: &prepared.diagnostics,
    }
}

/// Runs the `umbra report` command.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_config(global)?;
    let options = PrepareOptions::from_config(&config, &overrides(&args.boundary), false)?;

    let mut source_db = SourceDb::new();
    let file = read_input(&args.input, &mut source_db, global)?;
    let source = &source_db.get_file(file).content;

    let prepared = match prepare(source, file, &options) {
        Ok(prepared) => prepared,
        Err(FlowError::Boundary(err)) => {
            render_diagnostics(&[err.to_diagnostic()], &source_db, ReportFormat::Json, global);
            return Ok(1);
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", serde_json::to_string_pretty(&build_report(&prepared))?);
    Ok(0)
}
