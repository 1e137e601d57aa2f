//! `umbra script`: prints the synthesis script for a prepared design.

use std::error::Error;

use umbra_config::UmbraConfig;
use umbra_flow::synthesis_script;

use crate::pipeline::load_config;
use crate::{GlobalArgs, ScriptArgs};

/// Runs the `umbra script` command.
pub fn run(args: &ScriptArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_config(global)?;
    print!("{}", render(args, &config)?);
    Ok(0)
}

/// Picks the top module and output file, command line first.
fn render(args: &ScriptArgs, config: &UmbraConfig) -> Result<String, Box<dyn Error>> {
    let top = args
        .top
        .clone()
        .or_else(|| config.synthesis.top.clone())
        .or_else(|| config.boundary.as_ref().map(|b| b.module.clone()))
        .ok_or("no top module: pass `--top` or set `synthesis.top` in umbra.toml")?;
    let output = args
        .output
        .as_deref()
        .unwrap_or(&config.synthesis.output);
    Ok(synthesis_script(&top, &args.input, output))
}
