//! Umbra CLI: prepares a merged Verilog design for formal equivalence.
//!
//! `umbra prepare` runs the whole pipeline, `umbra stub` and
//! `umbra blackbox` run one half of it, `umbra report` prints the structural
//! model as JSON and `umbra script` prints the synthesis script the prepared
//! text is meant for.

#![warn(missing_docs)]

mod pipeline;
mod prepare;
mod report;
mod script;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Umbra: interface synthesis and blackbox propagation for formal flows.
#[derive(Parser, Debug)]
#[command(name = "umbra", version, about = "Umbra formal design preparation")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `umbra.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize missing interfaces and mark the subtree below a boundary.
    Prepare(PrepareArgs),
    /// Synthesize interfaces for undeclared modules only.
    Stub(StubArgs),
    /// Mark the subtree below a boundary only.
    Blackbox(BlackboxArgs),
    /// Print the structural model and partition as JSON.
    Report(ReportArgs),
    /// Print the synthesis script for a prepared design.
    Script(ScriptArgs),
}

/// Boundary selection flags shared by several commands.
#[derive(Args, Debug, Default)]
pub struct BoundaryArgs {
    /// Verification root; overrides `boundary.module`.
    #[arg(short, long)]
    pub boundary: Option<String>,

    /// Module below the boundary to keep transparent. Repeatable; replaces
    /// `boundary.whitebox`.
    #[arg(short, long)]
    pub whitebox: Vec<String>,

    /// Attribute written before blackboxed modules; overrides `boundary.marker`.
    #[arg(long)]
    pub marker: Option<String>,
}

/// Arguments for `umbra prepare`.
#[derive(Parser, Debug)]
pub struct PrepareArgs {
    /// Merged design file.
    pub input: String,

    /// Output path (default: standard output).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Boundary selection.
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `umbra stub`.
#[derive(Parser, Debug)]
pub struct StubArgs {
    /// Merged design file.
    pub input: String,

    /// Output path (default: standard output).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `umbra blackbox`.
#[derive(Parser, Debug)]
pub struct BlackboxArgs {
    /// Merged design file.
    pub input: String,

    /// Output path (default: standard output).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Boundary selection.
    #[command(flatten)]
    pub boundary: BoundaryArgs,
}

/// Arguments for `umbra report`.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Merged design file.
    pub input: String,

    /// Boundary selection.
    #[command(flatten)]
    pub boundary: BoundaryArgs,
}

/// Arguments for `umbra script`.
#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Top module (default: `synthesis.top`, then `boundary.module`).
    #[arg(long)]
    pub top: Option<String>,

    /// Prepared design the script reads.
    #[arg(long, default_value = "prepared.v")]
    pub input: String,

    /// Word-level graph the script writes (default: `synthesis.output`).
    #[arg(long)]
    pub output: Option<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    init_tracing(cli.verbose, color);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Prepare(ref args) => prepare::run_prepare(args, &global),
        Command::Stub(ref args) => prepare::run_stub(args, &global),
        Command::Blackbox(ref args) => prepare::run_blackbox(args, &global),
        Command::Report(ref args) => report::run(args, &global),
        Command::Script(ref args) => script::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, color: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .init();
}
