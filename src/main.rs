//! Thin CLI surface: one subcommand that runs the full pipeline over a
//! directory and prints a summary. No incremental re-indexing, no
//! persistence, no server — those stay out of scope.

use callweave::{AnalyzerConfig, Severity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "callweave", about = "Multi-language static call-graph and class-hierarchy analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze every supported source file under `path` and print a summary.
    Analyze {
        path: PathBuf,
        /// Print every collected diagnostic instead of just the count.
        #[arg(long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AnalyzerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    callweave::logging::init_with_config(&config.logging);

    match cli.command {
        Command::Analyze { path, verbose } => run_analyze(path, &config, verbose),
    }
}

fn run_analyze(path: PathBuf, config: &AnalyzerConfig, verbose: bool) -> ExitCode {
    let report = match callweave::analyze_project(&[path], config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("analysis failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let errors = report.diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warnings = report.diagnostics.len() - errors;

    println!("files analyzed:     {}", report.files.len());
    println!("classes found:      {}", report.hierarchy.len());
    println!("function calls:     {}", report.function_calls.len());
    println!("method calls:       {}", report.method_calls.len());
    println!("constructor calls:  {}", report.constructor_calls.len());
    println!("diagnostics:        {warnings} warning(s), {errors} error(s)");

    if verbose {
        for diagnostic in &report.diagnostics {
            println!("  {:?} {}: {}", diagnostic.severity, diagnostic.file.display(), diagnostic.message);
        }
    }

    if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
