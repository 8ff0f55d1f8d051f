//! astro-tsx: converts Astro components to TSX for type-checking.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::Result;
use orchestrator::CliError;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose)?;

    let summary = orchestrator::run(&args)?;

    // Stdout carries TSX when reading stdin or with --emit-tsx.
    let formatted = summary.format(args.output).map_err(CliError::from)?;
    if args.reads_stdin() || args.emit_tsx {
        eprintln!("{formatted}");
    } else {
        println!("{formatted}");
    }

    if summary.should_fail() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ASTRO_TSX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| miette::miette!("failed to initialize tracing subscriber: {error}"))
}
