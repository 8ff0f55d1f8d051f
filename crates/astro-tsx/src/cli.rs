//! CLI argument parsing.

use astro_transformer::SourceMapMode;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Converts Astro components to TSX for type-checking.
#[derive(Debug, Parser)]
#[command(name = "astro-tsx")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to convert (`-` reads a component from stdin)
    #[arg(default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    /// Working directory; relative paths and the config file resolve against it
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Mirror generated files under this directory instead of writing them
    /// next to their components
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Print transformed TSX to stdout instead of writing files
    #[arg(long = "emit-tsx")]
    pub emit_tsx: bool,

    /// How to deliver source maps
    #[arg(long, value_enum)]
    pub sourcemap: Option<SourceMapArg>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Filename to report for a component read from stdin
    #[arg(long = "stdin-filename")]
    pub stdin_filename: Option<String>,

    /// Path to astro-tsx.json
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Log resolution decisions
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

/// Source map delivery, as written on the command line or in the config
/// file.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapArg {
    /// No source map
    #[default]
    None,
    /// A `.map` file next to each generated file
    External,
    /// A data URL comment at the end of each generated file
    Inline,
    /// Both a `.map` file and a data URL comment
    Both,
}

impl From<SourceMapArg> for SourceMapMode {
    fn from(arg: SourceMapArg) -> Self {
        match arg {
            SourceMapArg::None => SourceMapMode::None,
            SourceMapArg::External => SourceMapMode::External,
            SourceMapArg::Inline => SourceMapMode::Inline,
            SourceMapArg::Both => SourceMapMode::Both,
        }
    }
}

impl Args {
    /// Returns whether the component is read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.paths.iter().any(|p| p.as_str() == "-")
    }
}
