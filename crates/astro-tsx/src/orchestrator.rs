//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::AstroTsxConfig;
use crate::output::{FileReport, JsonWarning, ParseWarning, RunSummary};
use astro_parser::ParseError;
use astro_transformer::{
    convert_to_tsx, ConvertError, ConvertOptions, ConvertResult, SourceMapMode, STDIN_FILENAME,
};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::Diagnostic;
use rayon::prelude::*;
use std::fs;
use std::io;
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never searched for components.
const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/dist/**", "**/.astro/**"];

/// Errors that stop a run.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// Failed to determine the working directory.
    #[error("failed to resolve the workspace directory")]
    #[diagnostic(code(astro_tsx::workspace))]
    Workspace(#[source] io::Error),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    #[diagnostic(code(astro_tsx::path))]
    NonUtf8Path(String),

    /// A path given on the command line does not exist.
    #[error("no such file or directory: {0}")]
    #[diagnostic(code(astro_tsx::path))]
    MissingPath(Utf8PathBuf),

    /// Failed to read standard input.
    #[error("failed to read standard input")]
    #[diagnostic(code(astro_tsx::stdin))]
    Stdin(#[source] io::Error),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(
        code(astro_tsx::glob),
        help("patterns are matched against paths relative to the workspace, e.g. `src/legacy/**`")
    )]
    InvalidGlob(String),

    /// Failed to convert a component.
    #[error("failed to convert {path}")]
    #[diagnostic(code(astro_tsx::convert))]
    Convert {
        path: String,
        #[source]
        source: ConvertError,
    },

    /// Failed to serialize the JSON summary.
    #[error("failed to serialize output")]
    #[diagnostic(code(astro_tsx::json))]
    Json(#[from] serde_json::Error),
}

/// Settings shared by every file of a run, after merging CLI flags with the
/// config file.
#[derive(Debug)]
struct RunSettings {
    workspace: Utf8PathBuf,
    sourcemap: SourceMapMode,
    out_dir: Option<Utf8PathBuf>,
    emit_tsx: bool,
}

/// Runs the conversion on all requested components.
pub fn run(args: &Args) -> Result<RunSummary, CliError> {
    let workspace = resolve_workspace(&args.workspace)?;
    let config = AstroTsxConfig::load(&workspace, args.config.as_deref());

    let settings = RunSettings {
        sourcemap: args.sourcemap.or(config.sourcemap).unwrap_or_default().into(),
        out_dir: args
            .out_dir
            .clone()
            .or_else(|| config.out_dir.clone())
            .map(|dir| workspace.join(dir)),
        emit_tsx: args.emit_tsx,
        workspace,
    };

    if args.reads_stdin() {
        return run_stdin(args, &settings);
    }

    let ignore_set = build_ignore_set(&args.ignore, &config.exclude)?;
    let files = collect_files(&settings.workspace, &args.paths, &config, &ignore_set)?;
    tracing::debug!("found {} components", files.len());

    // Convert in parallel; printing happens afterwards so output stays in
    // discovery order.
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| convert_file(file, &settings))
        .collect();

    let mut reports = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if let Some(tsx) = &outcome.tsx {
            println!("=== TSX for {} ===\n{}", outcome.report.path, tsx);
        }
        if args.output == OutputFormat::Human {
            for warning in &outcome.rendered_warnings {
                eprintln!("{warning}");
            }
        }
        if let Some(error) = &outcome.report.error {
            tracing::error!("{}: {}", outcome.report.path, error);
        }
        reports.push(outcome.report);
    }

    Ok(RunSummary::new(reports, args.fail_on_warnings))
}

/// Converts one component read from standard input and prints the TSX.
fn run_stdin(args: &Args, settings: &RunSettings) -> Result<RunSummary, CliError> {
    let source = io::read_to_string(io::stdin()).map_err(CliError::Stdin)?;
    let filename = args
        .stdin_filename
        .clone()
        .unwrap_or_else(|| STDIN_FILENAME.to_string());

    let result = convert_to_tsx(
        &source,
        ConvertOptions {
            filename: Some(filename.clone()),
            sourcemap: settings.sourcemap,
        },
    )
    .map_err(|source| CliError::Convert {
        path: filename.clone(),
        source,
    })?;

    println!("{}", result.code);
    if result.map.is_some() {
        tracing::warn!("external source maps are not written for standard input");
    }

    let path = Utf8Path::new(&filename);
    for error in &result.errors {
        if args.output == OutputFormat::Human {
            eprintln!("{}", ParseWarning::new(error, path, &source).render());
        }
    }

    let report = FileReport {
        path: filename.clone(),
        output: None,
        props: Some(result.props.source.kind_name()),
        warnings: json_warnings(&result.errors, &source),
        error: None,
    };
    Ok(RunSummary::new(vec![report], args.fail_on_warnings))
}

fn resolve_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, CliError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(CliError::Workspace)?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|e| CliError::NonUtf8Path(e.into_path_buf().display().to_string()))?;
    Ok(join_path(&cwd, workspace))
}

/// Joins `path` onto `base`, dropping a leading `.` so reported paths stay
/// clean.
fn join_path(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let path = path.strip_prefix(".").unwrap_or(path);
    if path.as_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

fn build_ignore_set(ignore: &[String], exclude: &[String]) -> Result<GlobSet, CliError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in ignore
        .iter()
        .chain(exclude)
        .map(String::as_str)
        .chain(DEFAULT_IGNORES.iter().copied())
    {
        let glob = Glob::new(pattern).map_err(|e| CliError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| CliError::InvalidGlob(e.to_string()))
}

/// Finds the components to convert.
///
/// Files named on the command line are always converted. Directories are
/// searched for files with a configured extension, skipping ignored paths.
/// The result is sorted and free of duplicates.
fn collect_files(
    workspace: &Utf8Path,
    paths: &[Utf8PathBuf],
    config: &AstroTsxConfig,
    ignore_set: &GlobSet,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let extensions = config.file_extensions();
    let mut files = Vec::new();

    for path in paths {
        let path = join_path(workspace, path);
        if path.is_file() {
            files.push(path);
            continue;
        }
        if !path.is_dir() {
            return Err(CliError::MissingPath(path));
        }

        files.extend(
            WalkDir::new(&path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| {
                    let file_name = p.file_name().unwrap_or("");
                    extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
                })
                .filter(|p| {
                    let relative = p.strip_prefix(workspace).unwrap_or(p);
                    !ignore_set.is_match(relative.as_str())
                }),
        );
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// The result of converting one file, before anything is printed.
struct FileOutcome {
    report: FileReport,
    /// The TSX, kept only for `--emit-tsx`.
    tsx: Option<String>,
    rendered_warnings: Vec<String>,
}

fn convert_file(file: &Utf8Path, settings: &RunSettings) -> FileOutcome {
    let relative = file.strip_prefix(&settings.workspace).unwrap_or(file);
    let mut report = FileReport {
        path: relative.to_string(),
        output: None,
        props: None,
        warnings: Vec::new(),
        error: None,
    };

    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            report.error = Some(format!("failed to read file: {e}"));
            return FileOutcome {
                report,
                tsx: None,
                rendered_warnings: Vec::new(),
            };
        }
    };

    tracing::debug!("converting {}", relative);
    let result = match convert_to_tsx(
        &source,
        ConvertOptions {
            filename: Some(file.to_string()),
            sourcemap: settings.sourcemap,
        },
    ) {
        Ok(result) => result,
        Err(e) => {
            report.error = Some(e.to_string());
            return FileOutcome {
                report,
                tsx: None,
                rendered_warnings: Vec::new(),
            };
        }
    };

    report.props = Some(result.props.source.kind_name());
    report.warnings = json_warnings(&result.errors, &source);
    let rendered_warnings = result
        .errors
        .iter()
        .map(|error| ParseWarning::new(error, relative, &source).render())
        .collect();

    let tsx = if settings.emit_tsx {
        Some(result.code)
    } else {
        let target = output_path(file, relative, settings.out_dir.as_deref());
        match write_output(&target, &result) {
            Ok(()) => {
                report.output = Some(
                    target
                        .strip_prefix(&settings.workspace)
                        .unwrap_or(&target)
                        .to_string(),
                );
            }
            Err(e) => report.error = Some(format!("failed to write {target}: {e}")),
        }
        None
    };

    FileOutcome {
        report,
        tsx,
        rendered_warnings,
    }
}

/// `X.astro` becomes `X.astro.tsx`, next to the component or mirrored under
/// the output directory.
fn output_path(file: &Utf8Path, relative: &Utf8Path, out_dir: Option<&Utf8Path>) -> Utf8PathBuf {
    let target = match out_dir {
        Some(out_dir) if relative.is_relative() => out_dir.join(relative),
        Some(out_dir) => out_dir.join(file.file_name().unwrap_or("component.astro")),
        None => file.to_path_buf(),
    };
    Utf8PathBuf::from(format!("{target}.tsx"))
}

fn write_output(target: &Utf8Path, result: &ConvertResult) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, &result.code)?;
    if let Some(map) = &result.map {
        fs::write(format!("{target}.map"), map)?;
    }
    Ok(())
}

fn json_warnings(errors: &[ParseError], source: &str) -> Vec<JsonWarning> {
    let line_index = source_map::LineIndex::new(source);
    errors
        .iter()
        .map(|error| {
            let start = line_index.line_col(error.span.start);
            JsonWarning {
                message: error.to_string(),
                line: start.line + 1,
                column: start.col + 1,
                offset: u32::from(error.span.start),
            }
        })
        .collect()
}
