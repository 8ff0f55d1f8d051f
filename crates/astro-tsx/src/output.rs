//! Output formatting.

use crate::cli::OutputFormat;
use astro_parser::{ParseError, ParseErrorKind};
use camino::Utf8Path;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

/// A parse error reported against its component, rendered by miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(astro_tsx::parse), severity(Warning))]
pub struct ParseWarning {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: &'static str,
    #[help]
    help: Option<String>,
}

impl ParseWarning {
    pub fn new(error: &ParseError, file_path: &Utf8Path, source: &str) -> Self {
        let (label, help) = match error.kind {
            ParseErrorKind::UnclosedFrontmatter => (
                "frontmatter opened here",
                Some("add a line containing only `---` after the frontmatter"),
            ),
        };
        let start = usize::from(error.span.start).min(source.len());
        let len = usize::from(error.span.end).min(source.len()) - start;
        Self {
            message: error.to_string(),
            src: NamedSource::new(file_path.as_str(), source.to_string()),
            span: (start, len).into(),
            label,
            help: help.map(str::to_string),
        }
    }

    /// Renders the warning with a labelled source snippet.
    pub fn render(self) -> String {
        format!("{:?}", miette::Report::new(self))
    }
}

/// A parse error in the JSON summary.
#[derive(Debug, Serialize)]
pub struct JsonWarning {
    pub message: String,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// What happened to one component.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path relative to the workspace.
    pub path: String,
    /// Where the TSX was written; absent when printed or failed.
    pub output: Option<String>,
    /// How the props type was resolved: `none`, `interface`, `type` or
    /// `import`.
    pub props: Option<&'static str>,
    pub warnings: Vec<JsonWarning>,
    /// Why the component could not be converted.
    pub error: Option<String>,
}

impl FileReport {
    #[inline]
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a conversion run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    /// Number of converted components.
    pub converted: usize,
    /// Number of parse warnings.
    pub warnings: usize,
    /// Number of components that could not be converted.
    pub failed: usize,
    #[serde(skip)]
    pub fail_on_warnings: bool,
}

impl RunSummary {
    pub fn new(files: Vec<FileReport>, fail_on_warnings: bool) -> Self {
        let failed = files.iter().filter(|f| f.failed()).count();
        Self {
            converted: files.len() - failed,
            warnings: files.iter().map(|f| f.warnings.len()).sum(),
            failed,
            files,
            fail_on_warnings,
        }
    }

    /// Whether the process should exit with an error.
    pub fn should_fail(&self) -> bool {
        self.failed > 0 || (self.warnings > 0 && self.fail_on_warnings)
    }

    /// Formats the summary in the requested format.
    pub fn format(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Human => Ok(self.format_human()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Formats the summary line.
    pub fn format_human(&self) -> String {
        let file_word = if self.converted == 1 { "file" } else { "files" };
        let warning_word = if self.warnings == 1 {
            "warning"
        } else {
            "warnings"
        };

        let mut line = format!(
            "Converted {} {} ({} {})",
            self.converted, file_word, self.warnings, warning_word
        );
        if self.failed > 0 {
            line.push_str(&format!(", {} failed", self.failed));
        }
        line
    }
}
