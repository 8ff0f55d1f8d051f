//! Configuration loading.

use crate::cli::SourceMapArg;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;

/// Name of the config file looked up in the workspace.
pub const CONFIG_FILE: &str = "astro-tsx.json";

/// Project configuration from `astro-tsx.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AstroTsxConfig {
    /// File extensions to convert, without the dot.
    pub extensions: Vec<String>,

    /// Glob patterns to exclude, relative to the workspace.
    pub exclude: Vec<String>,

    /// Source map delivery when `--sourcemap` is not given.
    pub sourcemap: Option<SourceMapArg>,

    /// Output directory when `--out-dir` is not given.
    pub out_dir: Option<Utf8PathBuf>,
}

impl AstroTsxConfig {
    /// Loads the config file. An explicit path is used as is; otherwise
    /// `astro-tsx.json` is looked up in the workspace.
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is reported as a warning and also yields the defaults.
    pub fn load(workspace: &Utf8Path, explicit: Option<&Utf8Path>) -> Self {
        let path = match explicit {
            Some(path) if path.is_relative() => workspace.join(path),
            Some(path) => path.to_path_buf(),
            None => workspace.join(CONFIG_FILE),
        };

        if !path.exists() {
            if explicit.is_some() {
                tracing::warn!("config file {} does not exist, using defaults", path);
            }
            return Self::default();
        }

        match Self::parse_file(&path) {
            Ok(config) => {
                tracing::debug!(?config, "loaded {}", path);
                config
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path, e);
                Self::default()
            }
        }
    }

    fn parse_file(path: &Utf8Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    /// Parses config JSON. Comments are allowed.
    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(&remove_json_comments(content)).map_err(|e| e.to_string())
    }

    /// File name suffixes to convert, like `.astro`.
    pub fn file_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            vec![".astro".to_string()]
        } else {
            self.extensions
                .iter()
                .map(|ext| format!(".{}", ext.trim_start_matches('.')))
                .collect()
        }
    }
}

/// Strips `//` and `/* */` comments outside of strings.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&ch| ch != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
