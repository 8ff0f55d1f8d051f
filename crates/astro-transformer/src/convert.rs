//! Source to TSX conversion in one call.

use crate::props::PropsResolution;
use crate::transform::{transform, TransformOptions};
use crate::types::STDIN_FILENAME;
use astro_parser::{parse, ParseError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use source_map::V3Error;
use thiserror::Error;

const INLINE_MAP_PREFIX: &str = "\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,";

/// How the source map is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
    /// No source map.
    #[default]
    None,
    /// Returned separately as JSON.
    External,
    /// Appended to the code as a base64 data URL comment.
    Inline,
    /// Both of the above.
    Both,
}

impl SourceMapMode {
    fn wants_external(self) -> bool {
        matches!(self, SourceMapMode::External | SourceMapMode::Both)
    }

    fn wants_inline(self) -> bool {
        matches!(self, SourceMapMode::Inline | SourceMapMode::Both)
    }
}

/// Options for [`convert_to_tsx`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Path of the component. Names the component function and the map.
    pub filename: Option<String>,
    pub sourcemap: SourceMapMode,
}

/// The result of [`convert_to_tsx`].
#[derive(Debug)]
pub struct ConvertResult {
    /// The TSX document, with an inline source map comment if requested.
    pub code: String,
    /// Source Map v3 JSON, for external maps.
    pub map: Option<String>,
    /// How the props type was resolved.
    pub props: PropsResolution,
    /// Problems found while splitting the component. Conversion still
    /// produced `code`.
    pub errors: Vec<ParseError>,
}

/// Errors that stop a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to serialize source map: {0}")]
    SourceMap(#[from] V3Error),
}

/// Converts an Astro component to TSX.
///
/// # Example
///
/// ```
/// use astro_transformer::{convert_to_tsx, ConvertOptions, SourceMapMode};
///
/// let result = convert_to_tsx(
///     "---\ninterface Props { title: string }\n---\n<h1>{Astro.props.title}</h1>\n",
///     ConvertOptions {
///         filename: Some("src/components/Heading.astro".to_string()),
///         sourcemap: SourceMapMode::External,
///     },
/// )
/// .unwrap();
/// assert!(result.code.contains("Heading__AstroComponent_(_props: Props)"));
/// assert!(result.map.is_some());
/// ```
pub fn convert_to_tsx(source: &str, options: ConvertOptions) -> Result<ConvertResult, ConvertError> {
    let parsed = parse(source);
    let result = transform(
        &parsed.document,
        TransformOptions {
            filename: options.filename.clone(),
        },
    );

    let mut code = result.tsx_code;
    let mut map = None;

    if options.sourcemap != SourceMapMode::None {
        let name = source_name(options.filename.as_deref());
        let json = result
            .source_map
            .to_v3(&format!("{name}.tsx"), name, source, &code)
            .to_json()?;

        if options.sourcemap.wants_inline() {
            code.push_str(INLINE_MAP_PREFIX);
            code.push_str(&STANDARD.encode(json.as_bytes()));
        }
        if options.sourcemap.wants_external() {
            map = Some(json);
        }
    }

    Ok(ConvertResult {
        code,
        map,
        props: result.props,
        errors: parsed.errors,
    })
}

/// The basename the map refers to the component by.
fn source_name(filename: Option<&str>) -> &str {
    filename
        .filter(|name| !name.is_empty())
        .and_then(|name| name.rsplit(|c: char| c == '/' || c == '\\').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(STDIN_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(source: &str, filename: Option<&str>, sourcemap: SourceMapMode) -> ConvertResult {
        convert_to_tsx(
            source,
            ConvertOptions {
                filename: filename.map(str::to_string),
                sourcemap,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_no_map() {
        let result = convert("<p/>", None, SourceMapMode::None);
        assert!(result.map.is_none());
        assert!(!result.code.contains("sourceMappingURL"));
    }

    #[test]
    fn test_external_map() {
        let source = "---\nconst a = 1;\n---\n<p>{a}</p>";
        let result = convert(source, Some("/site/src/Card.astro"), SourceMapMode::External);
        let map: serde_json::Value = serde_json::from_str(result.map.as_deref().unwrap()).unwrap();
        assert_eq!(map["version"], 3);
        assert_eq!(map["file"], "Card.astro.tsx");
        assert_eq!(map["sources"], serde_json::json!(["Card.astro"]));
        assert_eq!(map["sourcesContent"], serde_json::json!([source]));
        assert_eq!(map["names"], serde_json::json!([]));
        assert!(map["mappings"].as_str().unwrap().starts_with("AAAG;AACH"));
        assert!(!result.code.contains("sourceMappingURL"));
    }

    #[test]
    fn test_inline_map() {
        let result = convert("<p/>", Some("Card.astro"), SourceMapMode::Inline);
        assert!(result.map.is_none());
        let (code, encoded) = result.code.split_once(INLINE_MAP_PREFIX).unwrap();
        assert!(code.ends_with("): any {}\n"));
        let json = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        let map: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(map["file"], "Card.astro.tsx");
    }

    #[test]
    fn test_both_maps_agree() {
        let result = convert("<p/>", None, SourceMapMode::Both);
        let (_, encoded) = result.code.split_once(INLINE_MAP_PREFIX).unwrap();
        let inline = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(result.map.as_deref(), Some(inline.as_str()));
        assert!(inline.contains(r#""sources":["<stdin>"]"#));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let result = convert("---\ninterface Props {}\n", None, SourceMapMode::None);
        assert_eq!(result.errors.len(), 1);
        assert!(result.code.contains("(_props: Props)"));
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name(None), "<stdin>");
        assert_eq!(source_name(Some("")), "<stdin>");
        assert_eq!(source_name(Some("a/b/C.astro")), "C.astro");
        assert_eq!(source_name(Some("a\\C.astro")), "C.astro");
    }
}
