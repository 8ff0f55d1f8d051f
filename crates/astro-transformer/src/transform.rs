//! TSX synthesis.

use crate::markup::{LoweredMarkup, MarkupLowering, PassthroughLowering};
use crate::props::{resolve_props_from_preamble, PropsResolution};
use crate::types::component_name_from_path;
use astro_parser::AstroDocument;
use source_map::{ByteOffset, SourceMap, SourceMapBuilder};

/// Separates a local `Props` declaration from the markup that follows.
const STATEMENT_PADDING: &str = "\"\";";

/// Declares the `Astro` global with the component's props type.
pub const ASTRO_GLOBAL_DECLARATION: &str = "/**
 * Astro global available in all contexts in .astro files
 *
 * [Astro documentation](https://docs.astro.build/reference/api-reference/#astro-global)
*/
declare const Astro: Readonly<import('astro').AstroGlobal<Props>>";

/// Options for transformation.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// The filename of the source file. Used to name the component function.
    pub filename: Option<String>,
}

/// The result of transformation.
#[derive(Debug)]
pub struct TransformResult {
    /// The generated TSX code.
    pub tsx_code: String,
    /// The source map for position mapping.
    pub source_map: SourceMap,
    /// How the props type was resolved.
    pub props: PropsResolution,
}

/// Generated text and its mappings, appended in lockstep.
#[derive(Default)]
struct Emitter {
    output: String,
    builder: SourceMapBuilder,
}

impl Emitter {
    fn generated(&mut self, text: &str) {
        self.output.push_str(text);
        self.builder.add_generated(text);
    }

    fn source(&mut self, original_start: ByteOffset, text: &str) {
        self.output.push_str(text);
        self.builder.add_source(original_start, text);
    }

    /// Emits lowered markup: mapped ranges with their original spans, the
    /// rest as synthetic text.
    fn lowered(&mut self, lowered: &LoweredMarkup) {
        let code = &lowered.code;
        let mut mappings = lowered.mappings.clone();
        mappings.sort_by_key(|m| m.generated_start);

        let mut pos = 0;
        for mapping in &mappings {
            if mapping.generated_start < pos || mapping.generated_end > code.len() {
                continue;
            }
            if mapping.generated_start > pos {
                self.generated(&code[pos..mapping.generated_start]);
            }
            let text = &code[mapping.generated_start..mapping.generated_end];
            self.output.push_str(text);
            self.builder.add_transformed(mapping.original_span, text);
            pos = mapping.generated_end;
        }
        if pos < code.len() {
            self.generated(&code[pos..]);
        }
    }

    fn finish(self) -> (String, SourceMap) {
        (self.output, self.builder.build())
    }
}

/// Transforms an Astro document to TSX, copying markup through unchanged.
pub fn transform(doc: &AstroDocument<'_>, options: TransformOptions) -> TransformResult {
    transform_with_lowering(doc, options, &PassthroughLowering)
}

/// Transforms an Astro document to TSX with a custom markup lowering.
///
/// The document is laid out as:
/// 1. the preamble, byte for byte, and a line break for the closing fence
/// 2. `"";` when a local `Props` declaration precedes the markup
/// 3. the lowered markup wrapped in `<Fragment>`, or a single line break
/// 4. the default-exported component function typed with the props
/// 5. the `Astro` global declaration, unless no `Props` was found
pub fn transform_with_lowering(
    doc: &AstroDocument<'_>,
    options: TransformOptions,
    lowering: &dyn MarkupLowering,
) -> TransformResult {
    let props = resolve_props_from_preamble(doc.preamble());
    let mut out = Emitter::default();

    if let Some(frontmatter) = &doc.frontmatter {
        out.source(frontmatter.span.start, frontmatter.content);
        out.generated("\n");
    }

    if props.requires_statement_padding {
        out.generated(STATEMENT_PADDING);
    }

    let lowered = lowering.lower(doc.markup.content, doc.markup.span.start);
    if lowered.code.is_empty() {
        out.generated("\n");
    } else {
        out.generated("<Fragment>");
        if !lowered.code.starts_with('\n') && !lowered.code.starts_with("\r\n") {
            out.generated("\n");
        }
        out.lowered(&lowered);
        out.generated("\n</Fragment>\n");
    }

    let component_name = options
        .filename
        .as_deref()
        .map(component_name_from_path)
        .unwrap_or_default();
    out.generated(&component_signature(&component_name, &props));

    if props.emit_ambient_declaration {
        out.generated(ASTRO_GLOBAL_DECLARATION);
    }

    let (tsx_code, source_map) = out.finish();
    TransformResult {
        tsx_code,
        source_map,
        props,
    }
}

/// `export default function Name__AstroComponent_<T>(_props: Props<T>): any {}`
fn component_signature(component_name: &str, props: &PropsResolution) -> String {
    format!(
        "export default function {}__AstroComponent_{}(_props: {}): any {{}}\n",
        component_name,
        props.declaration_clause(),
        props.parameter_type()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupMapping;
    use astro_parser::parse;
    use pretty_assertions::assert_eq;
    use source_map::Span;

    fn transform_source(source: &str) -> TransformResult {
        transform(&parse(source).document, TransformOptions::default())
    }

    #[test]
    fn test_markup_only() {
        let result = transform_source("<div></div>");
        assert_eq!(
            result.tsx_code,
            "<Fragment>\n<div></div>\n</Fragment>\nexport default function __AstroComponent_(_props: Record<string, any>): any {}\n"
        );
    }

    #[test]
    fn test_empty_source() {
        let result = transform_source("");
        assert_eq!(
            result.tsx_code,
            "\nexport default function __AstroComponent_(_props: Record<string, any>): any {}\n"
        );
        assert!(result.source_map.is_empty());
    }

    #[test]
    fn test_crlf_markup_gets_no_extra_break() {
        let result = transform_source("---\r\nimport { Props } from './p';\r\n---\r\n\r\n<p/>");
        assert!(result
            .tsx_code
            .starts_with("\r\nimport { Props } from './p';\r\n\n<Fragment>\r\n<p/>\n</Fragment>\n"));
    }

    #[test]
    fn test_component_name_prefix() {
        let result = transform(
            &parse("<p/>").document,
            TransformOptions {
                filename: Some("src/components/blog-post.astro".to_string()),
            },
        );
        insta::assert_snapshot!(
            result.tsx_code.lines().find(|l| l.starts_with("export")).unwrap(),
            @"export default function BlogPost__AstroComponent_(_props: Record<string, any>): any {}"
        );
    }

    #[test]
    fn test_ambient_declaration_ends_document() {
        let result = transform_source("---\ntype Props = { a: string };\n---\n<p/>");
        assert!(result.tsx_code.ends_with(ASTRO_GLOBAL_DECLARATION));
        assert!(!result.tsx_code.ends_with('\n'));
    }

    #[test]
    fn test_preamble_maps_to_source() {
        let source = "---\ninterface Props { a: string }\n---\n<p>{Astro.props.a}</p>\n";
        let result = transform_source(source);
        let generated = result.tsx_code.find("interface").unwrap() as u32;
        assert_eq!(
            result
                .source_map
                .original_position(ByteOffset::from(generated))
                .map(u32::from),
            source.find("interface").map(|i| i as u32)
        );
        let padding = result.tsx_code.find("\"\";").unwrap() as u32;
        assert_eq!(
            result.source_map.original_position(ByteOffset::from(padding)),
            None
        );
    }

    struct Uppercase;

    impl MarkupLowering for Uppercase {
        fn lower(&self, markup: &str, base_offset: ByteOffset) -> LoweredMarkup {
            let prefix = "{/* lowered */}";
            let code = format!("{prefix}{}", markup.to_uppercase());
            LoweredMarkup {
                mappings: vec![MarkupMapping {
                    generated_start: prefix.len(),
                    generated_end: code.len(),
                    original_span: Span::at(base_offset, markup.len()),
                }],
                code,
            }
        }
    }

    #[test]
    fn test_custom_lowering() {
        let source = "<p/>";
        let result = transform_with_lowering(
            &parse(source).document,
            TransformOptions::default(),
            &Uppercase,
        );
        assert!(result.tsx_code.starts_with("<Fragment>\n{/* lowered */}<P/>\n</Fragment>\n"));
        let upper = result.tsx_code.find("<P/>").unwrap() as u32;
        assert_eq!(
            result
                .source_map
                .original_position(ByteOffset::from(upper))
                .map(u32::from),
            Some(0)
        );
        let comment = result.tsx_code.find("{/*").unwrap() as u32;
        assert_eq!(
            result.source_map.original_position(ByteOffset::from(comment)),
            None
        );
    }
}
