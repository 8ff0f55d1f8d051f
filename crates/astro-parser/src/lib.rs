//! Astro component parser for astro-tsx.
//!
//! This crate provides the two pieces of syntax knowledge the TSX synthesizer
//! needs:
//! - Splitting a component into its `---`-fenced frontmatter and its markup
//! - A TypeScript lexer using `logos`, for scanning the frontmatter preamble
//!
//! # Example
//!
//! ```
//! use astro_parser::parse;
//!
//! let source = "---\ninterface Props { title: string }\n---\n<h1>{Astro.props.title}</h1>\n";
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert_eq!(
//!     result.document.preamble(),
//!     Some("\ninterface Props { title: string }\n")
//! );
//! assert_eq!(result.document.markup.content, "<h1>{Astro.props.title}</h1>\n");
//! ```

mod ast;
mod error;
pub mod lexer;
mod parser;

pub use ast::{AstroDocument, Frontmatter, Markup};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use source_map::Span;

/// The result of parsing an Astro component.
#[derive(Debug)]
pub struct ParseResult<'src> {
    /// The split document.
    pub document: AstroDocument<'src>,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Splits an Astro component into frontmatter and markup.
///
/// Parsing never fails outright: malformed input still produces a document,
/// with the problems listed in [`ParseResult::errors`].
pub fn parse(source: &str) -> ParseResult<'_> {
    parser::parse_document(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.frontmatter.is_none());
        assert!(result.document.markup.is_empty());
    }

    #[test]
    fn test_parse_frontmatter_only() {
        let result = parse("---\nconst a = 1;\n---\n");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.preamble(), Some("\nconst a = 1;\n"));
        assert!(result.document.markup.is_empty());
    }
}
