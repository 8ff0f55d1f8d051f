//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// An error found while splitting a component. Errors never stop parsing;
/// they are reported next to a usable document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Where in the component source the problem is.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `---` fence opened the frontmatter but no closing fence followed.
    #[error("unclosed frontmatter: expected a closing `---` line")]
    UnclosedFrontmatter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedFrontmatter,
            Span::new(0u32, 3u32),
        );
        assert_eq!(
            error.to_string(),
            "unclosed frontmatter: expected a closing `---` line"
        );
    }
}
