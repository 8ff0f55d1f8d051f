//! Frontmatter splitting.

use crate::ast::{AstroDocument, Frontmatter, Markup};
use crate::error::{ParseError, ParseErrorKind};
use crate::ParseResult;
use source_map::Span;

const FENCE: &str = "---";

/// Splits `source` into frontmatter and markup.
pub(crate) fn parse_document(source: &str) -> ParseResult<'_> {
    let leading_ws = source.len() - source.trim_start().len();
    if !source[leading_ws..].starts_with(FENCE) {
        return ParseResult {
            document: AstroDocument {
                source,
                frontmatter: None,
                markup: Markup::slice(source, 0, source.len()),
            },
            errors: Vec::new(),
        };
    }

    let opening_fence = Span::at(leading_ws as u32, FENCE.len());
    let content_start = leading_ws + FENCE.len();
    let mut errors = Vec::new();

    let closing = find_closing_fence(source, content_start);
    let (content_end, closing_fence, markup_start) = match closing {
        Some((line_start, fence_start)) => {
            let fence_end = fence_start + FENCE.len();
            (
                line_start,
                Some(Span::at(fence_start as u32, FENCE.len())),
                skip_fence_line_end(source, fence_end),
            )
        }
        None => {
            errors.push(ParseError::new(
                ParseErrorKind::UnclosedFrontmatter,
                opening_fence,
            ));
            (source.len(), None, source.len())
        }
    };

    ParseResult {
        document: AstroDocument {
            source,
            frontmatter: Some(Frontmatter {
                content: &source[content_start..content_end],
                span: Span::new(content_start as u32, content_end as u32),
                opening_fence,
                closing_fence,
            }),
            markup: Markup::slice(source, markup_start, source.len()),
        },
        errors,
    }
}

/// Finds the first line after `from` whose only content is `---`.
///
/// Returns the offset where that line starts and where its fence starts.
fn find_closing_fence(source: &str, from: usize) -> Option<(usize, usize)> {
    source[from..]
        .match_indices('\n')
        .map(|(newline, _)| from + newline + 1)
        .find_map(|line_start| {
            let rest = &source[line_start..];
            let line = rest.split('\n').next().unwrap_or(rest);
            if line.trim() != FENCE {
                return None;
            }
            let indent = line.len() - line.trim_start().len();
            Some((line_start, line_start + indent))
        })
}

/// Skips trailing blanks and one line terminator after the closing fence.
fn skip_fence_line_end(source: &str, fence_end: usize) -> usize {
    let rest = &source[fence_end..];
    let blanks = rest.len() - rest.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
    let after_blanks = &rest[blanks..];
    let terminator = if after_blanks.starts_with("\r\n") {
        2
    } else if after_blanks.starts_with('\n') {
        1
    } else {
        0
    };
    fence_end + blanks + terminator
}
