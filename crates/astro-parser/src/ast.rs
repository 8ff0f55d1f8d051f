//! Top-level structure of an Astro component.

use source_map::Span;

/// A component split into its frontmatter preamble and markup body.
///
/// Both sections borrow from the original source; nothing is copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstroDocument<'src> {
    /// The complete component source.
    pub source: &'src str,
    /// The `---`-fenced script preamble, if the component has one.
    pub frontmatter: Option<Frontmatter<'src>>,
    /// Everything after the frontmatter.
    pub markup: Markup<'src>,
}

impl<'src> AstroDocument<'src> {
    /// The preamble text, without fences.
    pub fn preamble(&self) -> Option<&'src str> {
        self.frontmatter.as_ref().map(|fm| fm.content)
    }
}

/// The script preamble between the two `---` fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter<'src> {
    /// Text between the fences. Starts right after the opening `---` and ends
    /// at the start of the closing fence line, so it usually begins and ends
    /// with a line break.
    pub content: &'src str,
    /// Span of `content` in the component source.
    pub span: Span,
    /// Span of the opening `---`.
    pub opening_fence: Span,
    /// Span of the closing `---`; `None` when the frontmatter runs to the end
    /// of the file.
    pub closing_fence: Option<Span>,
}

/// The markup body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup<'src> {
    pub content: &'src str,
    pub span: Span,
}

impl<'src> Markup<'src> {
    pub(crate) fn slice(source: &'src str, start: usize, end: usize) -> Self {
        Self {
            content: &source[start..end],
            span: Span::new(start as u32, end as u32),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
