//! Markup lowering.
//!
//! Turning the template body into TSX is a separate concern from props
//! resolution. The synthesizer asks a [`MarkupLowering`] implementation for
//! the lowered fragment and splices it between `<Fragment>` tags.

use source_map::{ByteOffset, Span};

/// A generated range of [`LoweredMarkup::code`] and the component source
/// range it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupMapping {
    /// Byte offset in the lowered code where the mapped range starts.
    pub generated_start: usize,
    /// Byte offset in the lowered code where the mapped range ends.
    pub generated_end: usize,
    /// Span in the component source.
    pub original_span: Span,
}

/// The TSX produced for a markup body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoweredMarkup {
    pub code: String,
    /// Mapped ranges of `code`. Text outside every mapping is synthetic.
    pub mappings: Vec<MarkupMapping>,
}

/// Lowers markup text to a TSX fragment body.
pub trait MarkupLowering {
    /// `base_offset` is where `markup` starts in the component source.
    fn lower(&self, markup: &str, base_offset: ByteOffset) -> LoweredMarkup;
}

/// Copies markup through unchanged. Astro markup is already close enough to
/// JSX for a type-checker to read expressions out of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLowering;

impl MarkupLowering for PassthroughLowering {
    fn lower(&self, markup: &str, base_offset: ByteOffset) -> LoweredMarkup {
        let mappings = if markup.is_empty() {
            Vec::new()
        } else {
            vec![MarkupMapping {
                generated_start: 0,
                generated_end: markup.len(),
                original_span: Span::at(base_offset, markup.len()),
            }]
        };
        LoweredMarkup {
            code: markup.to_string(),
            mappings,
        }
    }
}
