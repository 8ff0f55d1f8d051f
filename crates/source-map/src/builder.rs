//! Recording generated ↔ original ranges while a document is assembled.

use crate::v3::SourceMapV3;
use crate::{ByteOffset, LineCol, LineIndex, Span};
use text_size::TextSize;

/// A generated range and the original range it was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: Span,
    pub original: Span,
}

impl Mapping {
    /// True when the generated text is a byte-for-byte copy of the original,
    /// so positions inside the range map linearly.
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.generated.len() == self.original.len()
    }
}

/// Mappings from a generated document back to its source, sorted by
/// generated position.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::new()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Maps a generated offset back to the source. Offsets inside synthetic
    /// glue have no original position.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let mapping = self.mappings.get(idx)?;
        if !mapping.generated.contains(generated) {
            return None;
        }
        let delta = generated - mapping.generated.start;
        if mapping.is_verbatim() {
            Some(mapping.original.start + delta)
        } else {
            Some(mapping.original.start)
        }
    }

    /// Maps a source offset forward into the generated document.
    pub fn generated_position(&self, original: ByteOffset) -> Option<ByteOffset> {
        self.mappings
            .iter()
            .find(|m| m.original.contains(original))
            .map(|m| {
                if m.is_verbatim() {
                    m.generated.start + (original - m.original.start)
                } else {
                    m.generated.start
                }
            })
    }

    /// Serializes the mappings as a Source Map v3 object.
    ///
    /// Every mapping contributes a segment at its start; verbatim mappings also
    /// contribute one at each generated line start they span, so consumers
    /// resolve multi-line copies without interpolating across lines.
    pub fn to_v3(
        &self,
        file: &str,
        source_name: &str,
        original: &str,
        generated: &str,
    ) -> SourceMapV3 {
        let original_index = LineIndex::new(original);
        let generated_index = LineIndex::new(generated);

        let mut segments: Vec<(LineCol, LineCol)> = Vec::new();
        let mut push = |gen: ByteOffset, orig: ByteOffset| {
            segments.push((
                generated_index.line_col_utf16(generated, gen),
                original_index.line_col_utf16(original, orig),
            ));
        };

        for mapping in self.mappings.iter().filter(|m| !m.generated.is_empty()) {
            push(mapping.generated.start, mapping.original.start);
            if !mapping.is_verbatim() {
                continue;
            }
            let copied = mapping.generated.slice(generated);
            for (newline, _) in copied.match_indices('\n') {
                let next = TextSize::from(newline as u32 + 1);
                if next < mapping.generated.len() {
                    push(mapping.generated.start + next, mapping.original.start + next);
                }
            }
        }

        let mut v3 = swc_sourcemap::SourceMapBuilder::new(Some(file.to_string().into()));
        let source_id = v3.add_source(source_name.to_string().into());
        v3.set_source_contents(source_id, Some(original.to_string().into()));
        for (gen, orig) in segments {
            v3.add_raw(gen.line, gen.col, orig.line, orig.col, Some(source_id), None, false);
        }
        SourceMapV3::new(v3.into_sourcemap())
    }
}

/// Accumulates mappings while generated text is appended in order.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The length of everything appended so far.
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Appends text copied unchanged from `original_start` in the source.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        self.add_transformed(Span::at(original_start, text.len()), text);
    }

    /// Appends text that came from `original` but was rewritten.
    pub fn add_transformed(&mut self, original: Span, generated_text: &str) {
        let generated = Span::at(self.generated_offset, generated_text.len());
        if !generated.is_empty() {
            self.mappings.push(Mapping {
                generated,
                original,
            });
        }
        self.generated_offset = generated.end;
    }

    /// Appends synthetic text with no source counterpart.
    pub fn add_generated(&mut self, text: &str) {
        self.generated_offset += TextSize::from(text.len() as u32);
    }

    pub fn build(mut self) -> SourceMap {
        self.mappings.sort_by_key(|m| m.generated.start);
        SourceMap {
            mappings: self.mappings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_glue_has_no_original_position() {
        let mut builder = SourceMapBuilder::new();
        builder.add_source(TextSize::from(4), "let a;");
        builder.add_generated("\"\";");
        builder.add_source(TextSize::from(20), "<p/>");
        let map = builder.build();

        assert_eq!(map.len(), 2);
        let original = |gen: u32| map.original_position(TextSize::from(gen)).map(u32::from);
        assert_eq!(original(0), Some(4));
        assert_eq!(original(5), Some(9));
        assert_eq!(original(6), None);
        assert_eq!(original(9), Some(20));
        assert_eq!(
            map.generated_position(TextSize::from(21)),
            Some(TextSize::from(10))
        );
        assert_eq!(map.generated_position(TextSize::from(0)), None);
    }

    #[test]
    fn test_transformed_maps_to_start() {
        let mut builder = SourceMapBuilder::new();
        builder.add_transformed(Span::new(10u32, 12u32), "{/* x */}");
        let map = builder.build();
        assert_eq!(
            map.original_position(TextSize::from(5)),
            Some(TextSize::from(10))
        );
    }

    #[test]
    fn test_empty_copy_adds_no_mapping() {
        let mut builder = SourceMapBuilder::new();
        builder.add_source(TextSize::from(3), "");
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_to_v3_segments_per_line() {
        let original = "ab\ncd";
        let mut builder = SourceMapBuilder::new();
        builder.add_generated("X");
        builder.add_source(TextSize::from(0), original);
        let generated = "Xab\ncd";

        let v3 = builder
            .build()
            .to_v3("Card.astro.tsx", "Card.astro", original, generated);
        assert_eq!(
            v3.to_json().unwrap(),
            r#"{"version":3,"file":"Card.astro.tsx","sources":["Card.astro"],"sourcesContent":["ab\ncd"],"names":[],"mappings":"CAAA;AACA"}"#
        );
        assert_eq!(v3.lookup(0, 0), None);
        assert_eq!(v3.lookup(0, 2), Some((0, 0)));
        assert_eq!(v3.lookup(1, 0), Some((1, 0)));
    }

    #[test]
    fn test_to_v3_skips_unmapped_lines() {
        let original = "---\nlet a;\n---\n<p/>";
        let mut builder = SourceMapBuilder::new();
        builder.add_source(TextSize::from(3), "\nlet a;\n");
        builder.add_generated("\n<Fragment>\n");
        builder.add_source(TextSize::from(15), "<p/>");
        let generated = "\nlet a;\n\n<Fragment>\n<p/>";

        let v3 = builder.build().to_v3("a.tsx", "a.astro", original, generated);
        // line 0 → 0:3, line 1 → 1:0, lines 2-3 glue, line 4 → 3:0
        let json: serde_json::Value = serde_json::from_str(&v3.to_json().unwrap()).unwrap();
        assert_eq!(json["mappings"], "AAAG;AACH;;;AAEA");
        assert_eq!(v3.lookup(3, 0), None);
        assert_eq!(v3.lookup(4, 2), Some((3, 0)));
    }
}
