//! Line index for offset ↔ line/column conversion.

use crate::ByteOffset;
use text_size::TextSize;

/// A zero-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Start offsets of every line in a text, for O(log n) lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    /// Builds the index. Only `\n` starts a new line; a preceding `\r` stays
    /// at the end of its line.
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from(offset as u32 + 1)),
            )
            .collect();
        Self { line_starts }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of(&self, offset: ByteOffset) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Converts a byte offset to a line and byte column.
    pub fn line_col(&self, offset: ByteOffset) -> LineCol {
        let line = self.line_of(offset);
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, col.into())
    }

    /// Converts a byte offset to a line and UTF-16 column, the unit Source
    /// Map v3 consumers and editors count in.
    pub fn line_col_utf16(&self, text: &str, offset: ByteOffset) -> LineCol {
        let line = self.line_of(offset);
        let start = usize::from(self.line_starts[line]);
        let end = usize::from(offset).min(text.len());
        let col = text
            .get(start..end)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or(0);
        LineCol::new(line as u32, col as u32)
    }

    /// Converts a line and byte column back to an offset.
    ///
    /// Returns `None` if the line does not exist.
    pub fn offset(&self, line_col: LineCol) -> Option<ByteOffset> {
        self.line_starts
            .get(line_col.line as usize)
            .map(|&start| start + TextSize::from(line_col.col))
    }
}
