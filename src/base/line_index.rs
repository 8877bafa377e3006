//! Byte offset to line/column conversion.

use text_size::TextSize;

use super::Position;

/// Maps byte offsets in a text snapshot to 0-indexed line/column positions.
///
/// Built once per document version; lookups are a binary search over the
/// recorded line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always begins with 0.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset into a line/column position.
    ///
    /// Offsets past the end of a line clamp to that line; the column is a
    /// byte column within the line.
    pub fn position_at(&self, offset: TextSize) -> Position {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = u32::from(offset - self.line_starts[line]) as usize;
        Position::new(line, column)
    }

    /// Byte offset of the start of `line`, if the line exists.
    pub fn line_start(&self, line: usize) -> Option<TextSize> {
        self.line_starts.get(line).copied()
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
