//! Source positions attached to forest and AST nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte range of the input, as offset and length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Span {
    pub offset: u32,
    pub length: u32,
}

impl Span {
    pub fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Span from start and end offsets.
    pub fn from_range(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} is after end {end}");
        Self {
            offset: start,
            length: end.saturating_sub(start),
        }
    }

    pub fn end(self) -> u32 {
        self.offset + self.length
    }

    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    /// Smallest span covering both.
    pub fn cover(self, other: Span) -> Span {
        Span::from_range(self.offset.min(other.offset), self.end().max(other.end()))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.offset, self.end())
    }
}

/// Maps byte offsets of one input to line/column pairs.
#[derive(Clone, Debug, Default)]
pub struct PositionStore {
    /// Offset of the first byte of every line.
    line_starts: Vec<u32>,
    len: u32,
}

impl PositionStore {
    pub fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            input
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            line_starts,
            len: input.len() as u32,
        }
    }

    /// One-based line and zero-based column of `offset`.
    ///
    /// Offsets past the end clamp to the end of input.
    pub fn line_column(&self, offset: u32) -> LineColumn {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        LineColumn {
            line: line as u32 + 1,
            column: offset - self.line_starts[line],
        }
    }
}

/// Line (one-based) and column (zero-based).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Fully resolved position: source name, span, and line/column bounds.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Location {
    pub source: String,
    pub span: Span,
    pub begin: LineColumn,
    pub end: LineColumn,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.begin)
    }
}
