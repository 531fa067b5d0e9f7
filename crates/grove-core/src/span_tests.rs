use crate::span::{LineColumn, PositionStore, Span};

#[test]
fn span_end_and_display() {
    let span = Span::new(4, 3);
    assert_eq!(span.end(), 7);
    assert_eq!(span.to_string(), "4..7");
    assert!(!span.is_empty());
}

#[test]
fn span_cover() {
    let a = Span::new(2, 3);
    let b = Span::new(8, 2);
    assert_eq!(a.cover(b), Span::new(2, 8));
    assert_eq!(b.cover(a), Span::new(2, 8));
}

#[test]
fn line_column_lookup() {
    let store = PositionStore::new("ab\ncd\n\nx");

    assert_eq!(store.line_column(0), LineColumn { line: 1, column: 0 });
    assert_eq!(store.line_column(2), LineColumn { line: 1, column: 2 });
    assert_eq!(store.line_column(3), LineColumn { line: 2, column: 0 });
    assert_eq!(store.line_column(6), LineColumn { line: 3, column: 0 });
    assert_eq!(store.line_column(7), LineColumn { line: 4, column: 0 });
}

#[test]
fn line_column_clamps_past_end() {
    let store = PositionStore::new("abc");
    assert_eq!(store.line_column(99), LineColumn { line: 1, column: 3 });
}
