//! Source spans into a message.
//!
//! A [`Span`] is a half-open `[start, end)` byte range into the original
//! message text. Every span produced by the extractor starts and ends on a
//! UTF-8 character boundary, so slicing the message with a span never panics.

use std::{fmt, ops::Range};

use serde::Serialize;

/// A half-open byte range `[start, end)` into a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a range.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `range.start > range.end`.
    pub fn new(range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "span start after end");
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `offset` lies inside the span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns `true` if the two spans share at least one position.
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the span as a standard range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(3..10);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 10);
        assert_eq!(span.len(), 7);
        assert!(!span.is_empty());
        assert!(Span::new(4..4).is_empty());
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(2..5);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
    }

    #[test]
    fn test_span_overlaps() {
        let a = Span::new(0..5);
        assert!(a.overlaps(Span::new(4..8)));
        assert!(!a.overlaps(Span::new(5..8)), "touching spans do not overlap");
        assert!(a.overlaps(Span::new(1..2)));
    }

    #[test]
    fn test_span_union() {
        let span = Span::new(2..4).union(Span::new(8..12));
        assert_eq!(span.range(), 2..12);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(1..9).to_string(), "1..9");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn span_strategy() -> impl Strategy<Value = Span> {
        (0usize..1000, 0usize..200).prop_map(|(start, len)| Span::new(start..start + len))
    }

    fn check_union_covers_both(a: Span, b: Span) -> Result<(), TestCaseError> {
        let union = a.union(b);
        prop_assert!(union.start() <= a.start() && union.start() <= b.start());
        prop_assert!(union.end() >= a.end() && union.end() >= b.end());
        Ok(())
    }

    fn check_overlaps_symmetric(a: Span, b: Span) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps(b), b.overlaps(a));
        Ok(())
    }

    proptest! {
        #[test]
        fn union_covers_both(a in span_strategy(), b in span_strategy()) {
            check_union_covers_both(a, b)?;
        }

        #[test]
        fn overlaps_symmetric(a in span_strategy(), b in span_strategy()) {
            check_overlaps_symmetric(a, b)?;
        }
    }
}
