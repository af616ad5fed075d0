//! Byte-offset spans into source text

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a document's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    /// Create a new span; `end` is clamped so it never precedes `start`
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if `other` lies entirely inside this span
    pub fn contains_span(&self, other: &TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if a byte offset falls inside this span
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if the two spans share at least one byte
    pub fn intersects(&self, other: &TextSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice the span out of `text`, if it is in bounds
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl std::fmt::Display for TextSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment() {
        let outer = TextSpan::new(10, 30);
        assert!(outer.contains_span(&TextSpan::new(10, 30)));
        assert!(outer.contains_span(&TextSpan::new(15, 20)));
        assert!(!outer.contains_span(&TextSpan::new(5, 20)));
        assert!(outer.contains(10));
        assert!(!outer.contains(30));
    }

    #[test]
    fn test_intersection_is_exclusive_at_bounds() {
        let a = TextSpan::new(0, 5);
        assert!(a.intersects(&TextSpan::new(4, 8)));
        assert!(!a.intersects(&TextSpan::new(5, 8)));
    }

    #[test]
    fn test_inverted_span_is_clamped() {
        let span = TextSpan::new(8, 3);
        assert!(span.is_empty());
        assert_eq!(span.slice("0123456789"), Some(""));
    }
}
