//! Source spans: byte offsets into the original source text.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
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
    use proptest::prelude::*;

    #[test]
    fn merge_takes_outer_bounds() {
        let a = Span::new(2, 5);
        let b = Span::new(1, 3);
        assert_eq!(a.to(b), Span::new(1, 5));
    }

    #[test]
    fn display_format() {
        assert_eq!(Span::new(0, 3).to_string(), "0..3");
    }

    proptest! {
        /// `to` always produces the tightest span covering both inputs:
        /// it never shrinks either side, and it's commutative.
        #[test]
        fn merge_covers_both_spans(a0 in 0usize..1000, a1 in 0usize..1000, b0 in 0usize..1000, b1 in 0usize..1000) {
            let a = Span::new(a0.min(a1), a0.max(a1));
            let b = Span::new(b0.min(b1), b0.max(b1));
            let merged = a.to(b);
            prop_assert!(merged.start <= a.start && merged.start <= b.start);
            prop_assert!(merged.end >= a.end && merged.end >= b.end);
            prop_assert_eq!(merged, b.to(a));
        }
    }
}
