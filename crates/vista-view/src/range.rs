//! Byte ranges over a line of text.
//!
//! A [`LineRange`] is half-open, `[start, end)`, over byte offsets. The end
//! may be open, meaning "to the end of the string, whatever that is when
//! the range is used". An open end compares greater than every offset.

use std::fmt;

/// A half-open byte range `[start, end)`; `end: None` is open-ended.
///
/// # Examples
///
/// ```
/// use vista_view::range::LineRange;
///
/// let a = LineRange::new(2, 6);
/// let b = LineRange::open(4);
/// assert!(a.intersects(b));
/// assert_eq!(a.intersection(b), LineRange::new(4, 6));
/// assert_eq!(b.resolve(10), LineRange::new(4, 10));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl LineRange {
    /// A closed range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "LineRange::new requires start <= end");
        Self {
            start,
            end: Some(end),
        }
    }

    /// A range from `start` to the end of the string.
    #[inline]
    #[must_use]
    pub const fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// The whole string, however long it turns out to be.
    pub const FULL: Self = Self::open(0);

    /// Length in bytes, or `None` for an open range.
    #[inline]
    #[must_use]
    pub fn len(self) -> Option<usize> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    /// True for a closed range with `start == end`. Open ranges are never
    /// empty.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == Some(0)
    }

    /// The end offset, with an open end replaced by `len`.
    #[inline]
    #[must_use]
    pub fn end_or(self, len: usize) -> usize {
        self.end.unwrap_or(len)
    }

    /// A closed copy of this range, an open end replaced by `len`.
    #[inline]
    #[must_use]
    pub fn resolve(self, len: usize) -> Self {
        Self {
            start: self.start,
            end: Some(self.end_or(len)),
        }
    }

    /// Whether `pos` lies in `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: usize) -> bool {
        pos >= self.start && self.end.is_none_or(|end| pos < end)
    }

    /// Whether the two ranges share any offset.
    ///
    /// An empty range counts as touching the range it sits in, including
    /// when it sits right at that range's end.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        if self.contains(other.start) {
            return true;
        }
        if let Some(end) = other.end {
            if end > 0 && self.contains(end - 1) {
                return true;
            }
        }
        other.contains(self.start)
    }

    /// The overlap of two ranges.
    ///
    /// Only meaningful when [`intersects`](Self::intersects) is true. The
    /// result is open only when both inputs are.
    #[must_use]
    pub fn intersection(self, other: Self) -> Self {
        let end = match (self.end, other.end) {
            (None, end) | (end, None) => end,
            (Some(a), Some(b)) => Some(a.min(b)),
        };
        Self {
            start: self.start.max(other.start),
            end,
        }
    }

    /// Shift for an insertion (`amount > 0`) or removal (`amount < 0`) at
    /// byte `index`.
    ///
    /// The start moves when it is at or after `index`. A closed end moves
    /// when `index <= end`, so a range that touches `index` from the left
    /// grows over the inserted bytes. Neither offset drops below zero and
    /// the end never drops below the start.
    #[must_use]
    pub fn shifted(self, index: usize, amount: isize) -> Self {
        let start = if self.start >= index {
            self.start.saturating_add_signed(amount)
        } else {
            self.start
        };
        let end = self.end.map(|end| {
            let end = if index <= end {
                end.saturating_add_signed(amount)
            } else {
                end
            };
            end.max(start)
        });
        Self { start, end }
    }

    /// Adjust for the removal of `len` bytes at `pos`.
    ///
    /// Offsets inside the removed span collapse onto `pos`; offsets after it
    /// move left by `len`.
    #[must_use]
    pub fn erased(self, pos: usize, len: usize) -> Self {
        let squeeze = |o: usize| {
            if o <= pos {
                o
            } else if o < pos + len {
                pos
            } else {
                o - len
            }
        };
        Self {
            start: squeeze(self.start),
            end: self.end.map(squeeze),
        }
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {end})", self.start),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
