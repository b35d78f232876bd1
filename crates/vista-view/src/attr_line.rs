//! Attributed lines: a string plus typed, byte-ranged styling directives.
//!
//! An [`AttrLine`] owns its text and an insertion-ordered list of
//! [`StringAttr`]s. Attributes may overlap freely; the renderer decides how
//! overlapping ones compose. Every mutation keeps the attribute ranges in
//! step with the text: inserting bytes shifts ranges at or after the
//! insertion point, and erasing bytes shrinks them.
//!
//! Offsets are bytes and must always fall on `char` boundaries. Passing an
//! offset inside a multi-byte character is a caller bug and panics.

use vista_term::cell::TextAttr;

use crate::range::LineRange;
use crate::wrap::{self, TextWrap};

// ---------------------------------------------------------------------------
// Attribute values
// ---------------------------------------------------------------------------

/// What an attribute asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// Style flags and, optionally, a color pair, merged into each cell.
    Style(TextAttr),
    /// Stamp this glyph over every column in range.
    Graphic(char),
    /// Foreground palette index.
    Foreground(u8),
    /// Background palette index.
    Background(u8),
    /// An attribute kind the renderer does not draw, such as a hyperlink
    /// target or a search origin. Carried through edits untouched.
    Custom { name: &'static str, value: i64 },
}

/// The kind tag of an [`AttrValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Style,
    Graphic,
    Foreground,
    Background,
    Custom(&'static str),
}

impl AttrValue {
    #[must_use]
    pub const fn kind(self) -> AttrKind {
        match self {
            Self::Style(_) => AttrKind::Style,
            Self::Graphic(_) => AttrKind::Graphic,
            Self::Foreground(_) => AttrKind::Foreground,
            Self::Background(_) => AttrKind::Background,
            Self::Custom { name, .. } => AttrKind::Custom(name),
        }
    }
}

/// One styling directive over a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringAttr {
    pub range: LineRange,
    pub value: AttrValue,
}

impl StringAttr {
    #[inline]
    #[must_use]
    pub const fn new(range: LineRange, value: AttrValue) -> Self {
        Self { range, value }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> AttrKind {
        self.value.kind()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An attribute range that does not fit the line it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("attribute range {range} is inverted")]
    Inverted { range: LineRange },

    #[error("attribute range {range} extends past line length {len}")]
    OutOfBounds { range: LineRange, len: usize },
}

// ---------------------------------------------------------------------------
// AttrLine
// ---------------------------------------------------------------------------

/// A string annotated with [`StringAttr`]s.
///
/// ```
/// use vista_view::{AttrLine, AttrValue, LineRange};
///
/// let mut line = AttrLine::from("hello world")
///     .with_attr(LineRange::new(6, 11), AttrValue::Foreground(2));
/// line.insert(6, &AttrLine::from("big "), None);
///
/// assert_eq!(line.text(), "hello big world");
/// assert_eq!(line.attrs()[0].range, LineRange::new(10, 15));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrLine {
    text: String,
    attrs: Vec<StringAttr>,
}

impl AttrLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            attrs: Vec::new(),
        }
    }

    /// Builder form of [`add_attr`](Self::add_attr).
    #[must_use]
    pub fn with_attr(mut self, range: LineRange, value: AttrValue) -> Self {
        self.add_attr(range, value);
        self
    }

    /// Record an attribute. Attributes are kept in insertion order.
    pub fn add_attr(&mut self, range: LineRange, value: AttrValue) -> &mut Self {
        self.attrs.push(StringAttr::new(range, value));
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn attrs(&self) -> &[StringAttr] {
        &self.attrs
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.attrs.clear();
    }

    /// Check that every attribute range fits inside the text.
    ///
    /// # Errors
    ///
    /// The first offending range, as [`RangeError::Inverted`] or
    /// [`RangeError::OutOfBounds`].
    pub fn validate(&self) -> Result<(), RangeError> {
        let len = self.text.len();
        for attr in &self.attrs {
            let range = attr.range;
            if let Some(end) = range.end {
                if range.start > end {
                    return Err(RangeError::Inverted { range });
                }
            }
            if range.start > len || range.end_or(len) > len {
                return Err(RangeError::OutOfBounds { range, len });
            }
        }
        Ok(())
    }

    // ── Insertion ──────────────────────────────────────────────────────

    /// Splice `other` into this line at byte `index`.
    ///
    /// Existing attributes at or after `index` shift right by `other.len()`
    /// (only when `index` is inside the text, so appending never stretches
    /// attributes that end at the old length). `other`'s attributes are
    /// copied shifted by `index`, open ends closed at the end of the
    /// inserted text.
    ///
    /// With `wrap`, a word-wrap pass runs from `index` once the line is
    /// wider than `wrap.width`; see [`TextWrap`].
    ///
    /// # Panics
    ///
    /// If `index > self.len()` or `index` is not on a char boundary.
    pub fn insert(&mut self, index: usize, other: &Self, wrap: Option<&TextWrap>) -> &mut Self {
        assert!(
            self.text.is_char_boundary(index),
            "insert index {index} is not a char boundary of a {}-byte line",
            self.text.len()
        );

        let added = other.text.len();
        if index < self.text.len() {
            self.shift_attrs(index, added);
        }
        self.text.insert_str(index, &other.text);

        let inserted_end = index + added;
        self.attrs.extend(other.attrs.iter().map(|attr| {
            let range = LineRange {
                start: attr.range.start + index,
                end: Some(attr.range.end.map_or(inserted_end, |end| end + index)),
            };
            StringAttr::new(range, attr.value)
        }));

        if let Some(settings) = wrap {
            if self.text.len() > settings.width {
                wrap::wrap_from(self, index, settings);
            }
        }
        self
    }

    /// Insert `other` at the end.
    pub fn append(&mut self, other: &Self) -> &mut Self {
        self.insert(self.text.len(), other, None)
    }

    /// Append plain text with no attributes.
    pub fn append_str(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    /// Insert `count` copies of `ch` at `index`, shifting attributes.
    ///
    /// Unlike [`insert`](Self::insert), attributes that end exactly at
    /// `index` grow over the new characters even at the end of the line.
    ///
    /// # Panics
    ///
    /// If `index` is not a char boundary.
    pub fn insert_chars(&mut self, index: usize, count: usize, ch: char) -> &mut Self {
        assert!(
            self.text.is_char_boundary(index),
            "insert index {index} is not a char boundary"
        );
        if count == 0 {
            return self;
        }
        let run: String = std::iter::repeat_n(ch, count).collect();
        self.text.insert_str(index, &run);
        self.shift_attrs(index, run.len());
        self
    }

    /// Remove `len` bytes starting at `pos`.
    ///
    /// Attribute offsets inside the removed span collapse onto `pos`;
    /// offsets after it move left by `len`.
    ///
    /// # Panics
    ///
    /// If the span is out of bounds or does not fall on char boundaries.
    pub fn erase(&mut self, pos: usize, len: usize) -> &mut Self {
        let end = pos + len;
        assert!(
            end <= self.text.len() && self.text.is_char_boundary(pos) && self.text.is_char_boundary(end),
            "erase span {pos}..{end} is not valid in a {}-byte line",
            self.text.len()
        );
        self.text.replace_range(pos..end, "");
        for attr in &mut self.attrs {
            attr.range = attr.range.erased(pos, len);
        }
        self
    }

    fn shift_attrs(&mut self, index: usize, amount: usize) {
        let amount = isize::try_from(amount).unwrap_or(isize::MAX);
        for attr in &mut self.attrs {
            attr.range = attr.range.shifted(index, amount);
        }
    }

    // ── Extraction ─────────────────────────────────────────────────────

    /// Copy out `[start, start + len)`, or `[start, end)` when `len` is
    /// `None`.
    ///
    /// Attributes touching the window are clipped to it and rebased to
    /// zero; the rest are dropped. An open-ended attribute comes back
    /// closed at the end of the window.
    ///
    /// # Panics
    ///
    /// If the window is out of bounds or not on char boundaries.
    #[must_use]
    pub fn subline(&self, start: usize, len: Option<usize>) -> Self {
        let end = len.map_or(self.text.len(), |len| start + len);
        assert!(
            end <= self.text.len() && self.text.is_char_boundary(start) && self.text.is_char_boundary(end),
            "subline {start}..{end} is not valid in a {}-byte line",
            self.text.len()
        );

        let window = LineRange::new(start, end);
        let text = self.text[start..end].to_owned();
        let shift = -isize::try_from(start).unwrap_or(isize::MAX);

        let attrs: Vec<StringAttr> = self
            .attrs
            .iter()
            .filter(|attr| window.intersects(attr.range))
            .map(|attr| {
                let range = window.intersection(attr.range).shifted(start, shift);
                StringAttr::new(range, attr.value)
            })
            .collect();

        for attr in &attrs {
            assert!(
                attr.range.end_or(0) <= text.len(),
                "subline produced range {} past length {}",
                attr.range,
                text.len()
            );
        }

        Self { text, attrs }
    }

    /// Split on `\n` into independent lines.
    ///
    /// A trailing newline yields a trailing empty line. The separators
    /// themselves are not part of any piece.
    #[must_use]
    pub fn split_lines(&self) -> Vec<Self> {
        let mut lines = Vec::new();
        let mut pos = 0;
        while let Some(offset) = self.text[pos..].find('\n') {
            lines.push(self.subline(pos, Some(offset)));
            pos += offset + 1;
        }
        lines.push(self.subline(pos, None));
        lines
    }
}

impl From<&str> for AttrLine {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            attrs: Vec::new(),
        }
    }
}

impl From<String> for AttrLine {
    fn from(text: String) -> Self {
        Self {
            text,
            attrs: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
