// SPDX-License-Identifier: MIT
//
// Cell: the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell. It holds a Unicode codepoint,
// a set of style flags, and a reference to a color pair. Colors never live in
// the cell itself: a pair id points into the table owned by the role
// registry, exactly like a curses `cchar_t` refers to `init_pair` slots.
//
// Size: 8 bytes per cell. A 200×50 terminal = 10,000 cells = 80 KB.
//
// Attribute model:
//
//   A `TextAttr` is what a semantic role resolves to and what a STYLE
//   attribute carries: style bits plus an optional pair. Pair 0 means
//   "no pair requested"; painting a `TextAttr` with pair 0 over a cell
//   merges only the style bits and leaves the cell's colors alone.

use std::fmt;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Style flags stored as a compact bitfield.
    ///
    /// ```
    /// use vista_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::REVERSE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2: decreased intensity (faint).
        const DIM       = 1 << 1;
        /// SGR 3: italic.
        const ITALIC    = 1 << 2;
        /// SGR 4: underline.
        const UNDERLINE = 1 << 3;
        /// SGR 5: blink.
        const BLINK     = 1 << 4;
        /// SGR 7: swap foreground and background.
        const REVERSE   = 1 << 5;
        /// SGR 8: invisible text.
        const HIDDEN    = 1 << 6;
        /// Curses "best highlighting mode"; rendered as reverse + bold.
        const STANDOUT  = 1 << 7;
    }
}

// ─── Color Pair Handle ───────────────────────────────────────────────────────

/// A handle to a foreground/background color pair.
///
/// Pair 0 is the terminal default pair and doubles as "no pair" inside a
/// [`TextAttr`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PairId(pub u16);

impl PairId {
    /// The terminal default pair.
    pub const DEFAULT: Self = Self(0);

    /// Whether this is the default pair.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair({})", self.0)
    }
}

// ─── TextAttr ────────────────────────────────────────────────────────────────

/// Style flags plus an optional color pair.
///
/// This is the resolved value of a semantic role, and the payload of a
/// STYLE string attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextAttr {
    pub style: Attr,
    pub pair: PairId,
}

impl TextAttr {
    /// No style, no pair.
    pub const NONE: Self = Self {
        style: Attr::empty(),
        pair: PairId::DEFAULT,
    };

    #[inline]
    #[must_use]
    pub const fn new(style: Attr, pair: PairId) -> Self {
        Self { style, pair }
    }

    /// Style flags only, leaving colors to whatever is underneath.
    #[inline]
    #[must_use]
    pub const fn style(style: Attr) -> Self {
        Self {
            style,
            pair: PairId::DEFAULT,
        }
    }

    /// A color pair with no style flags.
    #[inline]
    #[must_use]
    pub const fn pair(pair: PairId) -> Self {
        Self {
            style: Attr::empty(),
            pair,
        }
    }

    /// Add style flags.
    #[inline]
    #[must_use]
    pub const fn with(self, style: Attr) -> Self {
        Self {
            style: self.style.union(style),
            pair: self.pair,
        }
    }

    /// Whether this attribute would change anything when painted.
    #[inline]
    #[must_use]
    pub const fn is_noop(self) -> bool {
        self.style.is_empty() && self.pair.is_default()
    }
}

impl std::ops::BitOr<Attr> for TextAttr {
    type Output = Self;

    fn bitor(self, rhs: Attr) -> Self {
        self.with(rhs)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// Default character for empty cells.
const SPACE: u32 = b' ' as u32;

/// A single terminal cell.
///
/// # Layout (8 bytes)
///
/// ```text
/// ┌──────────┬───────┬─────────┬─────────┐
/// │ ch: u32  │ style │ padding │ pair    │
/// │ 4 bytes  │  u8   │ 1 byte  │ 2 bytes │
/// └──────────┴───────┴─────────┴─────────┘
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint to display.
    pub ch: u32,

    /// Style flags.
    pub style: Attr,

    /// Color pair for this cell.
    pub pair: PairId,
}

impl Cell {
    /// An empty cell: space character, default pair, no style.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        style: Attr::empty(),
        pair: PairId::DEFAULT,
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            style: Attr::empty(),
            pair: PairId::DEFAULT,
        }
    }

    /// Create a cell carrying a full [`TextAttr`].
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, attr: TextAttr) -> Self {
        Self {
            ch: ch as u32,
            style: attr.style,
            pair: attr.pair,
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this cell is visually empty (space, default pair, no style).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.ch == SPACE && self.style.is_empty() && self.pair.is_default()
    }

    /// The Unicode codepoint as a `char`, if valid.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        char::from_u32(self.ch)
    }

    /// The cell's style and pair as one value.
    #[inline]
    #[must_use]
    pub const fn attr(self) -> TextAttr {
        TextAttr {
            style: self.style,
            pair: self.pair,
        }
    }

    // ─── Mutations ────────────────────────────────────────────────────────

    /// Reset this cell to empty.
    #[inline]
    pub const fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Replace the character, keeping style and pair.
    #[inline]
    #[must_use]
    pub const fn with_char(self, ch: char) -> Self {
        Self {
            ch: ch as u32,
            ..self
        }
    }

    /// Replace the style flags.
    #[inline]
    #[must_use]
    pub const fn with_style(self, style: Attr) -> Self {
        Self { style, ..self }
    }

    /// Replace the color pair.
    #[inline]
    #[must_use]
    pub const fn with_pair(self, pair: PairId) -> Self {
        Self { pair, ..self }
    }

    /// Whether two cells have the same styling regardless of character.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.style == other.style && self.pair == other.pair
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = char::from_u32(self.ch).unwrap_or('?');
        write!(f, "Cell({ch:?}")?;
        if !self.pair.is_default() {
            write!(f, ", {:?}", self.pair)?;
        }
        if !self.style.is_empty() {
            write!(f, ", {:?}", self.style)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
