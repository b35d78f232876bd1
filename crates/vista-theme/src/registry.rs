//! Role registry: semantic roles to concrete terminal attributes.
//!
//! The registry owns the color-pair table. Pair 0 is the terminal default
//! pair. Pairs `1..64` form the fixed ANSI grid (`fg * 8 + bg` over the
//! eight base colors). On 256-color terminals the next 54 pairs are an
//! extended grid of cube colors. Everything after that is allocated on
//! demand, monotonically, as roles and dynamic colors ask for it.
//!
//! Terminals that offer 64 pairs or fewer get no dynamic allocation at
//! all: every request is reduced to the nearest base colors and answered
//! from the ANSI grid.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, trace};
use vista_term::cell::{Attr, PairId, TextAttr};
use vista_term::color::{CellColor, Rgb, ansi};

use crate::palette::Palette;
use crate::role::Role;

/// Pairs reserved for the ANSI grid, including the default pair 0.
pub const ANSI_PAIRS: u16 = 64;

/// Size of the extended 256-color grid.
pub const GRID_PAIRS: u16 = 54;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// What the terminal reports it can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TermCaps {
    /// Number of palette colors (`COLORS`).
    pub colors: u16,
    /// Number of color pairs (`COLOR_PAIRS`).
    pub color_pairs: u16,
}

impl TermCaps {
    /// A 256-color terminal with a large pair table.
    pub const XTERM_256: Self = Self {
        colors: 256,
        color_pairs: i16::MAX as u16,
    };

    /// An eight-color terminal with exactly the ANSI grid.
    pub const BASIC: Self = Self {
        colors: 8,
        color_pairs: ANSI_PAIRS,
    };
}

impl Default for TermCaps {
    fn default() -> Self {
        Self::XTERM_256
    }
}

/// User-facing color settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Let the terminal's own foreground and background show through
    /// instead of painting white on black.
    pub default_colors: bool,
    /// Draw body text dimmed.
    pub dim_text: bool,
}

/// How colors are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTier {
    /// At most 64 pairs: fixed ANSI grid only.
    Basic,
    /// Pairs are allocated on demand past the reserved blocks.
    Dynamic,
}

// ---------------------------------------------------------------------------
// Basic highlights
// ---------------------------------------------------------------------------

const BASIC_HL: [(u8, u8, Attr); 8] = [
    (ansi::BLUE, ansi::BLACK, Attr::empty()),
    (ansi::CYAN, ansi::BLACK, Attr::empty()),
    (ansi::GREEN, ansi::BLACK, Attr::empty()),
    (ansi::MAGENTA, ansi::BLACK, Attr::empty()),
    (ansi::BLACK, ansi::WHITE, Attr::empty()),
    (ansi::CYAN, ansi::BLACK, Attr::empty()),
    (ansi::YELLOW, ansi::MAGENTA, Attr::BOLD),
    (ansi::MAGENTA, ansi::CYAN, Attr::BOLD),
];

/// The ANSI grid pair for two base colors.
#[inline]
#[must_use]
pub const fn ansi_pair(fg: u8, bg: u8) -> PairId {
    PairId((fg as u16 & 7) * 8 + (bg as u16 & 7))
}

/// The ANSI grid, then the extended grid when `caps` has room for all of
/// it. Returns the table and the first id left for dynamic pairs.
fn reserved_pairs(caps: TermCaps, settings: ColorSettings) -> (Vec<(CellColor, CellColor)>, u16) {
    let mut pairs = Vec::with_capacity(usize::from(ANSI_PAIRS + GRID_PAIRS));
    pairs.push((CellColor::Default, CellColor::Default));
    for id in 1..ANSI_PAIRS {
        let fg = (id / 8) as u8;
        let bg = (id % 8) as u8;
        pairs.push((CellColor::Ansi256(fg), CellColor::Ansi256(bg)));
    }

    let has_grid = caps.colors >= 256 && caps.color_pairs >= ANSI_PAIRS + GRID_PAIRS;
    if !has_grid {
        return (pairs, ANSI_PAIRS);
    }

    let bg = if settings.default_colors {
        CellColor::Default
    } else {
        CellColor::Ansi256(ansi::BLACK)
    };
    for z in 0..6u8 {
        for x in [1u8, 3, 5] {
            for y in [1u8, 3, 5] {
                pairs.push((CellColor::Ansi256(16 + x + y * 6 + z * 36), bg));
            }
        }
    }
    (pairs, ANSI_PAIRS + GRID_PAIRS)
}

// ---------------------------------------------------------------------------
// RoleRegistry
// ---------------------------------------------------------------------------

/// Maps [`Role`]s to [`TextAttr`]s and owns the color-pair table.
///
/// Not thread-safe by construction: every method that can allocate takes
/// `&mut self`, so callers serialize through ownership.
///
/// ```
/// use vista_theme::{ColorSettings, Palette, Role, RoleRegistry, TermCaps};
///
/// let palette = Palette::xterm();
/// let registry = RoleRegistry::new(&palette, TermCaps::XTERM_256, ColorSettings::default());
/// let error = registry.attrs_for_role(Role::Error);
/// assert!(!error.pair.is_default());
/// ```
#[derive(Debug)]
pub struct RoleRegistry<'p> {
    palette: &'p Palette,
    caps: TermCaps,
    settings: ColorSettings,
    roles: [TextAttr; Role::COUNT],
    /// Indexed by pair id.
    pairs: Vec<(CellColor, CellColor)>,
    /// Dynamic pairs handed out since the last reload.
    reuse: HashMap<(CellColor, CellColor), PairId>,
    /// One past the last reserved pair.
    first_dynamic: u16,
}

impl<'p> RoleRegistry<'p> {
    /// Build the pair table and resolve every role.
    #[must_use]
    pub fn new(palette: &'p Palette, caps: TermCaps, settings: ColorSettings) -> Self {
        let (pairs, first_dynamic) = reserved_pairs(caps, settings);
        let mut registry = Self {
            palette,
            caps,
            settings,
            roles: [TextAttr::NONE; Role::COUNT],
            pairs,
            reuse: HashMap::new(),
            first_dynamic,
        };
        registry.init_roles();
        registry
    }

    /// Rebuild every role from scratch for new capabilities and settings.
    ///
    /// The reserved blocks are laid out again for `caps`, so the extended
    /// grid appears or disappears with it and the tier can change. Dynamic
    /// pairs are dropped and re-allocated from the first slot after the
    /// reserved blocks. Calling this twice with the same inputs yields the
    /// same table.
    pub fn reload(&mut self, caps: TermCaps, settings: ColorSettings) {
        let (pairs, first_dynamic) = reserved_pairs(caps, settings);
        self.caps = caps;
        self.settings = settings;
        self.pairs = pairs;
        self.first_dynamic = first_dynamic;
        self.reuse.clear();
        self.init_roles();
    }

    fn init_roles(&mut self) {
        use ansi::{BLACK, BLUE, CYAN, GREEN, MAGENTA, RED, WHITE, YELLOW};

        let mut text = self.attr_for_colors(WHITE, BLACK);
        if self.settings.dim_text {
            text = text | Attr::DIM;
        }

        let table: [(Role, TextAttr); Role::COUNT] = [
            (Role::Text, text),
            (Role::Search, TextAttr::style(Attr::REVERSE)),
            (Role::Ok, self.attr_for_colors(GREEN, BLACK) | Attr::BOLD),
            (Role::Error, self.attr_for_colors(RED, BLACK) | Attr::BOLD),
            (Role::Warning, self.attr_for_colors(YELLOW, BLACK) | Attr::BOLD),
            (Role::AltRow, text | Attr::BOLD),
            (Role::Hidden, self.attr_for_colors(YELLOW, BLACK)),
            (Role::AdjustedTime, self.attr_for_colors(MAGENTA, BLACK)),
            (Role::SkewedTime, self.attr_for_colors(YELLOW, BLACK) | Attr::UNDERLINE),
            (Role::OffsetTime, self.attr_for_colors(CYAN, BLACK)),
            (Role::Status, self.attr_for_colors(BLACK, WHITE)),
            (Role::WarnStatus, self.attr_for_colors(YELLOW, WHITE) | Attr::BOLD),
            (Role::AlertStatus, self.attr_for_colors(RED, WHITE) | Attr::BOLD),
            (Role::ActiveStatus, self.attr_for_colors(GREEN, WHITE)),
            (Role::ActiveStatus2, self.attr_for_colors(GREEN, WHITE) | Attr::BOLD),
            (Role::BoldStatus, self.attr_for_colors(BLACK, WHITE) | Attr::BOLD),
            (Role::ViewStatus, self.attr_for_colors(WHITE, BLUE) | Attr::BOLD),
            (Role::InactiveStatus, self.inactive_status()),
            (Role::Popup, self.attr_for_colors(WHITE, CYAN) | Attr::BOLD),
            (Role::Keyword, self.attr_for_colors(BLUE, BLACK)),
            (Role::String, self.attr_for_colors(GREEN, BLACK) | Attr::BOLD),
            (Role::Comment, self.attr_for_colors(GREEN, BLACK)),
            (Role::Variable, self.attr_for_colors(CYAN, BLACK)),
            (Role::Symbol, self.attr_for_colors(MAGENTA, BLACK)),
            (Role::ReSpecial, self.attr_for_colors(CYAN, BLACK)),
            (Role::ReRepeat, self.attr_for_colors(YELLOW, BLACK)),
            (Role::File, self.attr_for_colors(BLUE, BLACK)),
            (Role::DiffDelete, self.attr_for_colors(RED, BLACK)),
            (Role::DiffAdd, self.attr_for_colors(GREEN, BLACK)),
            (Role::DiffSection, self.attr_for_colors(MAGENTA, BLACK)),
            (Role::LowThreshold, self.attr_for_colors(BLACK, GREEN)),
            (Role::MedThreshold, self.attr_for_colors(BLACK, YELLOW)),
            (Role::HighThreshold, self.attr_for_colors(BLACK, RED)),
        ];

        for (role, attr) in table {
            self.roles[role.index()] = attr;
        }

        debug!(
            tier = ?self.tier(),
            first_dynamic = self.first_dynamic,
            high_water = self.pairs.len(),
            "role table built"
        );
    }

    /// Palette "White" on palette "Grey37", the way a theme would ask.
    fn inactive_status(&mut self) -> TextAttr {
        let fg = self.palette.parse_color("White").unwrap_or(Rgb::WHITE);
        let bg = self.palette.parse_color("Grey37").unwrap_or(Rgb::new(95, 95, 95));
        TextAttr::pair(self.ensure_color_pair(fg, Some(bg)))
    }

    fn attr_for_colors(&mut self, fg: u8, bg: u8) -> TextAttr {
        TextAttr::pair(self.pair_for_indices(fg, bg))
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The resolved attribute for `role`.
    #[inline]
    #[must_use]
    pub fn attrs_for_role(&self, role: Role) -> TextAttr {
        self.roles[role.index()]
    }

    #[must_use]
    pub const fn tier(&self) -> ColorTier {
        if self.caps.color_pairs <= ANSI_PAIRS {
            ColorTier::Basic
        } else {
            ColorTier::Dynamic
        }
    }

    #[must_use]
    pub const fn caps(&self) -> TermCaps {
        self.caps
    }

    #[must_use]
    pub const fn settings(&self) -> ColorSettings {
        self.settings
    }

    #[must_use]
    pub const fn palette(&self) -> &'p Palette {
        self.palette
    }

    /// The first pair id available for dynamic allocation.
    #[must_use]
    pub const fn first_dynamic_pair(&self) -> PairId {
        PairId(self.first_dynamic)
    }

    /// Number of pair ids in use, reserved blocks included.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// The (fg, bg) a pair was set up with.
    #[must_use]
    pub fn pair_colors(&self, pair: PairId) -> Option<(CellColor, CellColor)> {
        self.pairs.get(usize::from(pair.0)).copied()
    }

    /// Pair `index` of the extended grid, if this terminal has one.
    #[must_use]
    pub fn grid_pair(&self, index: u16) -> Option<PairId> {
        let has_grid = self.first_dynamic > ANSI_PAIRS;
        (has_grid && index < GRID_PAIRS).then_some(PairId(ANSI_PAIRS + index))
    }

    /// One of the eight fixed highlight combinations, cycling past 8.
    #[must_use]
    pub fn basic_highlight(&self, index: usize) -> TextAttr {
        let (fg, bg, style) = BASIC_HL[index % BASIC_HL.len()];
        TextAttr::new(style, ansi_pair(fg, bg))
    }

    // ─── Allocation ──────────────────────────────────────────────────────

    /// A pair showing `fg` on `bg`, matched to the nearest palette colors.
    ///
    /// An unset background means palette black.
    pub fn ensure_color_pair(&mut self, fg: Rgb, bg: Option<Rgb>) -> PairId {
        let fg = self.palette.match_color(fg);
        let bg = bg.map_or(ansi::BLACK, |bg| self.palette.match_color(bg));
        self.pair_for_indices(fg, bg)
    }

    /// A pair showing palette index `fg` on palette index `bg`.
    ///
    /// In the dynamic tier a pair already handed out for the same colors
    /// since the last reload is reused; otherwise the next free id is
    /// taken. When the terminal's pair table is full, or the tier is basic,
    /// both colors are reduced to base colors and the ANSI grid pair is
    /// returned.
    pub fn pair_for_indices(&mut self, fg: u8, bg: u8) -> PairId {
        if self.tier() == ColorTier::Basic {
            return self.basic_pair(fg, bg);
        }

        let colors = self.resolve_defaults(fg, bg);
        if let Some(&pair) = self.reuse.get(&colors) {
            return pair;
        }

        let Some(id) = u16::try_from(self.pairs.len())
            .ok()
            .filter(|&id| id < self.caps.color_pairs)
        else {
            debug!(fg, bg, "color pairs exhausted, using ANSI grid");
            return self.basic_pair(fg, bg);
        };

        let pair = PairId(id);
        trace!(pair = id, fg = ?colors.0, bg = ?colors.1, "allocated color pair");
        self.pairs.push(colors);
        self.reuse.insert(colors, pair);
        pair
    }

    fn basic_pair(&self, fg: u8, bg: u8) -> PairId {
        ansi_pair(self.palette.nearest_basic(fg), self.palette.nearest_basic(bg))
    }

    /// Swap white foregrounds and black backgrounds for the terminal
    /// default when the user asked for default colors.
    fn resolve_defaults(&self, fg: u8, bg: u8) -> (CellColor, CellColor) {
        let dflt = self.settings.default_colors;
        let fg = if dflt && fg == ansi::WHITE {
            CellColor::Default
        } else {
            CellColor::Ansi256(fg)
        };
        let bg = if dflt && bg == ansi::BLACK {
            CellColor::Default
        } else {
            CellColor::Ansi256(bg)
        };
        (fg, bg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
