//! The reference palette and nearest-color matching.
//!
//! A `Palette` is the fixed table of colors the output device can show
//! natively, each entry carrying its precomputed L*a*b* value. Arbitrary
//! RGB input is flattened to a palette id by a linear scan for the lowest
//! CIE94 distance. The scan is O(entries) per call; it runs once per
//! distinct color, never per cell.

use serde::Deserialize;
use vista_term::color::{Lab, Rgb, ansi};

use crate::error::{ColorParseError, PaletteError};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One row of a palette table, as the external loader supplies it.
///
/// Field names follow the xterm palette JSON (`colorId`, `name`,
/// `rgb: {r, g, b}`), so a parsed table can be handed straight to
/// [`Palette::new`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaletteSpec {
    #[serde(rename = "colorId")]
    pub id: u8,
    pub name: String,
    pub rgb: Rgb,
}

/// A palette color with its Lab value computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    /// The terminal's native color index.
    pub id: u8,
    pub name: String,
    pub rgb: Rgb,
    pub lab: Lab,
}

impl From<PaletteSpec> for PaletteEntry {
    fn from(spec: PaletteSpec) -> Self {
        Self {
            id: spec.id,
            lab: spec.rgb.to_lab(),
            name: spec.name,
            rgb: spec.rgb,
        }
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An immutable, ordered table of reference colors.
///
/// Iteration order is the order the table was supplied in. Matching ties
/// go to the entry that comes first.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette from loader rows.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Empty`] if there are no rows, and
    /// [`PaletteError::DuplicateId`] if two rows share a color id.
    pub fn new(specs: impl IntoIterator<Item = PaletteSpec>) -> Result<Self, PaletteError> {
        let mut seen = [false; 256];
        let mut entries = Vec::new();

        for spec in specs {
            let slot = &mut seen[usize::from(spec.id)];
            if *slot {
                return Err(PaletteError::DuplicateId(spec.id));
            }
            *slot = true;
            entries.push(PaletteEntry::from(spec));
        }

        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { entries })
    }

    /// Wrap entries the caller already knows to be non-empty and unique.
    pub(crate) const fn from_entries(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// All entries, in table order.
    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: construction rejects empty tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry with color id `id`.
    #[must_use]
    pub fn get(&self, id: u8) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The first entry whose name is exactly `name` (case-sensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The id of the entry perceptually closest to `target`.
    #[must_use]
    pub fn match_color(&self, target: Rgb) -> u8 {
        self.nearest(target.to_lab(), |_| true)
    }

    /// Reduce a palette index to the closest of the eight base colors.
    ///
    /// Indices already below 8 are returned unchanged. An index the table
    /// does not list is measured by its xterm-256 RGB value.
    #[must_use]
    pub fn nearest_basic(&self, id: u8) -> u8 {
        if id < 8 {
            return id;
        }
        let lab = self
            .get(id)
            .map_or_else(|| Rgb::from(ansi::ansi256_to_rgb(id)).to_lab(), |e| e.lab);
        let basic = self.nearest(lab, |e| e.id < 8);
        if basic < 8 { basic } else { ansi::WHITE }
    }

    /// Linear scan over the entries accepted by `filter`.
    ///
    /// The entry is always the first operand of `delta_e`, so its chroma
    /// weights the distance. Returns the first entry's id if `filter`
    /// rejects everything.
    fn nearest(&self, target: Lab, filter: impl Fn(&PaletteEntry) -> bool) -> u8 {
        let mut best: Option<(u8, f64)> = None;

        for entry in self.entries.iter().filter(|e| filter(e)) {
            let delta = entry.lab.delta_e(target);
            if best.is_none_or(|(_, lowest)| delta < lowest) {
                best = Some((entry.id, delta));
            }
        }

        best.map_or(self.entries[0].id, |(id, _)| id)
    }

    /// Parse color text: `#RGB`, `#RRGGBB`, or an exact entry name.
    ///
    /// ```
    /// use vista_term::color::Rgb;
    /// use vista_theme::Palette;
    ///
    /// let palette = Palette::xterm();
    /// assert_eq!(palette.parse_color("#f00"), Ok(Rgb::new(255, 0, 0)));
    /// assert_eq!(palette.parse_color("Grey37"), Ok(Rgb::new(95, 95, 95)));
    /// assert!(palette.parse_color("grey37").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`ColorParseError::Malformed`] for `#` text of the wrong length or
    /// with bad digits, [`ColorParseError::UnknownName`] otherwise.
    pub fn parse_color(&self, text: &str) -> Result<Rgb, ColorParseError> {
        if text.starts_with('#') {
            return Rgb::from_hex(text).ok_or_else(|| ColorParseError::Malformed(text.to_owned()));
        }

        self.by_name(text)
            .map(|e| e.rgb)
            .ok_or_else(|| ColorParseError::UnknownName(text.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
