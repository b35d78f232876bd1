// SPDX-License-Identifier: MIT
//
// vista-term color system: RGB input, CIE L*a*b* for matching.
//
// Single-character variable names (r, g, b, l, a, x, y, z) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference implementations.
#![allow(clippy::many_single_char_names)]
//
// Terminals cannot show arbitrary colors. Themes and log files speak in
// 24-bit RGB; the output device speaks in palette indices. This module
// holds the math that bridges the two:
//
//   Rgb (8-bit sRGB) → linear sRGB → XYZ (D65) → L*a*b* → ΔE (CIE94)
//
// Lab values exist only to be compared. Nothing here ever renders a Lab
// color directly, so there is no inverse transform.

use std::fmt;

use serde::Deserialize;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An 8-bit-per-channel sRGB color.
///
/// "No color specified" is modelled as `Option<Rgb>::None` at the call
/// sites that need it (an unset background, for example).
///
/// # Examples
///
/// ```
/// use vista_term::color::Rgb;
///
/// let red = Rgb::from_hex("#f00").unwrap();
/// assert_eq!(red, Rgb::new(255, 0, 0));
/// assert_eq!(red.to_hex(), "#ff0000");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`.
    ///
    /// The leading `#` is required and the total length must be exactly 4
    /// or 7 bytes. Each nibble of the short form is duplicated, so `#f80`
    /// is `#ff8800`. Returns `None` for anything else; callers that need a
    /// message build it from the input text.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?.as_bytes();

        match digits.len() {
            3 => {
                let r = parse_hex_digit(digits[0])?;
                let g = parse_hex_digit(digits[1])?;
                let b = parse_hex_digit(digits[2])?;
                Some(Self::new(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&digits[0..2])?;
                let g = parse_hex_byte(&digits[2..4])?;
                let b = parse_hex_byte(&digits[4..6])?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Format as lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to CIE L*a*b*.
    #[inline]
    #[must_use]
    pub fn to_lab(self) -> Lab {
        Lab::from(self)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({})", self.to_hex())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Lab ─────────────────────────────────────────────────────────────────────

/// D65 reference white.
const XN: f64 = 0.950_47;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_83;

/// A color in CIE L*a*b* space, used purely for distance comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness, 0 (black) to 100 (diffuse white).
    pub l: f64,
    /// Green (negative) to red (positive).
    pub a: f64,
    /// Blue (negative) to yellow (positive).
    pub b: f64,
}

impl Lab {
    /// Chroma: distance from the neutral axis.
    #[inline]
    #[must_use]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Perceptual distance from `self` to `other` (CIE94, graphic arts).
    ///
    /// The chroma weighting uses `self`, so the metric is only symmetric
    /// when both colors have the same chroma. When matching against a
    /// palette, call it on the palette entry.
    #[must_use]
    pub fn delta_e(self, other: Self) -> f64 {
        let delta_l = self.l - other.l;
        let delta_a = self.a - other.a;
        let delta_b = self.b - other.b;
        let c1 = self.chroma();
        let c2 = other.chroma();
        let delta_c = c1 - c2;

        let delta_h_sq = delta_c.mul_add(-delta_c, delta_a.mul_add(delta_a, delta_b * delta_b));
        let delta_h = if delta_h_sq < 0.0 { 0.0 } else { delta_h_sq.sqrt() };

        let sc = 0.045f64.mul_add(c1, 1.0);
        let sh = 0.015f64.mul_add(c1, 1.0);

        let dc = delta_c / sc;
        let dh = delta_h / sh;
        let sum = dh.mul_add(dh, delta_l.mul_add(delta_l, dc * dc));
        if sum < 0.0 { 0.0 } else { sum.sqrt() }
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(f64::from(rgb.r) / 255.0);
        let g = srgb_to_linear(f64::from(rgb.g) / 255.0);
        let b = srgb_to_linear(f64::from(rgb.b) / 255.0);

        let x = 0.1805f64.mul_add(b, 0.4124f64.mul_add(r, 0.3576 * g)) / XN;
        let y = 0.0722f64.mul_add(b, 0.2126f64.mul_add(r, 0.7152 * g)) / YN;
        let z = 0.9505f64.mul_add(b, 0.0193f64.mul_add(r, 0.1192 * g)) / ZN;

        let fx = lab_f(x);
        let fy = lab_f(y);
        let fz = lab_f(z);

        Self {
            l: 116.0f64.mul_add(fy, -16.0),
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

/// Remove the sRGB transfer curve from one channel (0.0–1.0).
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c > 0.040_45 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// The XYZ → Lab companding function, with the linear toe below ε.
#[inline]
fn lab_f(t: f64) -> f64 {
    if t > 0.008_856 {
        t.cbrt()
    } else {
        7.787f64.mul_add(t, 16.0 / 116.0)
    }
}

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A color as the terminal understands it inside a color pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// An index into the terminal's 256-color palette.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// The palette index, or `None` for the terminal default.
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Ansi256(idx) => Some(idx),
            Self::Default => None,
        }
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── ANSI Palette ────────────────────────────────────────────────────────────

pub mod ansi {
    //! The eight curses base colors and the xterm-256 index layout.
    //!
    //! - Colors 0–7: Standard colors (black, red, green, yellow, blue, magenta, cyan, white)
    //! - Colors 8–15: Bright variants of the standard colors
    //! - Colors 16–231: A 6×6×6 RGB color cube
    //! - Colors 232–255: A 24-step grayscale ramp

    pub const BLACK: u8 = 0;
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;

    /// The xterm defaults for the first sixteen entries.
    pub const ANSI16_RGB: [(u8, u8, u8); 16] = [
        (0, 0, 0),       // 0: Black
        (128, 0, 0),     // 1: Maroon
        (0, 128, 0),     // 2: Green
        (128, 128, 0),   // 3: Olive
        (0, 0, 128),     // 4: Navy
        (128, 0, 128),   // 5: Purple
        (0, 128, 128),   // 6: Teal
        (192, 192, 192), // 7: Silver
        (128, 128, 128), // 8: Grey
        (255, 0, 0),     // 9: Red
        (0, 255, 0),     // 10: Lime
        (255, 255, 0),   // 11: Yellow
        (0, 0, 255),     // 12: Blue
        (255, 0, 255),   // 13: Fuchsia
        (0, 255, 255),   // 14: Aqua
        (255, 255, 255), // 15: White
    ];

    /// Convert an xterm-256 palette index to RGB values.
    #[must_use]
    pub fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
        match idx {
            0..=15 => ANSI16_RGB[idx as usize],

            16..=231 => {
                let idx = idx - 16;
                let r_idx = idx / 36;
                let g_idx = (idx % 36) / 6;
                let b_idx = idx % 6;

                // The cube uses: 0, 95, 135, 175, 215, 255
                let to_value = |i: u8| -> u8 {
                    if i == 0 { 0 } else { 55 + 40 * i }
                };

                (to_value(r_idx), to_value(g_idx), to_value(b_idx))
            }

            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                (v, v, v)
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
