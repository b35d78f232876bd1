//! Errors raised while building a palette or parsing color text.

/// A color string that could not be turned into an [`Rgb`](vista_term::color::Rgb).
///
/// Never fatal. Callers usually fall back to leaving the color unset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// Starts with `#` but is not `#RGB` or `#RRGGBB`.
    #[error("Could not parse color: {0}")]
    Malformed(String),

    /// Not a hex color and not the exact name of any palette entry.
    #[error(
        "Unknown color: {0}.  See https://jonasjacek.github.io/colors/ for a list of supported color names"
    )]
    UnknownName(String),
}

/// A palette table that cannot be used for matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    #[error("palette table is empty")]
    Empty,

    #[error("palette table lists color id {0} more than once")]
    DuplicateId(u8),
}
