// SPDX-License-Identifier: MIT
//
// SGR output: turn a FrameBuffer into ANSI escape sequences.
//
// Cells only carry a pair id. Whoever owns the pair table supplies a
// lookup that turns a pair into its (fg, bg) colors; this module only knows
// the byte-level encoding. Attribute state is tracked across a row so runs
// of identically styled cells share one SGR sequence.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).

use std::io::{self, Write};

use crate::buffer::{FrameBuffer, Surface};
use crate::cell::{Attr, Cell, PairId};
use crate::color::CellColor;

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Set the foreground color.
///
/// Uses compact SGR codes for standard colors (30-37, 90-97) and the
/// 256-color extended format for palette indices 16-255.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Ansi256(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 30 + u16::from(idx))
            } else if idx < 16 {
                write!(w, "\x1b[{}m", 82 + u16::from(idx))
            } else {
                write!(w, "\x1b[38;5;{idx}m")
            }
        }
    }
}

/// Set the background color (40–47, 100–107, 48;5;N).
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Ansi256(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 40 + u16::from(idx))
            } else if idx < 16 {
                write!(w, "\x1b[{}m", 92 + u16::from(idx))
            } else {
                write!(w, "\x1b[48;5;{idx}m")
            }
        }
    }
}

/// Emit SGR codes for style flags as a single CSI sequence.
///
/// Does nothing if no flags are set. `STANDOUT` is emitted as bold +
/// reverse, which is what most terminfo entries map it to.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    let mut codes: Vec<&[u8]> = Vec::with_capacity(8);
    if attr.intersects(Attr::BOLD | Attr::STANDOUT) {
        codes.push(b"1");
    }
    if attr.contains(Attr::DIM) {
        codes.push(b"2");
    }
    if attr.contains(Attr::ITALIC) {
        codes.push(b"3");
    }
    if attr.contains(Attr::UNDERLINE) {
        codes.push(b"4");
    }
    if attr.contains(Attr::BLINK) {
        codes.push(b"5");
    }
    // STANDOUT already swaps colors; REVERSE on top of it swaps them back.
    if attr.contains(Attr::REVERSE) != attr.contains(Attr::STANDOUT) {
        codes.push(b"7");
    }
    if attr.contains(Attr::HIDDEN) {
        codes.push(b"8");
    }
    if codes.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    w.write_all(&codes.join(&b';'))?;
    w.write_all(b"m")
}

/// Write every row of `frame` to `w`.
///
/// `pair_colors` resolves a pair id to its (fg, bg); pairs it does not know
/// should map to `(CellColor::Default, CellColor::Default)`.
pub fn write_frame<F>(frame: &FrameBuffer, pair_colors: F, w: &mut impl Write) -> io::Result<()>
where
    F: Fn(PairId) -> (CellColor, CellColor),
{
    for y in 0..frame.height() {
        cursor_to(w, 0, y)?;
        write_row(frame.row(y).unwrap_or_default(), &pair_colors, w)?;
    }
    reset(w)?;
    w.flush()
}

/// Write one row of cells at the current cursor position.
///
/// Ends with an SGR reset so the next row starts from a known state.
pub fn write_row<F>(cells: &[Cell], pair_colors: &F, w: &mut impl Write) -> io::Result<()>
where
    F: Fn(PairId) -> (CellColor, CellColor),
{
    let mut last: Option<Cell> = None;
    let mut utf8 = [0u8; 4];

    for cell in cells {
        if last.is_none_or(|prev| !prev.same_style(cell)) {
            reset(w)?;
            attrs(w, cell.style)?;
            let (f, b) = pair_colors(cell.pair);
            fg(w, f)?;
            bg(w, b)?;
            last = Some(*cell);
        }
        let ch = cell.character().unwrap_or(' ');
        w.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
    }
    reset(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TextAttr;
    use pretty_assertions::assert_eq;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn no_colors(_: PairId) -> (CellColor, CellColor) {
        (CellColor::Default, CellColor::Default)
    }

    #[test]
    fn cursor_is_one_based() {
        assert_eq!(output(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(output(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn fg_encodings() {
        assert_eq!(output(|w| fg(w, CellColor::Ansi256(1))), "\x1b[31m");
        assert_eq!(output(|w| fg(w, CellColor::Ansi256(9))), "\x1b[91m");
        assert_eq!(output(|w| fg(w, CellColor::Ansi256(59))), "\x1b[38;5;59m");
        assert_eq!(output(|w| fg(w, CellColor::Default)), "\x1b[39m");
    }

    #[test]
    fn bg_encodings() {
        assert_eq!(output(|w| bg(w, CellColor::Ansi256(4))), "\x1b[44m");
        assert_eq!(output(|w| bg(w, CellColor::Ansi256(12))), "\x1b[104m");
        assert_eq!(output(|w| bg(w, CellColor::Ansi256(200))), "\x1b[48;5;200m");
        assert_eq!(output(|w| bg(w, CellColor::Default)), "\x1b[49m");
    }

    #[test]
    fn attrs_combined() {
        assert_eq!(output(|w| attrs(w, Attr::BOLD | Attr::UNDERLINE)), "\x1b[1;4m");
        assert_eq!(output(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn standout_is_bold_reverse() {
        assert_eq!(output(|w| attrs(w, Attr::STANDOUT)), "\x1b[1;7m");
    }

    #[test]
    fn standout_with_reverse_is_bold_only() {
        assert_eq!(output(|w| attrs(w, Attr::STANDOUT | Attr::REVERSE)), "\x1b[1m");
    }

    #[test]
    fn row_shares_sgr_between_equal_cells() {
        let cells = [Cell::new('a'), Cell::new('b')];
        let s = output(|w| write_row(&cells, &no_colors, w));
        assert_eq!(s, "\x1b[0m\x1b[39m\x1b[49mab\x1b[0m");
    }

    #[test]
    fn row_switches_on_style_change() {
        let cells = [
            Cell::new('a'),
            Cell::styled('b', TextAttr::style(Attr::BOLD)),
        ];
        let s = output(|w| write_row(&cells, &no_colors, w));
        assert!(s.contains("a\x1b[0m\x1b[1m\x1b[39m\x1b[49mb"), "{s:?}");
    }

    #[test]
    fn frame_uses_pair_lookup() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.put_str(0, 0, &['x'], TextAttr::pair(PairId(3)));
        let lookup = |p: PairId| {
            if p == PairId(3) {
                (CellColor::Ansi256(2), CellColor::Ansi256(0))
            } else {
                (CellColor::Default, CellColor::Default)
            }
        };
        let s = output(|w| write_frame(&frame, lookup, w));
        assert!(s.contains("\x1b[32m\x1b[40mx"), "{s:?}");
    }
}
