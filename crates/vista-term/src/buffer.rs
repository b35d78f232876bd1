// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid that lines are painted into.
//
// The line renderer never talks to a physical terminal. It talks to a
// `Surface`: something that can write a run of characters with one
// attribute, draw a horizontal run of a single character, and read back or
// overwrite a run of cells. Those are the only primitives compositing
// needs, and every one of them always succeeds: writes that fall outside
// the surface are clipped silently.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing for cache efficiency.
//     A row's cells are contiguous in memory, so left-to-right iteration
//     (which the renderer does) is a linear scan.
//
//   - Every column holds exactly one display glyph. Multi-byte characters
//     have already been folded to one column by the time they arrive here.

use crate::cell::{Cell, TextAttr};

// ─── Surface ─────────────────────────────────────────────────────────────────

/// The terminal-drawing boundary used by the line renderer.
///
/// Coordinates are 0-indexed `(x, y)` = `(column, row)`. Implementations
/// clip anything outside their bounds.
pub trait Surface {
    /// Surface width in columns.
    fn width(&self) -> u16;

    /// Surface height in rows.
    fn height(&self) -> u16;

    /// Write `text` starting at `(x, y)`, one character per column, every
    /// cell taking `attr`.
    fn put_str(&mut self, x: u16, y: u16, text: &[char], attr: TextAttr);

    /// Write `count` copies of `ch` starting at `(x, y)` with `attr`.
    fn hline(&mut self, x: u16, y: u16, ch: char, count: usize, attr: TextAttr);

    /// Read up to `len` cells starting at `(x, y)`.
    ///
    /// The result is shorter than `len` when the run crosses the right
    /// edge, and empty when `(x, y)` is out of bounds.
    fn read_cells(&self, x: u16, y: u16, len: usize) -> Vec<Cell>;

    /// Overwrite cells starting at `(x, y)`.
    fn write_cells(&mut self, x: u16, y: u16, cells: &[Cell]);
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// An in-memory grid of [`Cell`]s.
///
/// # Examples
///
/// ```
/// use vista_term::buffer::{FrameBuffer, Surface};
/// use vista_term::cell::TextAttr;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.put_str(5, 3, &['h', 'i'], TextAttr::NONE);
/// assert_eq!(buf.get(6, 3).unwrap().character(), Some('i'));
/// assert_eq!(buf.row_text(3).trim(), "hi");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Convert `(x, y)` to a flat index.
    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of a row as a `String` (for tests and debugging).
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|row| row.iter().map(|c| c.character().unwrap_or('?')).collect())
            .unwrap_or_default()
    }

    /// Clear the buffer to empty cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// The cell-index range `[start, end)` of a horizontal run starting at
    /// `(x, y)`, clipped to the row. `None` when nothing is visible.
    fn run(&self, x: u16, y: u16, len: usize) -> Option<(usize, usize)> {
        if !self.in_bounds(x, y) || len == 0 {
            return None;
        }
        let visible = len.min(usize::from(self.width - x));
        let start = self.index(x, y);
        Some((start, start + visible))
    }
}

impl Surface for FrameBuffer {
    #[inline]
    fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    fn height(&self) -> u16 {
        self.height
    }

    fn put_str(&mut self, x: u16, y: u16, text: &[char], attr: TextAttr) {
        let Some((start, end)) = self.run(x, y, text.len()) else {
            return;
        };
        for (cell, &ch) in self.cells[start..end].iter_mut().zip(text) {
            *cell = Cell::styled(ch, attr);
        }
    }

    fn hline(&mut self, x: u16, y: u16, ch: char, count: usize, attr: TextAttr) {
        let Some((start, end)) = self.run(x, y, count) else {
            return;
        };
        self.cells[start..end].fill(Cell::styled(ch, attr));
    }

    fn read_cells(&self, x: u16, y: u16, len: usize) -> Vec<Cell> {
        self.run(x, y, len)
            .map(|(start, end)| self.cells[start..end].to_vec())
            .unwrap_or_default()
    }

    fn write_cells(&mut self, x: u16, y: u16, cells: &[Cell]) {
        let Some((start, end)) = self.run(x, y, cells.len()) else {
            return;
        };
        self.cells[start..end].copy_from_slice(&cells[..end - start]);
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Attr, PairId};
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_cells_are_empty() {
        let buf = FrameBuffer::new(10, 5);
        for y in 0..5 {
            assert!(buf.row(y).unwrap().iter().all(|c| c.is_empty()));
        }
    }

    #[test]
    fn zero_size_buffer() {
        let buf = FrameBuffer::new(0, 0);
        assert!(buf.get(0, 0).is_none());
        assert!(buf.read_cells(0, 0, 4).is_empty());
    }

    // ── put_str ─────────────────────────────────────────────────────────

    #[test]
    fn put_str_writes_attr() {
        let mut buf = FrameBuffer::new(10, 1);
        let attr = TextAttr::new(Attr::BOLD, PairId(3));
        buf.put_str(2, 0, &chars("abc"), attr);
        assert_eq!(buf.row_text(0), "  abc     ");
        assert_eq!(buf.get(3, 0).unwrap().attr(), attr);
        assert!(buf.get(5, 0).unwrap().is_empty());
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(2, 0, &chars("abcdef"), TextAttr::NONE);
        assert_eq!(buf.row_text(0), "  ab");
    }

    #[test]
    fn put_str_out_of_bounds_is_ignored() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(4, 0, &chars("x"), TextAttr::NONE);
        buf.put_str(0, 1, &chars("x"), TextAttr::NONE);
        assert_eq!(buf.row_text(0), "    ");
    }

    // ── hline ───────────────────────────────────────────────────────────

    #[test]
    fn hline_fills_run() {
        let mut buf = FrameBuffer::new(6, 1);
        buf.hline(1, 0, '-', 3, TextAttr::style(Attr::DIM));
        assert_eq!(buf.row_text(0), " ---  ");
        assert_eq!(buf.get(2, 0).unwrap().style, Attr::DIM);
    }

    #[test]
    fn hline_zero_count_is_noop() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.hline(0, 0, '-', 0, TextAttr::NONE);
        assert_eq!(buf.row_text(0), "   ");
    }

    // ── read / write ────────────────────────────────────────────────────

    #[test]
    fn read_then_write_roundtrips() {
        let mut buf = FrameBuffer::new(8, 2);
        buf.put_str(0, 1, &chars("hello"), TextAttr::pair(PairId(5)));
        let mut cells = buf.read_cells(1, 1, 3);
        assert_eq!(cells.len(), 3);
        for cell in &mut cells {
            cell.style |= Attr::UNDERLINE;
        }
        buf.write_cells(1, 1, &cells);
        assert_eq!(buf.row_text(1), "hello   ");
        assert_eq!(buf.get(0, 1).unwrap().style, Attr::empty());
        assert_eq!(buf.get(2, 1).unwrap().style, Attr::UNDERLINE);
        assert_eq!(buf.get(2, 1).unwrap().pair, PairId(5));
    }

    #[test]
    fn read_cells_truncates_at_edge() {
        let buf = FrameBuffer::new(5, 1);
        assert_eq!(buf.read_cells(3, 0, 10).len(), 2);
    }

    #[test]
    fn write_cells_clips_at_edge() {
        let mut buf = FrameBuffer::new(3, 1);
        let cells = [Cell::new('a'), Cell::new('b'), Cell::new('c'), Cell::new('d')];
        buf.write_cells(1, 0, &cells);
        assert_eq!(buf.row_text(0), " ab");
    }

    #[test]
    fn clear_resets() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.put_str(0, 0, &chars("abc"), TextAttr::style(Attr::BOLD));
        buf.clear();
        assert!(buf.row(0).unwrap().iter().all(|c| c.is_empty()));
    }
}
