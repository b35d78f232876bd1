//! Line renderer: one attributed line into one surface row.
//!
//! Painting happens in display columns, not bytes. The renderer first
//! expands the line: tabs become spaces up to the next multiple of
//! [`TAB_STOP`], `\r` disappears, `\n` becomes a space, and each multi-byte
//! character becomes a single column. Every byte offset where that changed
//! the column count leaves an [`Adjustment`], and attribute ranges are
//! moved into column space by summing the adjustments in front of them.
//!
//! Compositing, in order:
//!
//! 1. The visible slice is written with the base role's attribute and the
//!    rest of the window is padded with spaces.
//! 2. Attributes are applied sorted by `(start, end)`; the sort is stable,
//!    so equal ranges apply in insertion order. `Graphic` replaces the
//!    glyph. `Style` merges into the cell immediately. `Foreground` and
//!    `Background` only fill per-column index arrays.
//! 3. If any color index was recorded, every column in the window gets the
//!    pair for its (fg, bg) indices, unset ones defaulting to white on
//!    black.

use tracing::warn;
use vista_term::buffer::Surface;
use vista_term::cell::{Attr, TextAttr};
use vista_term::color::ansi;
use vista_theme::{Role, RoleRegistry};

use crate::attr_line::{AttrLine, AttrValue, RangeError};
use crate::range::LineRange;

/// Tab stops fall on multiples of this many columns.
pub const TAB_STOP: usize = 8;

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// A change in column count at a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    /// Byte offset of the character that caused it.
    pub origin: usize,
    /// Columns gained (tabs) or lost (multi-byte characters, `\r`).
    pub delta: isize,
}

/// A line laid out in display columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedLine {
    /// One glyph per display column.
    pub glyphs: Vec<char>,
    /// In increasing `origin` order.
    pub adjustments: Vec<Adjustment>,
}

impl ExpandedLine {
    /// Width in display columns.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.glyphs.len()
    }

    /// The display column of byte offset `offset`.
    #[must_use]
    pub fn column_of(&self, offset: usize) -> isize {
        let shift: isize = self
            .adjustments
            .iter()
            .take_while(|adj| adj.origin < offset)
            .map(|adj| adj.delta)
            .sum();
        signed(offset) + shift
    }
}

/// Lay `text` out in display columns.
///
/// ```
/// use vista_view::render::expand_line;
///
/// let line = expand_line("a\tb");
/// assert_eq!(line.width(), 9);
/// assert_eq!(line.column_of(2), 8);
/// ```
#[must_use]
pub fn expand_line(text: &str) -> ExpandedLine {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut adjustments = Vec::new();

    for (origin, ch) in text.char_indices() {
        match ch {
            '\t' => {
                let spaces = TAB_STOP - glyphs.len() % TAB_STOP;
                glyphs.extend(std::iter::repeat_n(' ', spaces));
                if spaces > 1 {
                    adjustments.push(Adjustment {
                        origin,
                        delta: signed(spaces - 1),
                    });
                }
            }
            '\r' => adjustments.push(Adjustment { origin, delta: -1 }),
            '\n' => glyphs.push(' '),
            _ => {
                glyphs.push(ch);
                let len = ch.len_utf8();
                if len > 1 {
                    adjustments.push(Adjustment {
                        origin,
                        delta: 1 - signed(len),
                    });
                }
            }
        }
    }

    ExpandedLine {
        glyphs,
        adjustments,
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a line was not painted. Nothing is written when any of these occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("visible window {0} has no end")]
    OpenWindow(LineRange),

    #[error("visible window {0} is inverted")]
    InvertedWindow(LineRange),

    #[error(transparent)]
    Range(#[from] RangeError),
}

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

#[inline]
fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// Surface column `x + offset`, if it is addressable.
#[inline]
fn column(x: u16, offset: usize) -> Option<u16> {
    u16::try_from(usize::from(x) + offset).ok()
}

fn check_window(window: LineRange) -> Result<(usize, usize), RenderError> {
    let end = window.end.ok_or(RenderError::OpenWindow(window))?;
    if window.start > end {
        return Err(RenderError::InvertedWindow(window));
    }
    Ok((window.start, end))
}

/// Move a byte range into window-relative columns `[start, end)`.
///
/// Returns `None` when nothing of it is visible.
fn clip(
    expanded: &ExpandedLine,
    range: LineRange,
    lr_start: usize,
    line_width: usize,
) -> Option<(usize, usize)> {
    let left = signed(lr_start);
    let width = signed(line_width);

    let start = (expanded.column_of(range.start) - left).max(0);
    let end = range
        .end
        .map_or(width, |end| (expanded.column_of(end) - left).min(width));

    if end <= start {
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(end).ok()?))
}

/// Merge a style attribute into a run of cells.
///
/// Reverse on both the cell and the attribute cancels out. A pair on the
/// attribute replaces the cell's pair; pair 0 leaves it alone.
fn apply_style(surface: &mut impl Surface, x: u16, y: u16, len: usize, attr: TextAttr) {
    let mut cells = surface.read_cells(x, y, len);
    for cell in &mut cells {
        let double_reverse = cell.style.contains(Attr::REVERSE) && attr.style.contains(Attr::REVERSE);
        cell.style |= attr.style;
        if !attr.pair.is_default() {
            cell.pair = attr.pair;
        }
        if double_reverse {
            cell.style.remove(Attr::REVERSE);
        }
    }
    surface.write_cells(x, y, &cells);
}

/// Paint the display columns `window` of `line` at `(x, y)`.
///
/// `window` is in display columns and must be closed. Column `window.start`
/// of the expanded line lands on surface column `x`. `base_role` styles
/// everything before attributes are applied. Colors recorded by
/// `Foreground`/`Background` attributes are turned into pairs through
/// `registry`, which may allocate. Only the columns between `x` and the
/// surface's right edge are composited, however wide `window` is.
///
/// # Errors
///
/// [`RenderError`] if the window is open or inverted, or if any attribute
/// range does not fit the line. The surface is untouched in that case.
pub fn paint_line(
    surface: &mut impl Surface,
    registry: &mut RoleRegistry<'_>,
    y: u16,
    x: u16,
    line: &AttrLine,
    window: LineRange,
    base_role: Role,
) -> Result<(), RenderError> {
    let checked = check_window(window).and_then(|w| {
        line.validate()?;
        Ok(w)
    });
    let (lr_start, lr_end) = match checked {
        Ok(w) => w,
        Err(err) => {
            warn!(%err, y, "line rejected");
            return Err(err);
        }
    };
    // Columns past the surface's right edge are never composited.
    let room = usize::from(surface.width().saturating_sub(x));
    let line_width = (lr_end - lr_start).min(room);
    let lr_end = lr_start + line_width;
    let expanded = expand_line(line.text());
    let base = registry.attrs_for_role(base_role);

    // 1. Base text and padding.
    let glyphs = &expanded.glyphs;
    let visible: &[char] = if lr_start < glyphs.len() {
        &glyphs[lr_start..lr_end.min(glyphs.len())]
    } else {
        &[]
    };
    surface.put_str(x, y, visible, base);
    if let Some(pad_x) = column(x, visible.len()) {
        surface.hline(pad_x, y, ' ', line_width - visible.len(), base);
    }

    // 2. Attributes in (start, end) order.
    let mut order: Vec<_> = line.attrs().iter().collect();
    order.sort_by_key(|attr| (attr.range.start, attr.range.end.unwrap_or(usize::MAX)));

    let mut fg: Option<Vec<u8>> = None;
    let mut bg: Option<Vec<u8>> = None;

    for attr in order {
        if matches!(attr.value, AttrValue::Custom { .. }) {
            continue;
        }
        let Some((start, end)) = clip(&expanded, attr.range, lr_start, line_width) else {
            continue;
        };

        match attr.value {
            AttrValue::Graphic(ch) => {
                let Some(cx) = column(x, start) else { continue };
                let cells: Vec<_> = surface
                    .read_cells(cx, y, end - start)
                    .into_iter()
                    .map(|cell| cell.with_char(ch))
                    .collect();
                surface.write_cells(cx, y, &cells);
            }
            AttrValue::Foreground(idx) => {
                fg.get_or_insert_with(|| vec![ansi::WHITE; line_width])[start..end].fill(idx);
            }
            AttrValue::Background(idx) => {
                bg.get_or_insert_with(|| vec![ansi::BLACK; line_width])[start..end].fill(idx);
            }
            AttrValue::Style(style) => {
                if style.is_noop() {
                    continue;
                }
                if let Some(cx) = column(x, start) {
                    apply_style(surface, cx, y, end - start, style);
                }
            }
            AttrValue::Custom { .. } => {}
        }
    }

    // 3. Flatten color indices into pairs.
    if fg.is_some() || bg.is_some() {
        let fg = fg.unwrap_or_else(|| vec![ansi::WHITE; line_width]);
        let bg = bg.unwrap_or_else(|| vec![ansi::BLACK; line_width]);
        let mut cells = surface.read_cells(x, y, line_width);
        for (cell, (&f, &b)) in cells.iter_mut().zip(fg.iter().zip(&bg)) {
            cell.pair = registry.pair_for_indices(f, b);
        }
        surface.write_cells(x, y, &cells);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vista_term::buffer::FrameBuffer;
    use vista_term::cell::PairId;
    use vista_term::color::CellColor;
    use vista_theme::{ColorSettings, Palette, TermCaps};

    fn registry(palette: &Palette) -> RoleRegistry<'_> {
        RoleRegistry::new(palette, TermCaps::XTERM_256, ColorSettings::default())
    }

    fn paint(line: &AttrLine, window: LineRange, width: u16) -> (FrameBuffer, Result<(), RenderError>) {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(width, 1);
        let result = paint_line(&mut frame, &mut reg, 0, 0, line, window, Role::Text);
        (frame, result)
    }

    fn style_at(frame: &FrameBuffer, x: u16) -> Attr {
        frame.get(x, 0).unwrap().style
    }

    // -- Expansion -----------------------------------------------------------

    #[test]
    fn expand_plain_ascii() {
        let line = expand_line("abc");
        assert_eq!(line.glyphs, ['a', 'b', 'c']);
        assert!(line.adjustments.is_empty());
    }

    #[test]
    fn expand_tab_to_next_stop() {
        let line = expand_line("ab\tc");
        assert_eq!(line.width(), 9);
        assert_eq!(line.adjustments, [Adjustment { origin: 2, delta: 5 }]);
        assert_eq!(line.column_of(3), 8);
    }

    #[test]
    fn expand_tab_on_stop_is_full_width() {
        let line = expand_line("\t");
        assert_eq!(line.width(), 8);
        assert_eq!(line.adjustments, [Adjustment { origin: 0, delta: 7 }]);
    }

    #[test]
    fn tab_after_multibyte_uses_display_column() {
        // 'é' is two bytes but one column, so the tab fills columns 1..8.
        let line = expand_line("é\tx");
        assert_eq!(line.width(), 9);
        assert_eq!(line.column_of(3), 8);
    }

    #[test]
    fn expand_multibyte_is_one_column() {
        let line = expand_line("a€b");
        assert_eq!(line.glyphs, ['a', '€', 'b']);
        assert_eq!(line.adjustments, [Adjustment { origin: 1, delta: -2 }]);
        assert_eq!(line.column_of(4), 2);
    }

    #[test]
    fn expand_cr_dropped_and_newline_is_space() {
        let line = expand_line("a\r\nb");
        assert_eq!(line.glyphs, ['a', ' ', 'b']);
        assert_eq!(line.column_of(3), 2);
    }

    // -- Base paint ----------------------------------------------------------

    #[test]
    fn paints_text_with_base_role_and_pads() {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let text_attr = reg.attrs_for_role(Role::Text);
        let mut frame = FrameBuffer::new(8, 1);
        paint_line(&mut frame, &mut reg, 0, 1, &AttrLine::from("ab"), LineRange::new(0, 5), Role::Text).unwrap();

        assert_eq!(frame.row_text(0), " ab     ");
        for x in 1..6 {
            assert_eq!(frame.get(x, 0).unwrap().attr(), text_attr);
        }
        assert!(frame.get(0, 0).unwrap().is_empty());
        assert!(frame.get(6, 0).unwrap().is_empty());
    }

    #[test]
    fn window_scrolls_horizontally() {
        let line = AttrLine::from("0123456789").with_attr(LineRange::new(5, 9), AttrValue::Style(TextAttr::style(Attr::BOLD)));
        let (frame, result) = paint(&line, LineRange::new(3, 7), 4);
        result.unwrap();
        assert_eq!(frame.row_text(0), "3456");
        assert!(!style_at(&frame, 1).contains(Attr::BOLD));
        assert!(style_at(&frame, 2).contains(Attr::BOLD));
        assert!(style_at(&frame, 3).contains(Attr::BOLD));
    }

    #[test]
    fn window_past_text_is_all_padding() {
        let (frame, result) = paint(&AttrLine::from("abc"), LineRange::new(5, 8), 3);
        result.unwrap();
        assert_eq!(frame.row_text(0), "   ");
        assert!(!frame.get(0, 0).unwrap().is_empty());
    }

    #[test]
    fn zero_width_window_is_noop() {
        let line = AttrLine::from("abc").with_attr(LineRange::new(0, 3), AttrValue::Foreground(2));
        let (frame, result) = paint(&line, LineRange::new(1, 1), 4);
        result.unwrap();
        assert!(frame.row(0).unwrap().iter().all(|c| c.is_empty()));
    }

    // -- Column mapping ------------------------------------------------------

    #[test]
    fn style_after_three_byte_char_lands_on_display_column() {
        let line = AttrLine::from("€abc").with_attr(LineRange::new(3, 4), AttrValue::Style(TextAttr::style(Attr::BOLD)));
        let (frame, result) = paint(&line, LineRange::new(0, 6), 6);
        result.unwrap();
        assert_eq!(frame.row_text(0), "€abc  ");
        assert!(!style_at(&frame, 0).contains(Attr::BOLD));
        assert!(style_at(&frame, 1).contains(Attr::BOLD));
        assert!(!style_at(&frame, 2).contains(Attr::BOLD));
    }

    #[test]
    fn style_after_two_byte_char_is_one_column_left() {
        let line = AttrLine::from("éabc").with_attr(LineRange::new(2, 3), AttrValue::Style(TextAttr::style(Attr::UNDERLINE)));
        let (frame, result) = paint(&line, LineRange::new(0, 4), 4);
        result.unwrap();
        assert!(style_at(&frame, 1).contains(Attr::UNDERLINE));
        assert!(!style_at(&frame, 2).contains(Attr::UNDERLINE));
    }

    #[test]
    fn style_after_tab_lands_past_spaces() {
        let line = AttrLine::from("a\tb").with_attr(LineRange::new(2, 3), AttrValue::Style(TextAttr::style(Attr::BOLD)));
        let (frame, result) = paint(&line, LineRange::new(0, 10), 10);
        result.unwrap();
        assert_eq!(frame.row_text(0), "a       b ");
        assert!(style_at(&frame, 8).contains(Attr::BOLD));
        assert!(!style_at(&frame, 7).contains(Attr::BOLD));
    }

    #[test]
    fn open_attr_runs_to_window_end() {
        let line = AttrLine::from("ab").with_attr(LineRange::open(1), AttrValue::Style(TextAttr::style(Attr::ITALIC)));
        let (frame, result) = paint(&line, LineRange::new(0, 5), 5);
        result.unwrap();
        assert!(!style_at(&frame, 0).contains(Attr::ITALIC));
        for x in 1..5 {
            assert!(style_at(&frame, x).contains(Attr::ITALIC), "column {x}");
        }
    }

    // -- Compositing ---------------------------------------------------------

    #[test]
    fn graphic_replaces_glyph_keeps_style() {
        let line = AttrLine::from("abc").with_attr(LineRange::new(1, 2), AttrValue::Graphic('│'));
        let (frame, result) = paint(&line, LineRange::new(0, 3), 3);
        result.unwrap();
        assert_eq!(frame.row_text(0), "a│c");
        assert_eq!(frame.get(1, 0).unwrap().attr(), frame.get(0, 0).unwrap().attr());
    }

    #[test]
    fn style_pair_overrides_cell_pair() {
        let line = AttrLine::from("abc").with_attr(
            LineRange::new(0, 1),
            AttrValue::Style(TextAttr::new(Attr::BOLD, PairId(12))),
        );
        let (frame, result) = paint(&line, LineRange::new(0, 3), 3);
        result.unwrap();
        let cell = frame.get(0, 0).unwrap();
        assert_eq!(cell.pair, PairId(12));
        assert!(cell.style.contains(Attr::BOLD));
        assert_ne!(frame.get(1, 0).unwrap().pair, PairId(12));
    }

    #[test]
    fn double_reverse_cancels() {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(4, 1);
        let line = AttrLine::from("abcd").with_attr(LineRange::new(0, 2), AttrValue::Style(TextAttr::style(Attr::REVERSE)));
        paint_line(&mut frame, &mut reg, 0, 0, &line, LineRange::new(0, 4), Role::Search).unwrap();

        assert!(!style_at(&frame, 0).contains(Attr::REVERSE));
        assert!(!style_at(&frame, 1).contains(Attr::REVERSE));
        assert!(style_at(&frame, 2).contains(Attr::REVERSE));
    }

    #[test]
    fn equal_ranges_apply_in_insertion_order() {
        let line = AttrLine::from("ab")
            .with_attr(LineRange::new(0, 1), AttrValue::Graphic('x'))
            .with_attr(LineRange::new(0, 1), AttrValue::Graphic('y'));
        let (frame, result) = paint(&line, LineRange::new(0, 2), 2);
        result.unwrap();
        assert_eq!(frame.row_text(0), "yb");
    }

    #[test]
    fn overlapping_fg_bg_composite_distinct_pairs() {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(10, 1);
        let line = AttrLine::from("abcdefghij")
            .with_attr(LineRange::new(0, 6), AttrValue::Foreground(ansi::RED))
            .with_attr(LineRange::new(3, 9), AttrValue::Background(ansi::BLUE));
        paint_line(&mut frame, &mut reg, 0, 0, &line, LineRange::new(0, 10), Role::Text).unwrap();

        let colors = |x: u16| reg.pair_colors(frame.get(x, 0).unwrap().pair).unwrap();
        let red_black = (CellColor::Ansi256(ansi::RED), CellColor::Ansi256(ansi::BLACK));
        let red_blue = (CellColor::Ansi256(ansi::RED), CellColor::Ansi256(ansi::BLUE));
        let white_blue = (CellColor::Ansi256(ansi::WHITE), CellColor::Ansi256(ansi::BLUE));

        for x in 0..3 {
            assert_eq!(colors(x), red_black, "column {x}");
        }
        for x in 3..6 {
            assert_eq!(colors(x), red_blue, "column {x}");
        }
        for x in 6..9 {
            assert_eq!(colors(x), white_blue, "column {x}");
        }
        let pairs: Vec<_> = [0, 3, 6].iter().map(|&x| frame.get(x, 0).unwrap().pair).collect();
        assert_ne!(pairs[0], pairs[1]);
        assert_ne!(pairs[1], pairs[2]);
        assert_ne!(pairs[0], pairs[2]);
    }

    #[test]
    fn flatten_keeps_style_bits() {
        let line = AttrLine::from("ab")
            .with_attr(LineRange::new(0, 2), AttrValue::Style(TextAttr::style(Attr::BOLD)))
            .with_attr(LineRange::new(0, 1), AttrValue::Foreground(ansi::GREEN));
        let (frame, result) = paint(&line, LineRange::new(0, 2), 2);
        result.unwrap();
        assert!(style_at(&frame, 0).contains(Attr::BOLD));
        assert!(style_at(&frame, 1).contains(Attr::BOLD));
    }

    #[test]
    fn huge_window_is_clamped_to_surface() {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(80, 1);
        let line = AttrLine::from("abc").with_attr(LineRange::new(0, 3), AttrValue::Foreground(ansi::GREEN));
        paint_line(&mut frame, &mut reg, 0, 0, &line, LineRange::new(0, usize::MAX), Role::Text).unwrap();

        assert_eq!(frame.row_text(0).trim_end(), "abc");
        let green = reg.pair_colors(frame.get(0, 0).unwrap().pair).unwrap();
        assert_eq!(green.0, CellColor::Ansi256(ansi::GREEN));
        let rest = reg.pair_colors(frame.get(79, 0).unwrap().pair).unwrap();
        assert_eq!(rest, (CellColor::Ansi256(ansi::WHITE), CellColor::Ansi256(ansi::BLACK)));
    }

    #[test]
    fn window_past_right_edge_is_clipped() {
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(6, 1);
        let line = AttrLine::from("abcdef").with_attr(LineRange::open(0), AttrValue::Background(ansi::BLUE));
        paint_line(&mut frame, &mut reg, 0, 4, &line, LineRange::new(0, 6), Role::Text).unwrap();

        assert_eq!(frame.row_text(0), "    ab");
        assert!(frame.get(3, 0).unwrap().is_empty());
        let colors = reg.pair_colors(frame.get(5, 0).unwrap().pair).unwrap();
        assert_eq!(colors.1, CellColor::Ansi256(ansi::BLUE));
    }

    #[test]
    fn x_past_surface_paints_nothing() {
        let line = AttrLine::from("abc").with_attr(LineRange::new(0, 3), AttrValue::Foreground(1));
        let palette = Palette::xterm();
        let mut reg = registry(&palette);
        let mut frame = FrameBuffer::new(4, 1);
        paint_line(&mut frame, &mut reg, 0, 9, &line, LineRange::new(0, 3), Role::Text).unwrap();
        assert!(frame.row(0).unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn custom_attrs_are_ignored() {
        let plain = paint(&AttrLine::from("abc"), LineRange::new(0, 3), 3).0;
        let line = AttrLine::from("abc").with_attr(LineRange::new(0, 3), AttrValue::Custom { name: "link", value: 1 });
        let (frame, result) = paint(&line, LineRange::new(0, 3), 3);
        result.unwrap();
        assert_eq!(frame, plain);
    }

    // -- Rejection -----------------------------------------------------------

    #[test]
    fn open_window_is_rejected() {
        let (frame, result) = paint(&AttrLine::from("abc"), LineRange::open(0), 3);
        assert_eq!(result, Err(RenderError::OpenWindow(LineRange::open(0))));
        assert!(frame.row(0).unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let window = LineRange { start: 4, end: Some(2) };
        let (_, result) = paint(&AttrLine::from("abc"), window, 3);
        assert_eq!(result, Err(RenderError::InvertedWindow(window)));
    }

    #[test]
    fn out_of_bounds_attr_rejects_line_before_painting() {
        let range = LineRange::new(1, 20);
        let line = AttrLine::from("abc").with_attr(range, AttrValue::Foreground(1));
        let (frame, result) = paint(&line, LineRange::new(0, 3), 3);
        assert_eq!(
            result,
            Err(RenderError::Range(RangeError::OutOfBounds { range, len: 3 }))
        );
        assert!(frame.row(0).unwrap().iter().all(|c| c.is_empty()));
    }
}
