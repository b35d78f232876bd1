//! Word wrapping for [`AttrLine::insert`](crate::AttrLine::insert).
//!
//! The pass walks forward from the insertion point one *unit* at a time.
//! A unit is a run of ASCII letters, digits and `, _ . ;`, ending early
//! just after a `.`. Everything else (spaces, other punctuation, non-ASCII
//! characters) is filler that may follow a unit on the same line.
//!
//! For each unit:
//!
//! - If it does not fit in the width left on the current line, and the line
//!   already holds something, a newline plus `indent` spaces goes in front
//!   of it.
//! - Otherwise the unit and its trailing filler are consumed. When the
//!   width left reaches exactly zero a line break is forced right there,
//!   and leading spaces on the new line are dropped.
//!
//! A unit longer than a whole line is never split; it overflows.
//!
//! Every newline and indent is inserted through the line's own editing
//! operations, so attributes stay attached to the text they covered.

use crate::AttrLine;

/// Wrapping settings for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWrap {
    /// Maximum line width in bytes.
    pub width: usize,
    /// Spaces placed at the start of each continuation line.
    pub indent: usize,
}

impl TextWrap {
    #[must_use]
    pub const fn new(width: usize, indent: usize) -> Self {
        Self { width, indent }
    }
}

#[inline]
const fn is_unit_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b',' | b'_' | b'.' | b';')
}

#[inline]
fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// Byte length of the character starting at `pos`.
fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// End of the unit starting at `start`.
fn unit_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_unit_byte(bytes[end]) {
        end += 1;
        if bytes[end - 1] == b'.' {
            break;
        }
    }
    end
}

/// Put a line break and the indent at `pos`.
fn break_line(line: &mut AttrLine, pos: usize, indent: usize) {
    line.insert_chars(pos, 1, '\n').insert_chars(pos + 1, indent, ' ');
}

/// Run the wrap pass over `line` starting at byte `index`.
pub(crate) fn wrap_from(line: &mut AttrLine, index: usize, settings: &TextWrap) {
    let width = signed(settings.width);
    let indent = settings.indent;
    let usable = (width - signed(indent)).max(1);

    let line_start = {
        let bytes = line.text().as_bytes();
        let end = (index + 1).min(bytes.len());
        bytes[..end]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1)
    };
    let line_len = signed(index) - signed(line_start);

    // A line that is already full at the insertion point gets no budget.
    let mut avail = (width - line_len).max(0);
    if avail == 0 {
        avail = isize::MAX;
    }

    let mut start_pos = index;
    while start_pos < line.len() {
        let mut pos = unit_end(line.text(), start_pos);
        let unit = signed(pos - start_pos);

        if avail != usable && unit > avail {
            break_line(line, start_pos, indent);
            start_pos += 1 + indent;
            avail = usable;
            continue;
        }

        avail = avail.saturating_sub(unit);
        while pos < line.len() && avail != 0 {
            let b = line.text().as_bytes()[pos];
            if b == b'\n' {
                line.insert_chars(pos + 1, indent, ' ');
                avail = usable;
                pos += 1 + indent;
                break;
            }
            if b.is_ascii_alphanumeric() || b == b'_' {
                break;
            }
            avail -= 1;
            pos += char_len_at(line.text(), pos);
        }
        start_pos = pos;

        if avail == 0 {
            break_line(line, start_pos, indent);
            start_pos += 1 + indent;
            avail = usable;

            let spaces = line.text().as_bytes()[start_pos..]
                .iter()
                .take_while(|&&b| b == b' ')
                .count();
            if spaces > 0 {
                line.erase(start_pos, spaces);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
