// SPDX-License-Identifier: MIT
//
// vista-term: the terminal cell model underneath vista.
//
// Everything here is below the level of "meaning". A cell is a character,
// some style bits, and a color pair number. A frame is a grid of cells. A
// color is either 24-bit RGB (what themes speak) or a palette index (what
// terminals speak), and the Lab math that relates the two lives in `color`.
//
// Nothing in this crate knows about semantic roles or attributed strings.
// Those sit on top, in vista-theme and vista-view. The only way out to a
// real terminal is `sgr`, which serializes a frame as escape sequences.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod sgr;
