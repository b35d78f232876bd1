//! # vista-view: attributed lines and how they reach the screen
//!
//! - **[`range`]**: `LineRange`, a half-open byte range whose end may be
//!   left open to mean "to the end of the line"
//! - **[`attr_line`]**: `AttrLine`, text plus style, color, and glyph
//!   attributes that stay attached to the right bytes across edits
//! - **[`wrap`]**: word wrapping with hanging indent, applied on insert
//! - **[`render`]**: `paint_line`, which expands tabs and multi-byte text to
//!   display columns and composites the attributes into a `Surface`
//!
//! Colors come from `vista-theme`'s `RoleRegistry`; cells and surfaces come
//! from `vista-term`.

pub mod attr_line;
pub mod range;
pub mod render;
pub mod wrap;

pub use attr_line::{AttrKind, AttrLine, AttrValue, RangeError, StringAttr};
pub use range::LineRange;
pub use render::{RenderError, paint_line};
pub use wrap::TextWrap;
