//! # vista-theme: palette matching and semantic roles
//!
//! Two pieces sit between "what a span of text means" and "what the
//! terminal can show":
//!
//! ```text
//! Rgb from a theme / log line
//!     │
//!     ▼
//! palette.rs:  nearest palette id by CIE94 ΔE (linear scan)
//!     │
//!     ▼
//! registry.rs: palette ids → color pair, Role → TextAttr
//! ```
//!
//! The palette is immutable once built. The registry owns the pair table
//! and is rebuilt wholesale by [`RoleRegistry::reload`]. Both are plain
//! values passed by reference; there is no process-wide state.

// Pair ids are u16 and palette ids are u8; the grid math stays in range.
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod palette;
pub mod registry;
pub mod role;
pub mod xterm;

pub use error::{ColorParseError, PaletteError};
pub use palette::{Palette, PaletteEntry, PaletteSpec};
pub use registry::{ColorSettings, ColorTier, RoleRegistry, TermCaps};
pub use role::Role;
