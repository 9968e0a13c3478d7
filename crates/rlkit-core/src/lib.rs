//! **rlkit-core** — Core types for grid-based games.
//!
//! This crate provides the foundational types used across the *rlkit*
//! ecosystem: geometry primitives and coloured glyphs.

pub mod geom;
pub mod glyph;
pub mod style;

pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use style::Color;
