//! Bitmap fonts and canvas rasterization.
//!
//! A [`Font`] is loaded from its binary form ([`Font::from_bytes`]), taken
//! from the builtin set ([`Font::builtin`]) or assembled with a
//! [`FontBuilder`]. [`Font::render`] turns a canvas into 32-bit ARGB
//! pixels, one font cell per canvas cell.

mod builder;
#[allow(clippy::module_inception)]
mod font;
mod render;

pub use builder::FontBuilder;
pub use font::Font;
