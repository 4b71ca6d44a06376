//! # Cellgfx
//!
//! Character-cell graphics: attributed text canvases, bitmap dithering and
//! bitmap font rendering.
//!
//! Cellgfx draws into grids of character cells instead of pixels. Each cell
//! holds one Unicode codepoint and a packed colour/style attribute, so the
//! result can be shown on any text terminal or rasterized back to pixels.
//!
//! ## Core Concepts
//!
//! - **Canvas**: a grid of cells with one or more animation frames, a
//!   current drawing attribute and a cursor
//! - **Drawing**: lines, boxes, circles, ellipses and triangles plotted with
//!   glyphs, plus flips and quarter turns that remap glyph shapes
//! - **Dither**: turns RGB(A) bitmaps into coloured glyphs with ordered,
//!   random or error-diffusion dithering
//! - **Font**: renders a canvas to ARGB pixels with a bitmap font
//! - **Codec**: plain-text and ANSI import/export of the active frame
//!
//! ## Example
//!
//! ```rust
//! use cellgfx::{AnsiColor, Canvas};
//!
//! let mut canvas = Canvas::new(8, 3).unwrap();
//! canvas.set_color_ansi(AnsiColor::Yellow, AnsiColor::Blue);
//! canvas.draw_box(0, 0, 8, 3, '#');
//! canvas.put_str(2, 1, "hi");
//!
//! let text = canvas.export_memory("text").unwrap();
//! assert_eq!(text, b"########\n# hi   #\n########\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod macros;

pub mod canvas;
pub mod charset;
pub mod codec;
pub mod dither;
pub mod error;
pub mod font;
pub mod rect;

// Re-exports for convenience
pub use canvas::{AnsiColor, Attr, Canvas, Cell, Color, Frame, FrameId, Style};
pub use codec::{export_list, import_list, ExportFormat, ImportFormat};
pub use dither::{
    Algorithm, Antialias, ChannelMasks, Charset, ColorMode, Dither, DitherConfig,
};
pub use error::{Error, Result};
pub use font::{Font, FontBuilder};
pub use rect::Rect;

/// Version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
