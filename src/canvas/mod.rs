//! Canvas module: cells, attributes, frames and drawing.
//!
//! A [`Canvas`] is a grid of [`Cell`]s stored in one or more [`Frame`]s.
//! Cells carry a UTF-32 codepoint and a packed [`Attr`].

pub mod attr;
#[allow(clippy::module_inception)]
mod canvas;
mod cell;
mod draw;
mod frame;
mod raster;
mod transform;

pub use attr::{AnsiColor, Attr, Color, Style};
pub use canvas::{Canvas, MAX_CELLS, MAX_DIMENSION};
pub use cell::Cell;
pub use frame::{Frame, FrameId};
