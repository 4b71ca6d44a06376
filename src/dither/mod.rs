//! Dithering: pixel bitmaps to coloured character cells.
//!
//! A [`Dither`] describes one bitmap format (depth, size, pitch, channel
//! masks or palette) along with tuning values and strategy selections.
//! [`Dither::bitmap`] samples, corrects, dithers and quantizes the pixels
//! into a region of a canvas.

#[allow(clippy::module_inception)]
mod dither;
mod options;
mod palette;

pub use dither::{ChannelMasks, Dither};
pub use options::{Algorithm, Antialias, Charset, ColorMode, DitherConfig};
