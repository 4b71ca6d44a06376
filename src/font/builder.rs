//! Building fonts from coverage functions, and the builtin fonts.

use std::collections::BTreeMap;

use super::font::{glyph_bytes, Block, Font, Glyph};
use crate::error::{Error, Result};

pub(crate) const BLOCKS_8X16: &str = "Blocks 8x16";

struct GlyphImage {
    width: u16,
    height: u16,
    coverage: Vec<u8>,
}

/// Assembles a [`Font`] glyph by glyph.
///
/// Each glyph is described by a coverage function returning `0..=255` for
/// every pixel; the builder quantizes it to the font depth and groups
/// consecutive codepoints into blocks.
///
/// ```
/// use cellgfx::FontBuilder;
///
/// let mut builder = FontBuilder::new(4, 4);
/// builder.glyph('#', |x, y| if (x + y) % 2 == 0 { 255 } else { 0 });
/// let font = builder.build().unwrap();
/// assert_eq!(font.blocks(), vec![('#' as u32, '#' as u32 + 1)]);
/// ```
pub struct FontBuilder {
    width: u16,
    height: u16,
    bpp: u16,
    glyphs: BTreeMap<u32, GlyphImage>,
}

impl FontBuilder {
    /// Start a font with the given cell size and 8 bits per pixel.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            bpp: 8,
            glyphs: BTreeMap::new(),
        }
    }

    /// Set the pixel depth (1, 2, 4 or 8).
    #[must_use]
    pub const fn with_bpp(mut self, bpp: u16) -> Self {
        self.bpp = bpp;
        self
    }

    /// Add or replace a cell-sized glyph.
    pub fn glyph(&mut self, ch: char, coverage: impl Fn(u16, u16) -> u8) -> &mut Self {
        self.glyph_sized(ch, self.width, self.height, coverage)
    }

    /// Add or replace a glyph of arbitrary size, such as a double-width
    /// glyph for fullwidth characters.
    pub fn glyph_sized(
        &mut self,
        ch: char,
        width: u16,
        height: u16,
        coverage: impl Fn(u16, u16) -> u8,
    ) -> &mut Self {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| coverage(x, y))
            .collect();
        self.glyphs.insert(
            ch as u32,
            GlyphImage {
                width,
                height,
                coverage: pixels,
            },
        );
        self
    }

    /// Number of glyphs added so far.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no glyph has been added.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Pack the glyphs into a font.
    ///
    /// # Errors
    /// [`Error::InvalidFont`] for an unsupported depth or an empty cell
    /// size.
    pub fn build(&self) -> Result<Font> {
        if !matches!(self.bpp, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidFont(format!("unsupported depth {}", self.bpp)));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidFont(format!(
                "empty cell size {}x{}",
                self.width, self.height
            )));
        }

        let mut blocks: Vec<Block> = Vec::new();
        let mut glyphs = Vec::with_capacity(self.glyphs.len());
        let mut data = Vec::new();

        for (&ch, image) in &self.glyphs {
            match blocks.last_mut() {
                Some(block) if block.stop == ch => block.stop += 1,
                _ => blocks.push(Block {
                    start: ch,
                    stop: ch + 1,
                    index: glyphs.len() as u32,
                }),
            }

            let offset = data.len();
            data.resize(offset + glyph_bytes(image.width, image.height, self.bpp), 0);
            pack(&image.coverage, self.bpp, &mut data[offset..]);
            glyphs.push(Glyph {
                width: image.width,
                height: image.height,
                offset: offset as u32,
            });
        }

        Ok(Font {
            bpp: self.bpp,
            width: self.width,
            height: self.height,
            max_width: glyphs.iter().map(|g| g.width).max().unwrap_or(self.width),
            max_height: glyphs.iter().map(|g| g.height).max().unwrap_or(self.height),
            flags: 0,
            blocks,
            glyphs,
            data,
        })
    }
}

/// MSB-first packing of 8-bit coverage into `bpp`-bit pixels.
fn pack(coverage: &[u8], bpp: u16, out: &mut [u8]) {
    let bpp = usize::from(bpp);
    for (i, &c) in coverage.iter().enumerate() {
        let bit = i * bpp;
        let value = c >> (8 - bpp);
        out[bit / 8] |= value << (8 - bpp - bit % 8);
    }
}

// ============================================================================
// Builtin fonts
// ============================================================================

/// Quadrant bits: upper left, upper right, lower left, lower right.
const QUADRANTS: [(char, u8); 10] = [
    ('\u{2596}', 0b0100),
    ('\u{2597}', 0b1000),
    ('\u{2598}', 0b0001),
    ('\u{2599}', 0b1101),
    ('\u{259a}', 0b1001),
    ('\u{259b}', 0b0111),
    ('\u{259c}', 0b1011),
    ('\u{259d}', 0b0010),
    ('\u{259e}', 0b0110),
    ('\u{259f}', 0b1110),
];

/// Filled rectangle in eighths of the cell: `(x0, y0, x1, y1)`.
const EIGHTHS: [(char, [u16; 4]); 20] = [
    ('\u{2580}', [0, 0, 8, 4]),
    ('\u{2581}', [0, 7, 8, 8]),
    ('\u{2582}', [0, 6, 8, 8]),
    ('\u{2583}', [0, 5, 8, 8]),
    ('\u{2584}', [0, 4, 8, 8]),
    ('\u{2585}', [0, 3, 8, 8]),
    ('\u{2586}', [0, 2, 8, 8]),
    ('\u{2587}', [0, 1, 8, 8]),
    ('\u{2588}', [0, 0, 8, 8]),
    ('\u{2589}', [0, 0, 7, 8]),
    ('\u{258a}', [0, 0, 6, 8]),
    ('\u{258b}', [0, 0, 5, 8]),
    ('\u{258c}', [0, 0, 4, 8]),
    ('\u{258d}', [0, 0, 3, 8]),
    ('\u{258e}', [0, 0, 2, 8]),
    ('\u{258f}', [0, 0, 1, 8]),
    ('\u{2590}', [4, 0, 8, 8]),
    ('\u{2594}', [0, 0, 8, 1]),
    ('\u{2595}', [7, 0, 8, 8]),
    (' ', [0, 0, 0, 0]),
];

/// The "Blocks 8x16" font: space, the block elements, the three shades
/// and a hollow replacement box.
pub(crate) fn blocks_8x16() -> Result<Font> {
    const W: u16 = 8;
    const H: u16 = 16;
    let mut builder = FontBuilder::new(W, H);

    for (ch, [x0, y0, x1, y1]) in EIGHTHS {
        let (x0, x1) = (x0 * W / 8, x1 * W / 8);
        let (y0, y1) = (y0 * H / 8, y1 * H / 8);
        builder.glyph(ch, move |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                255
            } else {
                0
            }
        });
    }

    for (ch, bits) in QUADRANTS {
        builder.glyph(ch, move |x, y| {
            let quadrant = u8::from(x >= W / 2) | (u8::from(y >= H / 2) << 1);
            if bits & (1 << quadrant) != 0 {
                255
            } else {
                0
            }
        });
    }

    for (ch, level) in [('\u{2591}', 1), ('\u{2592}', 2), ('\u{2593}', 3)] {
        builder.glyph(ch, move |x, y| {
            let lit = match level {
                1 => x % 2 == 0 && y % 2 == 0,
                2 => (x + y) % 2 == 0,
                _ => !(x % 2 == 1 && y % 2 == 1),
            };
            if lit {
                255
            } else {
                0
            }
        });
    }

    builder.glyph('\u{fffd}', |x, y| {
        let edge = x == 1 || x == W - 2 || y == 2 || y == H - 3;
        let inside = (1..W - 1).contains(&x) && (2..H - 2).contains(&y);
        if edge && inside {
            255
        } else {
            0
        }
    });

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_msb_first() {
        let mut out = [0u8; 1];
        pack(&[255, 0, 255, 0], 2, &mut out);
        assert_eq!(out[0], 0b1100_1100);

        let mut out = [0u8; 2];
        pack(&[255, 0, 0, 0, 0, 0, 0, 0, 255], 1, &mut out);
        assert_eq!(out, [0b1000_0000, 0b1000_0000]);
    }

    #[test]
    fn test_build_rejects_bad_depth() {
        let mut builder = FontBuilder::new(8, 8).with_bpp(3);
        builder.glyph('x', |_, _| 0);
        assert!(matches!(builder.build(), Err(Error::InvalidFont(_))));
        assert!(FontBuilder::new(0, 8).build().is_err());
    }

    #[test]
    fn test_glyph_replaced() {
        let mut builder = FontBuilder::new(1, 1);
        builder.glyph('x', |_, _| 0).glyph('x', |_, _| 255);
        assert_eq!(builder.len(), 1);
        let font = builder.build().unwrap();
        let glyph = *font.glyph('x' as u32).unwrap();
        assert_eq!(font.coverage(&glyph, 0, 0), 255);
    }

    #[test]
    fn test_blocks_font_shapes() {
        let font = blocks_8x16().unwrap();
        let upper = *font.glyph(0x2580).unwrap();
        assert_eq!(font.coverage(&upper, 3, 7), 255);
        assert_eq!(font.coverage(&upper, 3, 8), 0);

        let diagonal = *font.glyph(0x259a).unwrap();
        assert_eq!(font.coverage(&diagonal, 0, 0), 255);
        assert_eq!(font.coverage(&diagonal, 7, 0), 0);
        assert_eq!(font.coverage(&diagonal, 7, 15), 255);

        let space = *font.glyph(' ' as u32).unwrap();
        assert!((0..16).all(|y| (0..8).all(|x| font.coverage(&space, x, y) == 0)));
    }

    #[test]
    fn test_blocks_font_survives_serialization() {
        let font = blocks_8x16().unwrap();
        assert_eq!(Font::from_bytes(&font.to_bytes()).unwrap(), font);
    }
}
