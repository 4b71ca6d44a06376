//! Bitmap font storage and the binary font format.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! magic          CA CA 46 54
//! control_size   u32   bytes from here to the start of glyph data
//! data_size      u32
//! version        u16   always 1
//! blocks         u16
//! glyphs         u32
//! bpp            u16   1, 2, 4 or 8
//! width, height  u16   cell size in pixels
//! maxwidth       u16
//! maxheight      u16
//! flags          u16
//! blocks  x { start u32, stop u32, index u32 }
//! glyphs  x { width u16, height u16, offset u32 }
//! (padding up to control_size)
//! data           data_size bytes, MSB-first packed pixels
//! ```

use log::debug;

use super::builder;
use crate::error::{Error, Result};

pub(crate) const MAGIC: [u8; 4] = [0xca, 0xca, 0x46, 0x54];
pub(crate) const VERSION: u16 = 1;

const HEADER_LEN: usize = 28;
const BLOCK_LEN: usize = 12;
const GLYPH_LEN: usize = 8;

/// A contiguous codepoint range `start..stop` mapped onto glyphs starting
/// at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) start: u32,
    pub(crate) stop: u32,
    pub(crate) index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) offset: u32,
}

/// A bitmap font: fixed cell size, per-glyph bitmaps with 1 to 8 bits per
/// pixel, and a sorted list of codepoint blocks.
#[derive(Clone, PartialEq, Eq)]
pub struct Font {
    pub(crate) bpp: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) max_width: u16,
    pub(crate) max_height: u16,
    pub(crate) flags: u16,
    pub(crate) blocks: Vec<Block>,
    pub(crate) glyphs: Vec<Glyph>,
    pub(crate) data: Vec<u8>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("size", &(self.width, self.height))
            .field("bpp", &self.bpp)
            .field("blocks", &self.blocks.len())
            .field("glyphs", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos + N;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| invalid(format!("truncated at byte {}", self.pos)))?;
        self.pos = end;
        let mut out = [0; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_be_bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_be_bytes)
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidFont(msg.into())
}

/// Bytes holding a packed `width` x `height` glyph.
pub(crate) const fn glyph_bytes(width: u16, height: u16, bpp: u16) -> usize {
    (width as usize * height as usize * bpp as usize).div_ceil(8)
}

impl Font {
    /// Parse a font from its binary form.
    ///
    /// # Errors
    /// [`Error::InvalidFont`] for bad magic, an unsupported version or
    /// depth, truncated data, overlapping blocks or glyphs pointing past
    /// the data section.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.get(..4) != Some(&MAGIC[..]) {
            return Err(invalid("bad magic"));
        }
        let mut r = Reader::new(bytes, 4);
        let control_size = r.u32()? as usize;
        let data_size = r.u32()? as usize;
        let version = r.u16()?;
        let block_count = r.u16()? as usize;
        let glyph_count = r.u32()? as usize;
        let bpp = r.u16()?;
        let width = r.u16()?;
        let height = r.u16()?;
        let max_width = r.u16()?;
        let max_height = r.u16()?;
        let flags = r.u16()?;

        if version != VERSION {
            return Err(invalid(format!("unsupported version {version}")));
        }
        if !matches!(bpp, 1 | 2 | 4 | 8) {
            return Err(invalid(format!("unsupported depth {bpp}")));
        }
        if width == 0 || height == 0 {
            return Err(invalid(format!("empty cell size {width}x{height}")));
        }
        let control_needed = HEADER_LEN + block_count * BLOCK_LEN + glyph_count * GLYPH_LEN;
        if control_size < control_needed {
            return Err(invalid(format!(
                "control size {control_size} below {control_needed}"
            )));
        }
        let data_start = 4 + control_size;
        let data = bytes
            .get(data_start..data_start + data_size)
            .ok_or_else(|| invalid(format!("expected {data_size} bytes of glyph data")))?;

        let mut blocks = Vec::with_capacity(block_count);
        for _ in 0..block_count {
            let block = Block {
                start: r.u32()?,
                stop: r.u32()?,
                index: r.u32()?,
            };
            if block.start >= block.stop {
                return Err(invalid(format!("empty block {:#x}", block.start)));
            }
            if blocks.last().is_some_and(|prev: &Block| prev.stop > block.start) {
                return Err(invalid(format!("block {:#x} out of order", block.start)));
            }
            if block.index as usize + (block.stop - block.start) as usize > glyph_count {
                return Err(invalid(format!("block {:#x} overruns glyph table", block.start)));
            }
            blocks.push(block);
        }

        let mut glyphs = Vec::with_capacity(glyph_count);
        for i in 0..glyph_count {
            let glyph = Glyph {
                width: r.u16()?,
                height: r.u16()?,
                offset: r.u32()?,
            };
            if glyph.width > max_width || glyph.height > max_height {
                return Err(invalid(format!("glyph {i} exceeds maximum size")));
            }
            if glyph.offset as usize + glyph_bytes(glyph.width, glyph.height, bpp) > data_size {
                return Err(invalid(format!("glyph {i} points past the data section")));
            }
            glyphs.push(glyph);
        }

        debug!(
            "loaded {width}x{height} font, {bpp} bpp, {block_count} blocks, {glyph_count} glyphs"
        );
        Ok(Self {
            bpp,
            width,
            height,
            max_width,
            max_height,
            flags,
            blocks,
            glyphs,
            data: data.to_vec(),
        })
    }

    /// Serialize the font into its binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let control_size =
            HEADER_LEN + self.blocks.len() * BLOCK_LEN + self.glyphs.len() * GLYPH_LEN;
        let mut out = Vec::with_capacity(4 + control_size + self.data.len());

        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&(control_size as u32).to_be_bytes());
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&VERSION.to_be_bytes());
        out.extend_from_slice(&(self.blocks.len() as u16).to_be_bytes());
        out.extend_from_slice(&(self.glyphs.len() as u32).to_be_bytes());
        for field in [
            self.bpp,
            self.width,
            self.height,
            self.max_width,
            self.max_height,
            self.flags,
        ] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        for block in &self.blocks {
            out.extend_from_slice(&block.start.to_be_bytes());
            out.extend_from_slice(&block.stop.to_be_bytes());
            out.extend_from_slice(&block.index.to_be_bytes());
        }
        for glyph in &self.glyphs {
            out.extend_from_slice(&glyph.width.to_be_bytes());
            out.extend_from_slice(&glyph.height.to_be_bytes());
            out.extend_from_slice(&glyph.offset.to_be_bytes());
        }
        out.extend_from_slice(&self.data);
        out
    }

    /// Load one of the fonts compiled into the crate.
    ///
    /// # Errors
    /// [`Error::MissingResource`] if no builtin font has that name.
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            builder::BLOCKS_8X16 => builder::blocks_8x16(),
            _ => Err(Error::MissingResource(format!("font {name:?}"))),
        }
    }

    /// Names accepted by [`Font::builtin`].
    pub const fn list() -> &'static [&'static str] {
        &[builder::BLOCKS_8X16]
    }

    /// Cell width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width as u32
    }

    /// Cell height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height as u32
    }

    /// Bits per glyph pixel.
    #[inline]
    pub const fn bpp(&self) -> u32 {
        self.bpp as u32
    }

    /// Codepoint ranges covered by the font, as `(start, stop)` with `stop`
    /// exclusive.
    pub fn blocks(&self) -> Vec<(u32, u32)> {
        self.blocks.iter().map(|b| (b.start, b.stop)).collect()
    }

    /// Whether the font has a glyph for `ch`.
    pub fn contains(&self, ch: u32) -> bool {
        self.glyph(ch).is_some()
    }

    pub(crate) fn glyph(&self, ch: u32) -> Option<&Glyph> {
        let pos = self.blocks.partition_point(|b| b.stop <= ch);
        let block = self.blocks.get(pos).filter(|b| b.start <= ch)?;
        self.glyphs.get((block.index + ch - block.start) as usize)
    }

    /// Coverage of pixel (`x`, `y`) of `glyph`, scaled to `0..=255`.
    pub(crate) fn coverage(&self, glyph: &Glyph, x: u16, y: u16) -> u8 {
        let bpp = usize::from(self.bpp);
        let bit = (usize::from(y) * usize::from(glyph.width) + usize::from(x)) * bpp;
        let Some(&byte) = self.data.get(glyph.offset as usize + bit / 8) else {
            return 0;
        };
        let max = (1_u16 << bpp) - 1;
        let value = (u16::from(byte) >> (8 - bpp - bit % 8)) & max;
        (value * 255 / max) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontBuilder;

    fn tiny() -> Font {
        let mut builder = FontBuilder::new(2, 2).with_bpp(2);
        builder
            .glyph('a', |x, y| if x == y { 255 } else { 0 })
            .glyph('b', |_, _| 170)
            .glyph('z', |_, _| 255);
        builder.build().unwrap()
    }

    #[test]
    fn test_blocks_group_runs() {
        let font = tiny();
        assert_eq!(font.blocks(), vec![(0x61, 0x63), (0x7a, 0x7b)]);
        assert!(font.contains('b' as u32));
        assert!(!font.contains('c' as u32));
        assert!(!font.contains(0x60));
    }

    #[test]
    fn test_coverage_unpacks() {
        let font = tiny();
        let a = *font.glyph('a' as u32).unwrap();
        assert_eq!(font.coverage(&a, 0, 0), 255);
        assert_eq!(font.coverage(&a, 1, 0), 0);
        assert_eq!(font.coverage(&a, 1, 1), 255);
        let b = *font.glyph('b' as u32).unwrap();
        assert_eq!(font.coverage(&b, 1, 0), 170);
    }

    #[test]
    fn test_bytes_round_trip() {
        let font = tiny();
        let bytes = font.to_bytes();
        assert_eq!(&bytes[..4], &MAGIC);
        assert_eq!(Font::from_bytes(&bytes).unwrap(), font);
    }

    #[test]
    fn test_rejects_malformed() {
        let bytes = tiny().to_bytes();
        assert!(matches!(Font::from_bytes(&bytes[..20]), Err(Error::InvalidFont(_))));
        assert!(matches!(
            Font::from_bytes(&bytes[..bytes.len() - 1]),
            Err(Error::InvalidFont(_))
        ));

        let mut bad = bytes.clone();
        bad[0] = 0;
        assert!(Font::from_bytes(&bad).is_err());

        let mut bad = bytes.clone();
        bad[13] = 2; // version low byte
        assert!(Font::from_bytes(&bad).is_err());

        let mut bad = bytes;
        bad[21] = 3; // bpp low byte
        assert!(Font::from_bytes(&bad).is_err());
    }

    #[test]
    fn test_builtin() {
        assert_eq!(Font::list(), &["Blocks 8x16"]);
        let font = Font::builtin("Blocks 8x16").unwrap();
        assert_eq!((font.width(), font.height()), (8, 16));
        assert!(font.contains(0x2588));
        assert!(font.contains(0xfffd));
        assert!(matches!(Font::builtin("Monaco"), Err(Error::MissingResource(_))));
    }
}
