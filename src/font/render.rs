//! Rasterizing a canvas into an ARGB pixel buffer.

use log::{trace, warn};

use super::font::{Font, Glyph};
use crate::canvas::Canvas;
use crate::charset::MAGIC_FULLWIDTH;
use crate::error::{Error, Result};

const REPLACEMENT: u32 = 0xfffd;

impl Font {
    /// Render the canvas's active frame into `buf`.
    ///
    /// `buf` holds `height` rows of `pitch` bytes; each pixel is four bytes
    /// `A, R, G, B`. Cell (x, y) covers the pixel rectangle starting at
    /// `(x * font width, y * font height)`; anything past `width` x
    /// `height` is clipped. Codepoints the font lacks fall back to U+FFFD,
    /// then `'?'`, then to plain background.
    ///
    /// # Errors
    /// [`Error::BufferTooSmall`] if `pitch` is shorter than a row of
    /// `width` pixels or `buf` is shorter than `pitch * height`.
    pub fn render(
        &self,
        canvas: &Canvas,
        buf: &mut [u8],
        width: u32,
        height: u32,
        pitch: u32,
    ) -> Result<()> {
        let (width, height, pitch) = (width as usize, height as usize, pitch as usize);
        if pitch < width * 4 {
            return Err(Error::BufferTooSmall {
                needed: width * 4,
                actual: pitch,
            });
        }
        if buf.len() < pitch * height {
            return Err(Error::BufferTooSmall {
                needed: pitch * height,
                actual: buf.len(),
            });
        }
        trace!(
            "render {}x{} cells into {width}x{height} px",
            canvas.width(),
            canvas.height()
        );

        let (fw, fh) = (usize::from(self.width), usize::from(self.height));
        let frame = canvas.active_frame();
        let mut blank = 0usize;

        for (cy, row) in frame.rows().enumerate() {
            let top = cy * fh;
            if top >= height {
                break;
            }
            for (cx, cell) in row.iter().enumerate() {
                let left = cx * fw;
                if left >= width {
                    break;
                }
                if cell.ch() == MAGIC_FULLWIDTH {
                    continue;
                }

                let glyph = self
                    .glyph(cell.ch())
                    .or_else(|| self.glyph(REPLACEMENT))
                    .or_else(|| self.glyph('?' as u32));
                if glyph.is_none() {
                    blank += 1;
                }
                let argb = cell.attr().to_argb64();
                let bg: [u32; 4] = [0, 1, 2, 3].map(|i| u32::from(argb[i]) * 17);
                let fg: [u32; 4] = [4, 5, 6, 7].map(|i| u32::from(argb[i]) * 17);

                let (gw, gh) =
                    glyph.map_or((0, 0), |g| (usize::from(g.width), usize::from(g.height)));
                let span_w = fw.max(gw);

                for dy in 0..fh.max(gh) {
                    let py = top + dy;
                    if py >= height {
                        break;
                    }
                    let line = &mut buf[py * pitch..py * pitch + width * 4];
                    for dx in 0..span_w {
                        let px = left + dx;
                        if px >= width {
                            break;
                        }
                        let p = match glyph {
                            Some(g) if dx < gw && dy < gh => u32::from(self.pixel(g, dx, dy)),
                            _ => 0,
                        };
                        let out = &mut line[px * 4..px * 4 + 4];
                        for ((o, b), f) in out.iter_mut().zip(bg).zip(fg) {
                            *o = ((b * (255 - p) + f * p) / 255) as u8;
                        }
                    }
                }
            }
        }
        if blank > 0 {
            warn!("{blank} cells had no glyph or fallback glyph, rendered as background");
        }
        Ok(())
    }

    fn pixel(&self, glyph: &Glyph, x: usize, y: usize) -> u8 {
        self.coverage(glyph, x as u16, y as u16)
    }
}
