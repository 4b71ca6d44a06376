//! Dither: converts pixel bitmaps into coloured character cells.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::options::{Algorithm, Antialias, Charset, ColorMode, DitherConfig};
use super::palette::{RGB_PALETTE, RGB_WEIGHT};
use crate::canvas::{AnsiColor, Attr, Canvas};
use crate::error::{Error, Result};
use crate::rect::Rect;

const LUT_SIZE: usize = 4096;
const MAX_LEVEL: i32 = 0xfff;

/// Bit masks locating each channel inside a pixel word.
///
/// A zero alpha mask means the bitmap has no alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMasks {
    /// Red channel mask.
    pub red: u32,
    /// Green channel mask.
    pub green: u32,
    /// Blue channel mask.
    pub blue: u32,
    /// Alpha channel mask.
    pub alpha: u32,
}

impl ChannelMasks {
    /// Create a mask set.
    pub const fn new(red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Little-endian 32-bit BGRA words (`0xAARRGGBB`).
    pub const ARGB32: Self = Self::new(0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000);

    /// Little-endian 24-bit BGR words (`0xRRGGBB`), no alpha.
    pub const RGB24: Self = Self::new(0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0);

    /// 16-bit RGB565 words, no alpha.
    pub const RGB565: Self = Self::new(0xf800, 0x07e0, 0x001f, 0);
}

/// One channel of a pixel word, scaled to 12 bits on extraction.
#[derive(Debug, Clone, Copy)]
struct Channel {
    mask: u32,
    shift: u32,
    max: u32,
}

impl Channel {
    const fn new(mask: u32) -> Self {
        if mask == 0 {
            return Self {
                mask: 0,
                shift: 0,
                max: 0,
            };
        }
        let shift = mask.trailing_zeros();
        Self {
            mask,
            shift,
            max: mask >> shift,
        }
    }

    fn extract(self, word: u32) -> i32 {
        if self.max == 0 {
            return 0;
        }
        let v = u64::from((word & self.mask) >> self.shift);
        (v * MAX_LEVEL as u64 / u64::from(self.max)) as i32
    }
}

/// A dithering context for one bitmap format.
///
/// The context describes pixel geometry and the current strategy
/// selections; it holds no reference to any bitmap or canvas and can
/// dither any number of bitmaps of its format.
///
/// # Example
/// ```
/// use cellgfx::{Canvas, ChannelMasks, Dither};
///
/// let pixels = [0xffu8; 4 * 4 * 2];
/// let dither = Dither::new(32, 4, 2, 16, ChannelMasks::ARGB32).unwrap();
/// let mut cv = Canvas::new(4, 2).unwrap();
/// dither.bitmap(&mut cv, 0, 0, 4, 2, &pixels).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Dither {
    bpp: u32,
    width: u32,
    height: u32,
    pitch: u32,
    channels: [Channel; 4],
    has_alpha: bool,
    /// 12-bit RGBA per index, 8 bpp only.
    palette: Option<Box<[[i32; 4]; 256]>>,
    brightness: f32,
    gamma: f32,
    contrast: f32,
    invert: bool,
    lut: Vec<u16>,
    antialias: Antialias,
    color: ColorMode,
    charset: Charset,
    algorithm: Algorithm,
    seed: u64,
}

impl Dither {
    /// Create a context for bitmaps of the given format with default
    /// settings.
    ///
    /// `bpp` must be 8, 16, 24 or 32; pixel words are little-endian. For
    /// 8 bpp the masks are ignored and colours come from the palette
    /// (a gray ramp until [`Dither::set_palette`] is called).
    ///
    /// # Errors
    /// [`Error::InvalidGeometry`] for an unsupported depth, zero
    /// dimensions or a pitch shorter than one row of pixels.
    pub fn new(bpp: u32, width: u32, height: u32, pitch: u32, masks: ChannelMasks) -> Result<Self> {
        Self::with_config(bpp, width, height, pitch, masks, DitherConfig::default())
    }

    /// Create a context and apply `config`.
    ///
    /// # Errors
    /// As [`Dither::new`], plus [`Error::InvalidValue`] for out-of-range
    /// tuning values in `config`.
    pub fn with_config(
        bpp: u32,
        width: u32,
        height: u32,
        pitch: u32,
        masks: ChannelMasks,
        config: DitherConfig,
    ) -> Result<Self> {
        if !matches!(bpp, 8 | 16 | 24 | 32) {
            return Err(Error::InvalidGeometry(format!("unsupported depth {bpp} bpp")));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry(format!("empty bitmap {width}x{height}")));
        }
        let row = u64::from(width) * u64::from(bpp / 8);
        if u64::from(pitch) < row {
            return Err(Error::InvalidGeometry(format!(
                "pitch {pitch} shorter than a {row}-byte row"
            )));
        }

        let palette = (bpp == 8).then(|| {
            let mut ramp = Box::new([[0; 4]; 256]);
            for (i, entry) in ramp.iter_mut().enumerate() {
                let v = i as i32 * MAX_LEVEL / 255;
                *entry = [v, v, v, MAX_LEVEL];
            }
            ramp
        });

        let mut dither = Self {
            bpp,
            width,
            height,
            pitch,
            channels: [
                Channel::new(masks.red),
                Channel::new(masks.green),
                Channel::new(masks.blue),
                Channel::new(masks.alpha),
            ],
            has_alpha: bpp != 8 && masks.alpha != 0,
            palette,
            brightness: 1.0,
            gamma: 1.0,
            contrast: 1.0,
            invert: false,
            lut: Vec::new(),
            antialias: config.antialias,
            color: config.color,
            charset: config.charset,
            algorithm: config.algorithm,
            seed: config.seed.unwrap_or_else(|| rand::rng().random()),
        };
        check_value("brightness", config.brightness, |v| v >= 0.0)?;
        check_value("gamma", config.gamma, |v| v != 0.0)?;
        check_value("contrast", config.contrast, |v| v >= 0.0)?;
        dither.brightness = config.brightness;
        dither.gamma = config.gamma;
        dither.contrast = config.contrast;
        dither.rebuild_lut();

        debug!(
            "new dither {bpp} bpp {width}x{height} pitch {pitch}, {} / {} / {} / {}",
            dither.antialias, dither.color, dither.charset, dither.algorithm
        );
        Ok(dither)
    }

    /// Bits per pixel.
    #[inline]
    pub const fn bpp(&self) -> u32 {
        self.bpp
    }

    /// Bitmap width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per bitmap row.
    #[inline]
    pub const fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> DitherConfig {
        DitherConfig {
            brightness: self.brightness,
            gamma: self.gamma,
            contrast: self.contrast,
            antialias: self.antialias,
            color: self.color,
            charset: self.charset,
            algorithm: self.algorithm,
            seed: Some(self.seed),
        }
    }

    /// Set the 8 bpp palette. Components range from 0 to 0xfff.
    ///
    /// # Errors
    /// [`Error::InvalidGeometry`] if the bitmap is not 8 bpp,
    /// [`Error::InvalidValue`] for components above 0xfff.
    pub fn set_palette(
        &mut self,
        red: &[u32; 256],
        green: &[u32; 256],
        blue: &[u32; 256],
        alpha: &[u32; 256],
    ) -> Result<()> {
        let Some(palette) = self.palette.as_mut() else {
            return Err(Error::InvalidGeometry(format!(
                "palette requires 8 bpp, bitmap is {} bpp",
                self.bpp
            )));
        };

        for (name, component) in [("red", red), ("green", green), ("blue", blue), ("alpha", alpha)] {
            if let Some(&bad) = component.iter().find(|&&v| v > MAX_LEVEL as u32) {
                return Err(Error::InvalidValue {
                    name,
                    value: f64::from(bad),
                });
            }
        }

        for (i, entry) in palette.iter_mut().enumerate() {
            *entry = [red[i] as i32, green[i] as i32, blue[i] as i32, alpha[i] as i32];
        }
        self.has_alpha = alpha.iter().any(|&a| a != MAX_LEVEL as u32);
        debug!("dither palette set (alpha {})", self.has_alpha);
        Ok(())
    }

    /// Output multiplier, applied last.
    #[inline]
    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Set the brightness multiplier.
    ///
    /// # Errors
    /// [`Error::InvalidValue`] for negative or non-finite values.
    pub fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        check_value("brightness", brightness, |v| v >= 0.0)?;
        self.brightness = brightness;
        self.rebuild_lut();
        Ok(())
    }

    /// Gamma exponent.
    #[inline]
    pub const fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Set the gamma. A negative value uses its magnitude and inverts the
    /// output colours.
    ///
    /// # Errors
    /// [`Error::InvalidValue`] for zero or non-finite values.
    pub fn set_gamma(&mut self, gamma: f32) -> Result<()> {
        check_value("gamma", gamma, |v| v != 0.0)?;
        self.gamma = gamma;
        self.rebuild_lut();
        Ok(())
    }

    /// Contrast factor.
    #[inline]
    pub const fn contrast(&self) -> f32 {
        self.contrast
    }

    /// Set the contrast around the mid level.
    ///
    /// # Errors
    /// [`Error::InvalidValue`] for negative or non-finite values.
    pub fn set_contrast(&mut self, contrast: f32) -> Result<()> {
        check_value("contrast", contrast, |v| v >= 0.0)?;
        self.contrast = contrast;
        self.rebuild_lut();
        Ok(())
    }

    fn rebuild_lut(&mut self) {
        let gamma = f64::from(self.gamma.abs());
        let contrast = f64::from(self.contrast);
        let brightness = f64::from(self.brightness);
        self.invert = self.gamma < 0.0;

        self.lut = (0..LUT_SIZE)
            .map(|i| {
                let mut v = i as f64 / LUT_SIZE as f64;
                v = v.powf(1.0 / gamma);
                v = (v - 0.5) * contrast + 0.5;
                v *= brightness;
                (v.clamp(0.0, 1.0) * LUT_SIZE as f64).round().min(f64::from(MAX_LEVEL)) as u16
            })
            .collect();
        trace!(
            "dither lut rebuilt: gamma {} contrast {} brightness {}",
            self.gamma,
            self.contrast,
            self.brightness
        );
    }

    /// The sampling mode.
    #[inline]
    pub const fn antialias(&self) -> Antialias {
        self.antialias
    }

    /// Select the sampling mode by key.
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for an unknown key.
    pub fn set_antialias(&mut self, key: &str) -> Result<()> {
        self.antialias = key.parse()?;
        debug!("dither antialias: {}", self.antialias);
        Ok(())
    }

    /// Available sampling modes.
    pub fn antialias_list() -> Vec<(&'static str, &'static str)> {
        Antialias::list()
    }

    /// The colour mode.
    #[inline]
    pub const fn color(&self) -> ColorMode {
        self.color
    }

    /// Select the colour mode by key.
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for an unknown key.
    pub fn set_color(&mut self, key: &str) -> Result<()> {
        self.color = key.parse()?;
        debug!("dither color: {}", self.color);
        Ok(())
    }

    /// Available colour modes.
    pub fn color_list() -> Vec<(&'static str, &'static str)> {
        ColorMode::list()
    }

    /// The glyph set.
    #[inline]
    pub const fn charset(&self) -> Charset {
        self.charset
    }

    /// Select the glyph set by key.
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for an unknown key.
    pub fn set_charset(&mut self, key: &str) -> Result<()> {
        self.charset = key.parse()?;
        debug!("dither charset: {}", self.charset);
        Ok(())
    }

    /// Available glyph sets.
    pub fn charset_list() -> Vec<(&'static str, &'static str)> {
        Charset::list()
    }

    /// The dithering algorithm.
    #[inline]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Select the dithering algorithm by key.
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for an unknown key.
    pub fn set_algorithm(&mut self, key: &str) -> Result<()> {
        self.algorithm = key.parse()?;
        debug!("dither algorithm: {}", self.algorithm);
        Ok(())
    }

    /// Older name of [`Dither::set_algorithm`].
    ///
    /// # Errors
    /// [`Error::InvalidOption`] for an unknown key.
    pub fn set_mode(&mut self, key: &str) -> Result<()> {
        self.set_algorithm(key)
    }

    /// Available dithering algorithms.
    pub fn algorithm_list() -> Vec<(&'static str, &'static str)> {
        Algorithm::list()
    }

    /// Seed used by random dithering. Every pass restarts from it.
    #[inline]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the random dithering seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    // ========================================================================
    // Dithering pass
    // ========================================================================

    /// Dither `pixels` into the region of size `w` x `h` at (`x`, `y`) of
    /// the canvas's active frame.
    ///
    /// The bitmap is stretched over the region; cells outside the canvas
    /// are skipped, as are cells whose sampled alpha is below one half.
    /// The canvas's current attribute is left unchanged.
    ///
    /// # Errors
    /// [`Error::BufferTooSmall`] if `pixels` is shorter than the bitmap
    /// geometry requires.
    pub fn bitmap(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        pixels: &[u8],
    ) -> Result<()> {
        let bytes = (self.bpp / 8) as usize;
        let needed = self.pitch as usize * (self.height as usize - 1) + self.width as usize * bytes;
        if pixels.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }

        let region = Rect::new(x, y, w, h);
        let visible = region.intersection(&canvas.bounds());
        if region.is_empty() || visible.is_empty() {
            return Ok(());
        }
        trace!(
            "dither pass {}x{} px -> {region:?}, visible {visible:?}, {}",
            self.width,
            self.height,
            self.algorithm
        );

        let (fg_set, bg_set) = self.color.candidates();
        let glyphs = self.charset.glyphs();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let span = visible.width as usize;
        let mut err_cur = vec![[0_i32; 3]; span + 2];
        let mut err_next = vec![[0_i32; 3]; span + 2];
        let saved = canvas.attr();

        for cy in visible.y..visible.bottom() {
            for (i, cx) in (visible.x..visible.right()).enumerate() {
                let rgba = self.sample(pixels, i64::from(cx - x), i64::from(cy - y), region);
                if self.has_alpha && rgba[3] < 0x800 {
                    continue;
                }

                let mut rgb = [0; 3];
                for (out, &v) in rgb.iter_mut().zip(&rgba[..3]) {
                    let v = i32::from(self.lut[v.clamp(0, MAX_LEVEL) as usize]);
                    *out = if self.invert { MAX_LEVEL - v } else { v };
                }

                let offset = match self.algorithm {
                    Algorithm::None | Algorithm::FloydSteinberg => 0,
                    Algorithm::Random => (rng.random_range(0..256) - 0x80) * 4,
                    ordered => ordered
                        .threshold(cx as usize, cy as usize)
                        .map_or(0, |t| (t - 0x80) * 4),
                };
                for (c, channel) in rgb.iter_mut().enumerate() {
                    let carried = if self.algorithm == Algorithm::FloydSteinberg {
                        err_cur[i + 1][c]
                    } else {
                        0
                    };
                    *channel = (*channel + offset + carried).clamp(0, MAX_LEVEL);
                }

                let (fg, bg, glyph, shown) = quantize(rgb, fg_set, bg_set, glyphs.len());

                if self.algorithm == Algorithm::FloydSteinberg {
                    for c in 0..3 {
                        let e = rgb[c] - shown[c];
                        err_cur[i + 2][c] += e * 7 / 16;
                        err_next[i][c] += e * 3 / 16;
                        err_next[i + 1][c] += e * 5 / 16;
                        err_next[i + 2][c] += e / 16;
                    }
                }

                canvas.set_attr(Attr::from_ansi(ansi(fg), ansi(bg)));
                canvas.put_char(cx, cy, glyphs[glyph] as u32);
            }

            std::mem::swap(&mut err_cur, &mut err_next);
            err_next.fill([0; 3]);
        }

        canvas.set_attr(saved);
        Ok(())
    }

    /// 12-bit RGBA for cell (`cx`, `cy`) of `region`.
    fn sample(&self, pixels: &[u8], cx: i64, cy: i64, region: Rect) -> [i32; 4] {
        let (bw, bh) = (i64::from(self.width), i64::from(self.height));
        let (rw, rh) = (i64::from(region.width), i64::from(region.height));

        let from_x = cx * bw / rw;
        let to_x = (cx + 1) * bw / rw;
        let from_y = cy * bh / rh;
        let to_y = (cy + 1) * bh / rh;

        match self.antialias {
            Antialias::None => {
                let px = ((from_x + to_x) / 2).min(bw - 1);
                let py = ((from_y + to_y) / 2).min(bh - 1);
                self.pixel(pixels, px as usize, py as usize)
            }
            Antialias::Prefilter => {
                let to_x = to_x.max(from_x + 1).min(bw);
                let to_y = to_y.max(from_y + 1).min(bh);
                let from_x = from_x.min(bw - 1);
                let from_y = from_y.min(bh - 1);

                let mut sum = [0_i64; 4];
                for py in from_y..to_y {
                    for px in from_x..to_x {
                        let p = self.pixel(pixels, px as usize, py as usize);
                        for (s, v) in sum.iter_mut().zip(p) {
                            *s += i64::from(v);
                        }
                    }
                }
                let count = ((to_x - from_x) * (to_y - from_y)).max(1);
                sum.map(|s| (s / count) as i32)
            }
        }
    }

    /// 12-bit RGBA of the pixel at (`x`, `y`).
    fn pixel(&self, pixels: &[u8], x: usize, y: usize) -> [i32; 4] {
        let bytes = (self.bpp / 8) as usize;
        let start = y * self.pitch as usize + x * bytes;
        let word = pixels[start..start + bytes]
            .iter()
            .rev()
            .fold(0_u32, |acc, &b| (acc << 8) | u32::from(b));

        if let Some(palette) = &self.palette {
            return palette[(word & 0xff) as usize];
        }

        let [r, g, b, a] = self.channels;
        let alpha = if self.has_alpha { a.extract(word) } else { MAX_LEVEL };
        [r.extract(word), g.extract(word), b.extract(word), alpha]
    }
}

fn check_value(name: &'static str, value: f32, valid: impl Fn(f32) -> bool) -> Result<()> {
    if value.is_finite() && valid(value) {
        Ok(())
    } else {
        Err(Error::InvalidValue {
            name,
            value: f64::from(value),
        })
    }
}

fn ansi(index: u8) -> AnsiColor {
    AnsiColor::from_index(index).unwrap_or(AnsiColor::Default)
}

fn distance(rgb: [i32; 3], index: u8) -> u64 {
    let pal = RGB_PALETTE[index as usize];
    let d: u64 = rgb
        .iter()
        .zip(pal)
        .map(|(&a, b)| {
            let d = i64::from(a - b);
            (d * d) as u64
        })
        .sum();
    d * 2 / RGB_WEIGHT[index as usize]
}

/// Pick background, foreground and glyph for a colour.
///
/// The background is the nearest allowed colour and the foreground the
/// nearest other one. Glyph `i` of `n` stands for the blend
/// `(i * fg + (n - 1 - i) * bg) / (n - 1)`; the closest blend wins. Also
/// returns that blend.
fn quantize(rgb: [i32; 3], fg_set: &[u8], bg_set: &[u8], n: usize) -> (u8, u8, usize, [i32; 3]) {
    let nearest = |set: &[u8], skip: Option<u8>| {
        set.iter()
            .copied()
            .filter(|&c| Some(c) != skip)
            .min_by_key(|&c| distance(rgb, c))
    };

    let bg = nearest(bg_set, None).unwrap_or(0);
    let fg = nearest(fg_set, Some(bg))
        .or_else(|| fg_set.first().copied())
        .unwrap_or(7);

    let steps = (n.max(2) - 1) as i64;
    let (fgc, bgc) = (RGB_PALETTE[fg as usize], RGB_PALETTE[bg as usize]);
    let blend = |i: i64, c: usize| i * i64::from(fgc[c]) + (steps - i) * i64::from(bgc[c]);

    let glyph = (0..=steps)
        .min_by_key(|&i| {
            (0..3)
                .map(|c| {
                    let d = i64::from(rgb[c]) * steps - blend(i, c);
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .unwrap_or(0);

    let shown = [0, 1, 2].map(|c| (blend(glyph, c) / steps) as i32);
    (fg, bg, glyph as usize, shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argb32(w: u32, h: u32, argb: u32) -> Vec<u8> {
        (0..w * h).flat_map(|_| argb.to_le_bytes()).collect()
    }

    fn solid_dither(w: u32, h: u32, algorithm: &str) -> Dither {
        let mut d = Dither::new(32, w, h, w * 4, ChannelMasks::ARGB32).unwrap();
        d.set_algorithm(algorithm).unwrap();
        d
    }

    #[test]
    fn test_invalid_geometry() {
        let masks = ChannelMasks::ARGB32;
        assert!(matches!(Dither::new(12, 4, 4, 16, masks), Err(Error::InvalidGeometry(_))));
        assert!(matches!(Dither::new(32, 0, 4, 16, masks), Err(Error::InvalidGeometry(_))));
        assert!(matches!(Dither::new(32, 4, 4, 15, masks), Err(Error::InvalidGeometry(_))));
        assert!(Dither::new(24, 4, 4, 12, ChannelMasks::RGB24).is_ok());
    }

    #[test]
    fn test_palette_only_for_8bpp() {
        let zeros = [0u32; 256];
        let mut d = Dither::new(32, 1, 1, 4, ChannelMasks::ARGB32).unwrap();
        assert!(matches!(
            d.set_palette(&zeros, &zeros, &zeros, &zeros),
            Err(Error::InvalidGeometry(_))
        ));

        let mut d = Dither::new(8, 1, 1, 1, ChannelMasks::default()).unwrap();
        let mut bad = [0u32; 256];
        bad[3] = 0x1000;
        assert!(matches!(
            d.set_palette(&bad, &zeros, &zeros, &zeros),
            Err(Error::InvalidValue { name: "red", .. })
        ));
    }

    #[test]
    fn test_tuning_validation() {
        let mut d = Dither::new(32, 1, 1, 4, ChannelMasks::ARGB32).unwrap();
        assert!(matches!(d.set_gamma(0.0), Err(Error::InvalidValue { name: "gamma", .. })));
        assert!(d.set_gamma(f32::NAN).is_err());
        assert!(d.set_brightness(-1.0).is_err());
        d.set_gamma(-1.0).unwrap();
        assert_eq!(d.gamma(), -1.0);
    }

    #[test]
    fn test_identity_lut() {
        let d = Dither::new(32, 1, 1, 4, ChannelMasks::ARGB32).unwrap();
        for v in [0, 1, 0x800, 0xabc, 0xfff] {
            assert_eq!(d.lut[v], v as u16);
        }
    }

    #[test]
    fn test_strategy_setters() {
        let mut d = Dither::new(32, 1, 1, 4, ChannelMasks::ARGB32).unwrap();
        d.set_color("fullgray").unwrap();
        d.set_charset("shades").unwrap();
        d.set_antialias("none").unwrap();
        d.set_mode("ordered4").unwrap();
        assert_eq!(d.color(), ColorMode::FullGray);
        assert_eq!(d.charset(), Charset::Shades);
        assert_eq!(d.antialias(), Antialias::None);
        assert_eq!(d.algorithm(), Algorithm::Ordered4);
        assert!(matches!(d.set_color("32"), Err(Error::InvalidOption { kind: "color", .. })));
        assert_eq!(d.color(), ColorMode::FullGray);

        d.set_algorithm("default").unwrap();
        assert_eq!(d.algorithm(), Algorithm::FloydSteinberg);
    }

    #[test]
    fn test_with_config() {
        let config = DitherConfig {
            charset: Charset::Blocks,
            seed: Some(7),
            ..DitherConfig::default()
        };
        let d = Dither::with_config(32, 2, 2, 8, ChannelMasks::ARGB32, config.clone()).unwrap();
        assert_eq!(d.config(), config);
    }

    #[test]
    fn test_white_in_mono() {
        let mut d = solid_dither(4, 4, "none");
        d.set_color("mono").unwrap();
        let mut cv = Canvas::new(2, 2).unwrap();
        d.bitmap(&mut cv, 0, 0, 2, 2, &argb32(4, 4, 0xffff_ffff)).unwrap();
        for cell in cv.cells() {
            assert_eq!(cell.ch(), '8' as u32);
            assert_eq!(cell.attr(), Attr::from_ansi(AnsiColor::LightGray, AnsiColor::Black));
        }
    }

    #[test]
    fn test_negative_gamma_inverts() {
        let mut d = solid_dither(2, 2, "none");
        d.set_gamma(-1.0).unwrap();
        let mut cv = Canvas::new(2, 2).unwrap();
        d.bitmap(&mut cv, 0, 0, 2, 2, &argb32(2, 2, 0xffff_ffff)).unwrap();
        for cell in cv.cells() {
            assert_eq!(cell.ch(), ' ' as u32);
            assert_eq!(cell.attr().to_ansi_bg(), AnsiColor::Black);
        }
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let d = solid_dither(2, 2, "fstein");
        let mut cv = Canvas::new(2, 2).unwrap();
        cv.put_str(0, 0, "ab");
        d.bitmap(&mut cv, 0, 0, 2, 2, &argb32(2, 2, 0x00ff_ffff)).unwrap();
        assert_eq!(cv.char_at(0, 0), 'a' as u32);
        assert_eq!(cv.attr_at(1, 1), Attr::DEFAULT);
    }

    #[test]
    fn test_buffer_too_small() {
        let d = solid_dither(4, 4, "none");
        let mut cv = Canvas::new(4, 4).unwrap();
        let err = d.bitmap(&mut cv, 0, 0, 4, 4, &[0; 63]).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { needed: 64, actual: 63 }));
    }

    #[test]
    fn test_region_is_clipped() {
        let d = solid_dither(4, 4, "ordered8");
        let mut cv = Canvas::new(3, 3).unwrap();
        d.bitmap(&mut cv, -2, 1, 10, 10, &argb32(4, 4, 0xff00_00ff)).unwrap();
        assert_eq!(cv.attr_at(0, 0), Attr::DEFAULT);
        assert_ne!(cv.attr_at(0, 1), Attr::DEFAULT);
        d.bitmap(&mut cv, 0, 0, 0, 3, &argb32(4, 4, 0)).unwrap();
    }

    #[test]
    fn test_canvas_attr_restored() {
        let d = solid_dither(2, 2, "random");
        let mut cv = Canvas::new(2, 2).unwrap();
        cv.set_color_ansi(AnsiColor::Yellow, AnsiColor::Red);
        let before = cv.attr();
        d.bitmap(&mut cv, 0, 0, 2, 2, &argb32(2, 2, 0xff80_8080)).unwrap();
        assert_eq!(cv.attr(), before);
    }

    #[test]
    fn test_quantize_exact_colour() {
        let (fg, bg, glyph, shown) = quantize([0, 0, 0x888], &[0, 1, 2], &[0, 1, 2], 5);
        assert_eq!(bg, 1);
        assert_ne!(fg, 1);
        assert_eq!(glyph, 0);
        assert_eq!(shown, [0, 0, 0x888]);
    }

    #[test]
    fn test_rgb565_channels() {
        let d = Dither::new(16, 1, 1, 2, ChannelMasks::RGB565).unwrap();
        assert_eq!(d.pixel(&0xf800_u16.to_le_bytes(), 0, 0), [0xfff, 0, 0, 0xfff]);
        assert_eq!(d.pixel(&0x07e0_u16.to_le_bytes(), 0, 0), [0, 0xfff, 0, 0xfff]);
    }
}
