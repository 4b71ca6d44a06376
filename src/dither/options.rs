//! Dither strategy selections and their string keys.
//!
//! Each strategy has a fixed set of `(key, description)` pairs. Keys are
//! parsed once into an enum; the dithering pass never compares strings.
//! `"default"` is itself an accepted key.

strategy! {
    /// How source pixels are sampled for each cell.
    Antialias, "antialias", default = Prefilter {
        None => ("none", "No antialiasing"),
        #[default]
        Prefilter => ("prefilter", "Prefilter antialiasing"),
    }
}

strategy! {
    /// Which palette colours may appear as foreground and background.
    ColorMode, "color", default = Full16 {
        Mono => ("mono", "white on black"),
        Gray => ("gray", "grayscale on black"),
        Ansi8 => ("8", "8 colours on black"),
        Ansi16 => ("16", "16 colours on black"),
        FullGray => ("fullgray", "full grayscale"),
        Full8 => ("full8", "full 8 colours"),
        #[default]
        Full16 => ("full16", "full 16 colours"),
    }
}

strategy! {
    /// The glyphs used to render coverage.
    Charset, "charset", default = Ascii {
        #[default]
        Ascii => ("ascii", "plain ASCII"),
        Shades => ("shades", "CP437 shades"),
        Blocks => ("blocks", "Unicode quarter-cell blocks"),
    }
}

strategy! {
    /// Error shaping applied before quantization.
    Algorithm, "algorithm", default = FloydSteinberg {
        None => ("none", "no dithering"),
        Ordered2 => ("ordered2", "2x2 ordered dithering"),
        Ordered4 => ("ordered4", "4x4 ordered dithering"),
        Ordered8 => ("ordered8", "8x8 ordered dithering"),
        Random => ("random", "random dithering"),
        #[default]
        FloydSteinberg => ("fstein", "Floyd-Steinberg dithering"),
    }
}

/// Dither tuning and strategy selections.
///
/// ```
/// use cellgfx::{Algorithm, DitherConfig};
///
/// let config = DitherConfig {
///     algorithm: Algorithm::Ordered4,
///     gamma: 0.8,
///     ..DitherConfig::default()
/// };
/// assert_eq!(config.algorithm.as_str(), "ordered4");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherConfig {
    /// Output multiplier applied after gamma and contrast.
    pub brightness: f32,
    /// Gamma exponent; a negative value also inverts colours.
    pub gamma: f32,
    /// Contrast around the mid level.
    pub contrast: f32,
    /// Sampling mode.
    pub antialias: Antialias,
    /// Colour mode.
    pub color: ColorMode,
    /// Glyph set.
    pub charset: Charset,
    /// Dithering algorithm.
    pub algorithm: Algorithm,
    /// Seed for random dithering; `None` picks one at construction.
    pub seed: Option<u64>,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            gamma: 1.0,
            contrast: 1.0,
            antialias: Antialias::default(),
            color: ColorMode::default(),
            charset: Charset::default(),
            algorithm: Algorithm::default(),
            seed: None,
        }
    }
}
