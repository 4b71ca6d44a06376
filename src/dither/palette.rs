//! Fixed tables used by the dithering pass.

use super::options::{Algorithm, Charset, ColorMode};
use crate::canvas::attr::ANSI_ARGB;

/// The 16 ANSI colours as 12-bit-per-channel RGB.
pub(crate) const RGB_PALETTE: [[i32; 3]; 16] = {
    let mut out = [[0; 3]; 16];
    let mut i = 0;
    while i < 16 {
        let argb = ANSI_ARGB[i] as i32;
        out[i] = [
            ((argb >> 8) & 0xf) * 0x111,
            ((argb >> 4) & 0xf) * 0x111,
            (argb & 0xf) * 0x111,
        ];
        i += 1;
    }
    out
};

/// Preference for each palette entry: neutral colours count double.
pub(crate) const RGB_WEIGHT: [u64; 16] = [2, 1, 1, 1, 1, 1, 1, 2, 2, 1, 1, 1, 1, 1, 1, 2];

const ALL16: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const ALL8: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
const GRAYS: &[u8] = &[0, 8, 7, 15];
const BLACK: &[u8] = &[0];

impl ColorMode {
    /// Palette indices allowed as `(foreground, background)`.
    pub(crate) const fn candidates(self) -> (&'static [u8], &'static [u8]) {
        match self {
            Self::Mono => (&[7], BLACK),
            Self::Gray => (&[15, 7, 8], BLACK),
            Self::Ansi8 => (ALL8, BLACK),
            Self::Ansi16 => (ALL16, BLACK),
            Self::FullGray => (GRAYS, GRAYS),
            Self::Full8 => (ALL8, ALL8),
            Self::Full16 => (ALL16, ALL16),
        }
    }
}

impl Charset {
    /// Glyphs ordered by increasing coverage, starting with a blank.
    pub(crate) const fn glyphs(self) -> &'static [char] {
        match self {
            Self::Ascii => &[' ', '.', ':', ';', 't', '%', 'S', 'X', '@', '8'],
            Self::Shades => &[' ', '░', '▒', '▓', '█'],
            Self::Blocks => &[' ', '▘', '▚', '▙', '█'],
        }
    }
}

const BAYER2: [[u8; 2]; 2] = [[0, 2], [3, 1]];

const BAYER4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

impl Algorithm {
    /// Ordered threshold in `0..256` for the cell at (`x`, `y`), or `None`
    /// for algorithms that do not use a fixed matrix.
    pub(crate) const fn threshold(self, x: usize, y: usize) -> Option<i32> {
        match self {
            Self::Ordered2 => Some(BAYER2[y % 2][x % 2] as i32 * 64),
            Self::Ordered4 => Some(BAYER4[y % 4][x % 4] as i32 * 16),
            Self::Ordered8 => Some(BAYER8[y % 8][x % 8] as i32 * 4),
            Self::None | Self::Random | Self::FloydSteinberg => None,
        }
    }
}
