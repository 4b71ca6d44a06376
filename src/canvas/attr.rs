//! Attr: the packed 32-bit cell attribute.
//!
//! # Bit Layout
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┬────────┐
//! │ background colour (14 bits)  │ foreground colour (14 bits)  │ style  │
//! │ a3 r4 g4 b3                  │ a3 r4 g4 b3                  │ 4 bits │
//! │ bits 31..18                  │ bits 17..4                   │ 3..0   │
//! └──────────────────────────────┴──────────────────────────────┴────────┘
//! ```
//!
//! A 14-bit colour field is either an ANSI palette index (`0x40 | index`),
//! the terminal default colour (`0x50`), transparency (`0x60`), or a
//! truecolour ARGB value. ARGB values below `0x100` are promoted before
//! packing so they can never be confused with the palette range.

use crate::error::{Error, Result};
use bitflags::bitflags;

/// 16-bit ARGB (4 bits per channel) of the 16 ANSI colours.
pub(crate) const ANSI_ARGB: [u16; 16] = [
    0xf000, 0xf008, 0xf080, 0xf088, 0xf800, 0xf808, 0xf880, 0xfaaa, //
    0xf555, 0xf55f, 0xf5f5, 0xf5ff, 0xff55, 0xff5f, 0xfff5, 0xffff,
];

const FIELD_MASK: u32 = 0x3fff;
const ANSI_BASE: u32 = 0x40;

bitflags! {
    /// Text style flags.
    ///
    /// Style bits are independent of the colour fields and can be OR'd into
    /// an attribute without disturbing its colours.
    ///
    /// # Example
    /// ```
    /// use cellgfx::Style;
    /// let style = Style::BOLD | Style::UNDERLINE;
    /// assert!(style.contains(Style::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        /// Bold text
        const BOLD = 0b0001;
        /// Italic text
        const ITALICS = 0b0010;
        /// Underlined text
        const UNDERLINE = 0b0100;
        /// Blinking text
        const BLINK = 0b1000;
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The ANSI colours, plus the terminal default and transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AnsiColor {
    /// Black
    Black = 0x00,
    /// Blue
    Blue = 0x01,
    /// Green
    Green = 0x02,
    /// Cyan
    Cyan = 0x03,
    /// Red
    Red = 0x04,
    /// Magenta
    Magenta = 0x05,
    /// Brown
    Brown = 0x06,
    /// Light gray
    LightGray = 0x07,
    /// Dark gray
    DarkGray = 0x08,
    /// Light blue
    LightBlue = 0x09,
    /// Light green
    LightGreen = 0x0a,
    /// Light cyan
    LightCyan = 0x0b,
    /// Light red
    LightRed = 0x0c,
    /// Light magenta
    LightMagenta = 0x0d,
    /// Yellow
    Yellow = 0x0e,
    /// White
    White = 0x0f,
    /// The output device's default colour
    Default = 0x10,
    /// Transparent (shows whatever lies beneath)
    Transparent = 0x20,
}

impl AnsiColor {
    const PALETTE: [Self; 16] = [
        Self::Black,
        Self::Blue,
        Self::Green,
        Self::Cyan,
        Self::Red,
        Self::Magenta,
        Self::Brown,
        Self::LightGray,
        Self::DarkGray,
        Self::LightBlue,
        Self::LightGreen,
        Self::LightCyan,
        Self::LightRed,
        Self::LightMagenta,
        Self::Yellow,
        Self::White,
    ];

    /// The palette colour at `index` (0-15).
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 16 {
            Some(Self::PALETTE[index as usize])
        } else {
            None
        }
    }

    /// Palette index (0-15), or `None` for default/transparent.
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Default | Self::Transparent => None,
            other => Some(other as u8),
        }
    }

    /// 16-bit ARGB value of a palette colour.
    pub const fn argb(self) -> Option<u16> {
        match self.index() {
            Some(i) => Some(ANSI_ARGB[i as usize]),
            None => None,
        }
    }
}

impl TryFrom<u8> for AnsiColor {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x10 => Ok(Self::Default),
            0x20 => Ok(Self::Transparent),
            v => Self::from_index(v).ok_or(Error::InvalidColor(v)),
        }
    }
}

/// A decoded colour field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// ANSI palette entry, default or transparent.
    Ansi(AnsiColor),
    /// Truecolour ARGB, 4 bits per channel (`0xARGB`).
    ///
    /// The packed form keeps only 3 bits of alpha and blue; fully clear
    /// and fully set channels survive a round trip, intermediate values
    /// may move by one step.
    Argb(u16),
}

impl Color {
    const fn pack(self) -> u32 {
        match self {
            Self::Ansi(c) => ANSI_BASE | c as u32,
            Self::Argb(v) => {
                let v = if v < 0x100 { v as u32 + 0x100 } else { v as u32 };
                ((v >> 1) & 0x7ff) | ((v >> 13) << 11)
            }
        }
    }

    const fn unpack(field: u32) -> Self {
        match field {
            0x40..=0x4f => Self::Ansi(AnsiColor::PALETTE[(field - ANSI_BASE) as usize]),
            0x50 => Self::Ansi(AnsiColor::Default),
            0x60 => Self::Ansi(AnsiColor::Transparent),
            f => {
                // 3-bit channels replicate their top bit so 0x0 and 0xf survive.
                let a = (f >> 11) & 0x7;
                let b = f & 0x7;
                let a = (a << 1) | (a >> 2);
                let b = (b << 1) | (b >> 2);
                Self::Argb(((a << 12) | (((f >> 7) & 0xf) << 8) | (((f >> 3) & 0xf) << 4) | b) as u16)
            }
        }
    }
}

impl From<AnsiColor> for Color {
    fn from(c: AnsiColor) -> Self {
        Self::Ansi(c)
    }
}

/// A packed cell attribute (colours plus style).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attr(u32);

impl Default for Attr {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Attr {
    /// Default foreground on a transparent background, no style.
    pub const DEFAULT: Self = Self::from_ansi(AnsiColor::Default, AnsiColor::Transparent);

    /// Build an attribute from two colours and a style.
    #[inline]
    pub const fn new(fg: Color, bg: Color, style: Style) -> Self {
        Self((bg.pack() << 18) | (fg.pack() << 4) | style.bits() as u32)
    }

    /// Build an attribute from two ANSI colours.
    #[inline]
    pub const fn from_ansi(fg: AnsiColor, bg: AnsiColor) -> Self {
        Self::new(Color::Ansi(fg), Color::Ansi(bg), Style::empty())
    }

    /// Build an attribute from two 16-bit ARGB colours (`0xARGB`).
    ///
    /// For instance `0xf088` is solid dark cyan and `0x8fff` is white with
    /// 50% alpha.
    #[inline]
    pub const fn from_argb(fg: u16, bg: u16) -> Self {
        Self::new(Color::Argb(fg), Color::Argb(bg), Style::empty())
    }

    /// Reinterpret a raw 32-bit value.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw 32-bit value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Foreground colour.
    #[inline]
    pub const fn fg(self) -> Color {
        Color::unpack((self.0 >> 4) & FIELD_MASK)
    }

    /// Background colour.
    #[inline]
    pub const fn bg(self) -> Color {
        Color::unpack(self.0 >> 18)
    }

    /// Style flags.
    #[inline]
    pub const fn style(self) -> Style {
        Style::from_bits_truncate((self.0 & 0x0f) as u8)
    }

    /// Replace the foreground colour (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self((self.0 & !(FIELD_MASK << 4)) | (fg.pack() << 4))
    }

    /// Replace the background colour (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self((self.0 & !(FIELD_MASK << 18)) | (bg.pack() << 18))
    }

    /// Replace the style flags, keeping colours (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(self, style: Style) -> Self {
        Self((self.0 & !0x0f) | style.bits() as u32)
    }

    /// Foreground as the nearest ANSI colour.
    pub fn to_ansi_fg(self) -> AnsiColor {
        nearest_ansi(self.fg())
    }

    /// Background as the nearest ANSI colour.
    pub fn to_ansi_bg(self) -> AnsiColor {
        nearest_ansi(self.bg())
    }

    /// Foreground as 12-bit RGB (`0xRGB`). Default and transparent
    /// foregrounds read as light gray.
    pub const fn to_rgb12_fg(self) -> u16 {
        match self.fg() {
            Color::Ansi(c) => match c.argb() {
                Some(v) => v & 0x0fff,
                None => ANSI_ARGB[AnsiColor::LightGray as usize] & 0x0fff,
            },
            Color::Argb(v) => v & 0x0fff,
        }
    }

    /// Background as 12-bit RGB (`0xRGB`). Default and transparent
    /// backgrounds read as black.
    pub const fn to_rgb12_bg(self) -> u16 {
        match self.bg() {
            Color::Ansi(c) => match c.argb() {
                Some(v) => v & 0x0fff,
                None => 0,
            },
            Color::Argb(v) => v & 0x0fff,
        }
    }

    /// Both colours as eight 4-bit channels: background A, R, G, B then
    /// foreground A, R, G, B.
    pub const fn to_argb64(self) -> [u8; 8] {
        let bg = match self.bg() {
            Color::Ansi(AnsiColor::Default) => ANSI_ARGB[AnsiColor::Black as usize],
            Color::Ansi(AnsiColor::Transparent) => 0x0fff,
            Color::Ansi(c) => ANSI_ARGB[c as usize],
            Color::Argb(v) => v,
        };
        let fg = match self.fg() {
            Color::Ansi(AnsiColor::Default) => ANSI_ARGB[AnsiColor::LightGray as usize],
            Color::Ansi(AnsiColor::Transparent) => 0x0fff,
            Color::Ansi(c) => ANSI_ARGB[c as usize],
            Color::Argb(v) => v,
        };
        [
            (bg >> 12) as u8,
            ((bg >> 8) & 0xf) as u8,
            ((bg >> 4) & 0xf) as u8,
            (bg & 0xf) as u8,
            (fg >> 12) as u8,
            ((fg >> 8) & 0xf) as u8,
            ((fg >> 4) & 0xf) as u8,
            (fg & 0xf) as u8,
        ]
    }

    /// Invert both colours: palette colours map to their complement
    /// (black and white swap, red becomes light cyan), ARGB colours have
    /// their RGB channels inverted. Default, transparent and fully
    /// transparent ARGB colours are left alone. Applying it twice gives
    /// back the original attribute.
    #[must_use]
    pub const fn inverted(self) -> Self {
        let fg = invert_field((self.0 >> 4) & FIELD_MASK);
        let bg = invert_field(self.0 >> 18);
        Self((bg << 18) | (fg << 4) | (self.0 & 0x0f))
    }
}

const fn invert_field(field: u32) -> u32 {
    match field {
        0x40..=0x4f => field ^ 0x0f,
        f if f >= 0x800 => f ^ 0x7ff,
        f => f,
    }
}

fn nearest_ansi(color: Color) -> AnsiColor {
    let argb = match color {
        Color::Ansi(c) => return c,
        Color::Argb(v) => v,
    };
    if argb >> 12 < 0x8 {
        return AnsiColor::Transparent;
    }

    let channels = |v: u16| [(v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf];
    let target = channels(argb);

    let mut best = AnsiColor::Default;
    let mut best_dist = u32::MAX;
    for (i, &candidate) in ANSI_ARGB.iter().enumerate() {
        let dist: u32 = channels(candidate)
            .iter()
            .zip(target.iter())
            .map(|(&a, &b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = AnsiColor::PALETTE[i];
        }
    }
    best
}

impl std::fmt::Debug for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attr")
            .field("fg", &self.fg())
            .field("bg", &self.bg())
            .field("style", &self.style())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attr_colours() {
        let attr = Attr::DEFAULT;
        assert_eq!(attr.fg(), Color::Ansi(AnsiColor::Default));
        assert_eq!(attr.bg(), Color::Ansi(AnsiColor::Transparent));
        assert!(attr.style().is_empty());
    }

    #[test]
    fn test_ansi_field_encoding() {
        let attr = Attr::from_ansi(AnsiColor::Red, AnsiColor::Blue);
        assert_eq!((attr.bits() >> 4) & 0x3fff, 0x44);
        assert_eq!(attr.bits() >> 18, 0x41);
    }

    #[test]
    fn test_ansi_round_trip() {
        for i in 0..16 {
            let c = AnsiColor::from_index(i).unwrap();
            let attr = Attr::from_ansi(c, AnsiColor::Black);
            assert_eq!(attr.fg(), Color::Ansi(c));
        }
    }

    #[test]
    fn test_argb_round_trip_extremes() {
        let attr = Attr::from_argb(0xf0f0, 0xf00f);
        assert_eq!(attr.fg(), Color::Argb(0xf0f0));
        assert_eq!(attr.bg(), Color::Argb(0xf00f));
    }

    #[test]
    fn test_small_argb_never_reads_as_ansi() {
        let attr = Attr::from_argb(0x0042, 0x0000);
        assert!(matches!(attr.fg(), Color::Argb(_)));
        assert!(matches!(attr.bg(), Color::Argb(_)));
    }

    #[test]
    fn test_style_is_orthogonal_to_colour() {
        let attr = Attr::from_ansi(AnsiColor::Yellow, AnsiColor::Blue);
        let styled = attr.with_style(Style::BOLD | Style::BLINK);
        assert_eq!(styled.fg(), attr.fg());
        assert_eq!(styled.bg(), attr.bg());
        assert_eq!(styled.style(), Style::BOLD | Style::BLINK);
    }

    #[test]
    fn test_try_from_rejects_unknown() {
        assert_eq!(AnsiColor::try_from(0x0c).unwrap(), AnsiColor::LightRed);
        assert_eq!(AnsiColor::try_from(0x20).unwrap(), AnsiColor::Transparent);
        assert!(matches!(AnsiColor::try_from(0x11), Err(Error::InvalidColor(0x11))));
    }

    #[test]
    fn test_nearest_ansi() {
        let attr = Attr::from_argb(0xff55, 0xf008);
        assert_eq!(attr.to_ansi_fg(), AnsiColor::LightRed);
        assert_eq!(attr.to_ansi_bg(), AnsiColor::Blue);
        assert_eq!(Attr::from_argb(0x0fff, 0xf000).to_ansi_fg(), AnsiColor::Transparent);
    }

    #[test]
    fn test_rgb12_defaults() {
        let attr = Attr::DEFAULT;
        assert_eq!(attr.to_rgb12_fg(), 0xaaa);
        assert_eq!(attr.to_rgb12_bg(), 0x000);
    }

    #[test]
    fn test_argb64() {
        let attr = Attr::from_ansi(AnsiColor::White, AnsiColor::Blue);
        assert_eq!(attr.to_argb64(), [0xf, 0x0, 0x0, 0x8, 0xf, 0xf, 0xf, 0xf]);
        let transparent = Attr::DEFAULT.to_argb64();
        assert_eq!(transparent[0], 0);
    }

    #[test]
    fn test_inverted_is_involutive() {
        let attrs = [
            Attr::DEFAULT,
            Attr::from_ansi(AnsiColor::Red, AnsiColor::Black),
            Attr::from_argb(0xf123, 0x0abc),
            Attr::from_argb(0x8fff, 0xf000).with_style(Style::ITALICS),
        ];
        for attr in attrs {
            assert_eq!(attr.inverted().inverted(), attr);
        }
        let inv = Attr::from_ansi(AnsiColor::Black, AnsiColor::Red).inverted();
        assert_eq!(inv.fg(), Color::Ansi(AnsiColor::White));
        assert_eq!(inv.bg(), Color::Ansi(AnsiColor::LightCyan));
    }
}
