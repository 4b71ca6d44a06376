//! Cell: one character position on a canvas frame.
//!
//! A cell is a UTF-32 codepoint plus a packed [`Attr`]. The right half of
//! a fullwidth glyph holds [`MAGIC_FULLWIDTH`] instead of a character.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │  ch (UTF-32)         │  attr (packed)       │
//! │  4 bytes             │  4 bytes             │
//! └──────────────────────┴──────────────────────┘
//! ```

use super::attr::Attr;
use crate::charset::MAGIC_FULLWIDTH;

/// A single canvas cell.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: u32,
    attr: Attr,
}

// Compile-time assertion: cells stay two words wide.
const _: () = assert!(std::mem::size_of::<Cell>() == 8, "Cell must be exactly 8 bytes");

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A space with the default attribute.
    pub const EMPTY: Self = Self::blank(Attr::DEFAULT);

    /// Create a cell from a codepoint and an attribute.
    #[inline]
    pub const fn new(ch: u32, attr: Attr) -> Self {
        Self { ch, attr }
    }

    /// A space with the given attribute.
    #[inline]
    pub const fn blank(attr: Attr) -> Self {
        Self { ch: ' ' as u32, attr }
    }

    /// The stored codepoint.
    #[inline]
    pub const fn ch(&self) -> u32 {
        self.ch
    }

    /// The stored codepoint as a `char`, if it is a valid one.
    #[inline]
    pub const fn as_char(&self) -> Option<char> {
        char::from_u32(self.ch)
    }

    /// The stored attribute.
    #[inline]
    pub const fn attr(&self) -> Attr {
        self.attr
    }

    /// Whether this cell is the right half of a fullwidth glyph.
    #[inline]
    pub const fn is_fullwidth_tail(&self) -> bool {
        self.ch == MAGIC_FULLWIDTH
    }

    /// Replace the codepoint (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_ch(mut self, ch: u32) -> Self {
        self.ch = ch;
        self
    }

    /// Replace the attribute (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_attr(mut self, attr: Attr) -> Self {
        self.attr = attr;
        self
    }

    /// Set the codepoint.
    #[inline]
    pub const fn set_ch(&mut self, ch: u32) -> &mut Self {
        self.ch = ch;
        self
    }

    /// Set the attribute.
    #[inline]
    pub const fn set_attr(&mut self, attr: Attr) -> &mut Self {
        self.attr = attr;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Cell");
        match self.as_char() {
            Some(c) => s.field("ch", &c),
            None if self.is_fullwidth_tail() => s.field("ch", &"<fullwidth>"),
            None => s.field("ch", &format_args!("{:#x}", self.ch)),
        };
        s.field("attr", &self.attr).finish()
    }
}
