//! Charset codec: UTF-8, UTF-32 and CP437 conversions.
//!
//! Canvas cells store UTF-32 codepoints. These helpers convert single
//! characters between that representation, UTF-8 byte sequences and the
//! IBM PC code page 437 used by ANSI art.
//!
//! Behaviour with illegal UTF-8 or UTF-32 input is unspecified: callers
//! are expected to pass valid data.

use unicode_width::UnicodeWidthChar;

/// Marker stored in the cell to the right of a fullwidth glyph.
///
/// This value is guaranteed not to be a valid Unicode character.
pub const MAGIC_FULLWIDTH: u32 = 0x000f_fffe;

/// CP437 glyphs for the control range 0x01-0x1f.
const CP437_LOW: [u32; 31] = [
    0x263a, 0x263b, 0x2665, 0x2666, 0x2663, 0x2660, 0x2022, 0x25d8, //
    0x25cb, 0x25d9, 0x2642, 0x2640, 0x266a, 0x266b, 0x263c, 0x25ba, //
    0x25c4, 0x2195, 0x203c, 0x00b6, 0x00a7, 0x25ac, 0x21a8, 0x2191, //
    0x2193, 0x2192, 0x2190, 0x221f, 0x2194, 0x25b2, 0x25bc,
];

/// CP437 glyphs for the upper half 0x80-0xff.
const CP437_HIGH: [u32; 128] = [
    0x00c7, 0x00fc, 0x00e9, 0x00e2, 0x00e4, 0x00e0, 0x00e5, 0x00e7, // 0x80
    0x00ea, 0x00eb, 0x00e8, 0x00ef, 0x00ee, 0x00ec, 0x00c4, 0x00c5,
    0x00c9, 0x00e6, 0x00c6, 0x00f4, 0x00f6, 0x00f2, 0x00fb, 0x00f9, // 0x90
    0x00ff, 0x00d6, 0x00dc, 0x00a2, 0x00a3, 0x00a5, 0x20a7, 0x0192,
    0x00e1, 0x00ed, 0x00f3, 0x00fa, 0x00f1, 0x00d1, 0x00aa, 0x00ba, // 0xa0
    0x00bf, 0x2310, 0x00ac, 0x00bd, 0x00bc, 0x00a1, 0x00ab, 0x00bb,
    0x2591, 0x2592, 0x2593, 0x2502, 0x2524, 0x2561, 0x2562, 0x2556, // 0xb0
    0x2555, 0x2563, 0x2551, 0x2557, 0x255d, 0x255c, 0x255b, 0x2510,
    0x2514, 0x2534, 0x252c, 0x251c, 0x2500, 0x253c, 0x255e, 0x255f, // 0xc0
    0x255a, 0x2554, 0x2569, 0x2566, 0x2560, 0x2550, 0x256c, 0x2567,
    0x2568, 0x2564, 0x2565, 0x2559, 0x2558, 0x2552, 0x2553, 0x256b, // 0xd0
    0x256a, 0x2518, 0x250c, 0x2588, 0x2584, 0x258c, 0x2590, 0x2580,
    0x03b1, 0x00df, 0x0393, 0x03c0, 0x03a3, 0x03c3, 0x00b5, 0x03c4, // 0xe0
    0x03a6, 0x0398, 0x03a9, 0x03b4, 0x221e, 0x03c6, 0x03b5, 0x2229,
    0x2261, 0x00b1, 0x2265, 0x2264, 0x2320, 0x2321, 0x00f7, 0x2248, // 0xf0
    0x00b0, 0x2219, 0x00b7, 0x221a, 0x207f, 0x00b2, 0x25a0, 0x00a0,
];

/// Offsets removed from the accumulated value, indexed by trailing byte count.
const UTF8_OFFSETS: [u32; 6] = [
    0x0000_0000,
    0x0000_3080,
    0x000e_2080,
    0x03c8_2080,
    0xfa08_2080,
    0x8208_2080,
];

const fn trailing_bytes(lead: u8) -> usize {
    match lead {
        0x00..=0xbf => 0,
        0xc0..=0xdf => 1,
        0xe0..=0xef => 2,
        0xf0..=0xf7 => 3,
        0xf8..=0xfb => 4,
        _ => 5,
    }
}

/// Decode one UTF-8 character from the start of `bytes`.
///
/// Returns the codepoint and the number of bytes consumed. If a NUL byte
/// or the end of the slice is reached before the sequence is complete,
/// `(0, 0)` is returned.
pub fn utf8_to_utf32(bytes: &[u8]) -> (u32, usize) {
    let Some(&lead) = bytes.first() else {
        return (0, 0);
    };
    let trailing = trailing_bytes(lead);
    let mut ret: u32 = 0;

    for i in 0..=trailing {
        match bytes.get(i) {
            Some(&b) if b != 0 => {
                ret = ret.wrapping_add(u32::from(b) << (6 * (trailing - i)));
            }
            _ => return (0, 0),
        }
    }

    (ret.wrapping_sub(UTF8_OFFSETS[trailing]), trailing + 1)
}

/// Encode a UTF-32 character as UTF-8 into `buf`.
///
/// Returns the number of bytes written (1 to 4).
pub fn utf32_to_utf8(ch: u32, buf: &mut [u8; 4]) -> usize {
    const MARK: [u32; 5] = [0x00, 0x00, 0xc0, 0xe0, 0xf0];

    if ch < 0x80 {
        buf[0] = ch as u8;
        return 1;
    }

    let bytes = if ch < 0x800 {
        2
    } else if ch < 0x1_0000 {
        3
    } else {
        4
    };

    let mut rest = ch;
    for slot in buf[1..bytes].iter_mut().rev() {
        *slot = ((rest | 0x80) & 0xbf) as u8;
        rest >>= 6;
    }
    buf[0] = (rest | MARK[bytes]) as u8;

    bytes
}

/// Encode a UTF-32 character as an owned UTF-8 string.
///
/// Invalid codepoints (including [`MAGIC_FULLWIDTH`]) produce an empty string.
pub fn utf32_to_string(ch: u32) -> String {
    char::from_u32(ch).map(String::from).unwrap_or_default()
}

/// Convert a UTF-32 character to CP437, or `b'?'` if it has no equivalent.
pub fn utf32_to_cp437(ch: u32) -> u8 {
    if ch < 0x80 {
        return ch as u8;
    }

    if let Some(i) = CP437_LOW.iter().position(|&c| c == ch) {
        return (i + 1) as u8;
    }

    CP437_HIGH
        .iter()
        .position(|&c| c == ch)
        .map_or(b'?', |i| (i + 0x80) as u8)
}

/// Convert a CP437 character to UTF-32.
///
/// Byte 0x00 maps to zero; the other control bytes map to the graphic
/// symbols the IBM PC displayed for them.
pub fn cp437_to_utf32(ch: u8) -> u32 {
    match ch {
        0x00 => 0,
        0x01..=0x1f => CP437_LOW[usize::from(ch) - 1],
        0x20..=0x7f => u32::from(ch),
        _ => CP437_HIGH[usize::from(ch) - 0x80],
    }
}

/// Whether a character occupies two canvas cells.
pub fn is_fullwidth(ch: u32) -> bool {
    char::from_u32(ch).and_then(UnicodeWidthChar::width) == Some(2)
}
