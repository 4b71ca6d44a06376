//! Geometric transforms.
//!
//! Mirroring and half turns swap glyphs through pair tables so the
//! result still looks right: `/` becomes `\`, `┌` becomes `┐`. Glyphs
//! without a visual counterpart are kept as-is.

use log::debug;

use super::canvas::check_size;
use super::cell::Cell;
use super::Canvas;
use crate::charset::{is_fullwidth, MAGIC_FULLWIDTH};
use crate::error::{Error, Result};

/// Horizontal mirror pairs.
const FLIP_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('/', '\\'),
    ('<', '>'),
    ('[', ']'),
    ('b', 'd'),
    ('p', 'q'),
    ('{', '}'),
    (';', '⁏'),
    ('`', '´'),
    (',', 'ˎ'),
    ('C', 'Ͻ'),
    ('E', 'Ǝ'),
    ('L', '⅃'),
    ('N', 'И'),
    ('R', 'Я'),
    ('S', 'Ƨ'),
    ('c', 'ɔ'),
    ('e', 'ɘ'),
    ('▌', '▐'),
    ('▖', '▗'),
    ('▘', '▝'),
    ('▙', '▟'),
    ('▚', '▞'),
    ('▛', '▜'),
    ('►', '◄'),
    ('→', '←'),
    ('⌐', '¬'),
    ('┌', '┐'),
    ('└', '┘'),
    ('├', '┤'),
    ('┏', '┓'),
    ('┗', '┛'),
    ('┣', '┫'),
    ('╒', '╕'),
    ('╘', '╛'),
    ('╓', '╖'),
    ('╙', '╜'),
    ('╔', '╗'),
    ('╚', '╝'),
    ('╞', '╡'),
    ('╟', '╢'),
    ('╠', '╣'),
    ('╴', '╶'),
    ('╸', '╺'),
];

/// Vertical mirror pairs.
const FLOP_PAIRS: &[(char, char)] = &[
    ('/', '\\'),
    ('M', 'W'),
    (',', '`'),
    ('b', 'p'),
    ('d', 'q'),
    ('n', 'u'),
    ('m', 'w'),
    ('A', '∀'),
    ('T', '⊥'),
    ('U', '∩'),
    ('v', '^'),
    ('_', '‾'),
    ('\'', '.'),
    ('!', '¡'),
    ('?', '¿'),
    ('▀', '▄'),
    ('▖', '▘'),
    ('▗', '▝'),
    ('▙', '▛'),
    ('▟', '▜'),
    ('▚', '▞'),
    ('↑', '↓'),
    ('▲', '▼'),
    ('┌', '└'),
    ('┐', '┘'),
    ('┬', '┴'),
    ('┏', '┗'),
    ('┓', '┛'),
    ('┳', '┻'),
    ('╒', '╘'),
    ('╕', '╛'),
    ('╓', '╙'),
    ('╖', '╜'),
    ('╔', '╚'),
    ('╗', '╝'),
    ('╦', '╩'),
    ('╵', '╷'),
    ('╹', '╻'),
];

/// Half-turn pairs.
const ROTATE_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
    ('b', 'q'),
    ('d', 'p'),
    ('n', 'u'),
    ('m', 'ɯ'),
    ('h', 'ɥ'),
    ('M', 'W'),
    ('A', '∀'),
    ('L', 'Γ'),
    ('T', '⊥'),
    ('U', '∩'),
    ('V', 'Λ'),
    (',', '\''),
    ('.', '˙'),
    ('!', '¡'),
    ('?', '¿'),
    ('^', 'v'),
    ('_', '‾'),
    ('6', '9'),
    ('▀', '▄'),
    ('▌', '▐'),
    ('▖', '▝'),
    ('▗', '▘'),
    ('▙', '▜'),
    ('▛', '▟'),
    ('►', '◄'),
    ('→', '←'),
    ('↑', '↓'),
    ('▲', '▼'),
    ('┌', '┘'),
    ('┐', '└'),
    ('├', '┤'),
    ('┬', '┴'),
    ('┏', '┛'),
    ('┓', '┗'),
    ('┣', '┫'),
    ('┳', '┻'),
    ('╔', '╝'),
    ('╗', '╚'),
    ('╠', '╣'),
    ('╦', '╩'),
    ('╴', '╶'),
    ('╵', '╷'),
    ('╸', '╺'),
    ('╹', '╻'),
];

/// Quarter-turn cycles, listed in counter-clockwise order.
const QUARTER_CYCLES: &[&[char]] = &[
    &['-', '|'],
    &['/', '\\'],
    &['─', '│'],
    &['━', '┃'],
    &['═', '║'],
    &['▚', '▞'],
    &['<', 'v', '>', '^'],
    &['←', '↓', '→', '↑'],
    &['◄', '▼', '►', '▲'],
    &['▀', '▌', '▄', '▐'],
    &['▘', '▖', '▗', '▝'],
    &['▙', '▟', '▜', '▛'],
    &['┌', '└', '┘', '┐'],
    &['├', '┴', '┤', '┬'],
    &['╔', '╚', '╝', '╗'],
];

fn swap_glyph(pairs: &[(char, char)], ch: u32) -> u32 {
    for &(a, b) in pairs {
        if ch == a as u32 {
            return b as u32;
        }
        if ch == b as u32 {
            return a as u32;
        }
    }
    ch
}

/// Turn a glyph a quarter counter-clockwise, or clockwise when
/// `clockwise` is set.
fn quarter_glyph(ch: u32, clockwise: bool) -> u32 {
    for cycle in QUARTER_CYCLES {
        if let Some(i) = cycle.iter().position(|&c| c as u32 == ch) {
            let n = cycle.len();
            let j = if clockwise { (i + n - 1) % n } else { (i + 1) % n };
            return cycle[j] as u32;
        }
    }
    ch
}

/// Canvas size after a quarter turn of a `width` x `height` canvas.
fn quarter_size(width: u32, height: u32) -> Result<(usize, usize)> {
    let new_w = u64::from(height) * 2;
    let new_h = width.div_ceil(2);
    let new_w = u32::try_from(new_w).map_err(|_| Error::InvalidSize {
        width: new_w,
        height: u64::from(new_h),
    })?;
    check_size(new_w, new_h)?;
    Ok((new_w as usize, new_h as usize))
}

/// After a row has been reversed, the tail of each fullwidth glyph sits
/// to its left. Put the pair back in order.
/// Tails with no fullwidth glyph to their right stay in place.
fn fix_fullwidth_row(row: &mut [Cell]) {
    let mut x = 0;
    while x + 1 < row.len() {
        if row[x].is_fullwidth_tail() && is_fullwidth(row[x + 1].ch()) {
            row.swap(x, x + 1);
            x += 2;
        } else {
            x += 1;
        }
    }
}

impl Canvas {
    /// Invert the colours of every cell in the active frame.
    pub fn invert(&mut self) {
        for cell in self.active_frame_mut().cells_mut() {
            let attr = cell.attr().inverted();
            cell.set_attr(attr);
        }
    }

    /// Mirror the active frame horizontally.
    pub fn flip(&mut self) {
        for row in self.active_frame_mut().rows_mut() {
            row.reverse();
            for cell in row.iter_mut() {
                let ch = swap_glyph(FLIP_PAIRS, cell.ch());
                cell.set_ch(ch);
            }
            fix_fullwidth_row(row);
        }
    }

    /// Mirror the active frame vertically.
    pub fn flop(&mut self) {
        let width = self.width as usize;
        let frame = self.active_frame_mut();
        if width > 0 {
            let height = frame.height();
            let cells = frame.cells_mut();
            for y in 0..height / 2 {
                let (top, bottom) = cells.split_at_mut((height - 1 - y) * width);
                top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
            }
        }
        for cell in frame.cells_mut() {
            let ch = swap_glyph(FLOP_PAIRS, cell.ch());
            cell.set_ch(ch);
        }
    }

    /// Turn the active frame upside down.
    pub fn rotate_180(&mut self) {
        let frame = self.active_frame_mut();
        frame.cells_mut().reverse();
        for row in frame.rows_mut() {
            for cell in row.iter_mut() {
                let ch = swap_glyph(ROTATE_PAIRS, cell.ch());
                cell.set_ch(ch);
            }
            fix_fullwidth_row(row);
        }
    }

    /// Turn every frame a quarter counter-clockwise.
    ///
    /// Cells are moved in horizontal pairs to keep the aspect ratio: the
    /// canvas becomes `2 * height` wide and `ceil(width / 2)` high.
    /// Fullwidth glyphs starting at odd columns are lost.
    ///
    /// # Errors
    /// [`Error::Busy`] while a display is attached.
    pub fn rotate_left(&mut self) -> Result<()> {
        self.rotate_quarter(false)
    }

    /// Turn every frame a quarter clockwise. See [`Canvas::rotate_left`].
    ///
    /// # Errors
    /// [`Error::Busy`] while a display is attached.
    pub fn rotate_right(&mut self) -> Result<()> {
        self.rotate_quarter(true)
    }

    fn rotate_quarter(&mut self, clockwise: bool) -> Result<()> {
        if self.is_attached() {
            return Err(Error::Busy);
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let (new_w, new_h) = quarter_size(self.width, self.height)?;

        for frame in &mut self.frames {
            let src = frame.cells();
            let mut dst = vec![Cell::EMPTY; new_w * new_h];

            for y in 0..h {
                for p in 0..new_h {
                    let a = src[y * w + 2 * p];
                    let b = if 2 * p + 1 < w {
                        src[y * w + 2 * p + 1]
                    } else {
                        Cell::blank(a.attr())
                    };

                    let mut a = a.with_ch(quarter_glyph(a.ch(), clockwise));
                    let mut b = b.with_ch(quarter_glyph(b.ch(), clockwise));
                    if a.ch() == MAGIC_FULLWIDTH {
                        a.set_ch(' ' as u32);
                    }
                    if b.ch() != MAGIC_FULLWIDTH && is_fullwidth(b.ch()) {
                        b.set_ch(' ' as u32);
                    }

                    let (row, col) = if clockwise {
                        (p, 2 * (h - 1 - y))
                    } else {
                        (new_h - 1 - p, 2 * y)
                    };
                    dst[row * new_w + col] = a;
                    dst[row * new_w + col + 1] = b;
                }
            }

            frame.replace(new_w, new_h, dst);
        }

        debug!(
            "rotate {} {w}x{h} -> {new_w}x{new_h}",
            if clockwise { "right" } else { "left" }
        );
        self.width = new_w as u32;
        self.height = new_h as u32;
        self.cursor = (self.cursor.0.min(new_w as i32), self.cursor.1.min(new_h as i32));
        self.handle = (self.handle.0.min(new_w as i32), self.handle.1.min(new_h as i32));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::attr::{AnsiColor, Attr};
    use std::collections::HashSet;

    fn render(cv: &Canvas) -> Vec<String> {
        (0..cv.height() as i32)
            .map(|y| {
                (0..cv.width() as i32)
                    .map(|x| match cv.char_at(x, y) {
                        MAGIC_FULLWIDTH => '+',
                        c => char::from_u32(c).unwrap_or('?'),
                    })
                    .collect()
            })
            .collect()
    }

    fn sample() -> Canvas {
        let mut cv = Canvas::new(6, 3).unwrap();
        cv.put_str(0, 0, "/(<ab");
        cv.set_color_ansi(AnsiColor::Red, AnsiColor::Blue);
        cv.put_str(0, 1, "┌日▀x");
        cv.set_color_argb(0xf123, 0x8abc);
        cv.put_str(1, 2, "q_▙");
        cv
    }

    #[test]
    fn test_pair_tables_have_no_duplicates() {
        for table in [FLIP_PAIRS, FLOP_PAIRS, ROTATE_PAIRS] {
            let mut seen = HashSet::new();
            for &(a, b) in table {
                assert!(seen.insert(a), "duplicate {a:?}");
                assert!(seen.insert(b), "duplicate {b:?}");
            }
        }
        let mut seen = HashSet::new();
        for cycle in QUARTER_CYCLES {
            for &c in *cycle {
                assert!(seen.insert(c), "duplicate {c:?}");
            }
        }
    }

    #[test]
    fn test_flip() {
        let mut cv = Canvas::new(4, 1).unwrap();
        cv.put_str(0, 0, "/(ab");
        cv.flip();
        assert_eq!(render(&cv), ["da)\\"]);
    }

    #[test]
    fn test_flip_keeps_fullwidth_order() {
        let mut cv = Canvas::new(4, 1).unwrap();
        cv.put_str(0, 0, "日x");
        cv.flip();
        assert_eq!(render(&cv), [" x日+"]);
    }

    #[test]
    fn test_flip_and_rotate_with_cropped_fullwidth() {
        let mut cv = Canvas::new(5, 1).unwrap();
        cv.put_str(0, 0, "x日日");
        cv.set_boundaries(2, 0, 4, 1).unwrap();
        assert_eq!(render(&cv), [" 日+ "]);
        let original = cv.cells().to_vec();

        cv.flip();
        cv.flip();
        assert_eq!(cv.cells(), &original[..]);

        cv.rotate_180();
        cv.rotate_180();
        assert_eq!(cv.cells(), &original[..]);
    }

    #[test]
    fn test_mirrored_rows_with_stray_tails() {
        let tail = Cell::new(MAGIC_FULLWIDTH, Attr::DEFAULT);
        let wide = Cell::new(0x65e5, Attr::DEFAULT);
        let c = Cell::new('c' as u32, Attr::DEFAULT);
        let rows = [
            vec![tail, c, wide, tail, Cell::EMPTY],
            vec![c, tail, wide, tail],
            vec![tail, wide, tail, tail, c],
            vec![wide, tail, tail, tail],
        ];
        for original in rows {
            let mut row = original.clone();
            for _ in 0..2 {
                row.reverse();
                fix_fullwidth_row(&mut row);
            }
            assert_eq!(row, original);
        }
    }

    #[test]
    fn test_quarter_size_respects_cell_limit() {
        assert_eq!(quarter_size(5, 3).unwrap(), (6, 3));
        assert_eq!(quarter_size(8192, 8191).unwrap(), (16382, 4096));
        assert!(matches!(
            quarter_size(8193, 8191),
            Err(Error::InvalidSize { width: 16382, height: 4097 })
        ));
        assert!(quarter_size(4, 1 << 20).is_err());
    }

    #[test]
    fn test_flop() {
        let mut cv = Canvas::new(2, 3).unwrap();
        cv.put_str(0, 0, "┌▀");
        cv.put_str(0, 2, "ab");
        cv.flop();
        assert_eq!(render(&cv), ["ap", "  ", "└▄"]);
    }

    #[test]
    fn test_rotate_180() {
        let mut cv = Canvas::new(3, 2).unwrap();
        cv.put_str(0, 0, "┌b ");
        cv.put_str(0, 1, "日!");
        cv.rotate_180();
        assert_eq!(render(&cv), ["¡日+", " q┘"]);
    }

    #[test]
    fn test_transforms_are_involutive() {
        let original = sample();
        let cells = original.cells().to_vec();

        let ops: [fn(&mut Canvas); 4] = [Canvas::flip, Canvas::flop, Canvas::rotate_180, Canvas::invert];
        for op in ops {
            let mut cv = original.clone();
            op(&mut cv);
            assert_ne!(cv.cells(), &cells[..]);
            op(&mut cv);
            assert_eq!(cv.cells(), &cells[..]);
        }
    }

    #[test]
    fn test_invert_colours() {
        let mut cv = Canvas::new(1, 1).unwrap();
        cv.set_color_ansi(AnsiColor::Black, AnsiColor::White);
        cv.put_char(0, 0, 'x' as u32);
        cv.invert();
        assert_eq!(cv.attr_at(0, 0), Attr::from_ansi(AnsiColor::White, AnsiColor::Black));
    }

    #[test]
    fn test_rotate_left_geometry() {
        let mut cv = Canvas::new(5, 2).unwrap();
        cv.put_str(0, 0, "ab-de");
        cv.put_str(0, 1, "<ghij");
        cv.rotate_left().unwrap();
        assert_eq!((cv.width(), cv.height()), (4, 3));
        assert_eq!(render(&cv), ["e j ", "|dhi", "abvg"]);
    }

    #[test]
    fn test_rotate_left_then_right_restores() {
        let mut cv = Canvas::new(4, 3).unwrap();
        cv.put_str(0, 0, "/-<▀");
        cv.put_str(0, 1, "ab┌c");
        cv.put_str(0, 2, "├ ▙|");
        let before = cv.cells().to_vec();

        cv.rotate_left().unwrap();
        assert_eq!((cv.width(), cv.height()), (6, 2));
        cv.rotate_right().unwrap();
        assert_eq!((cv.width(), cv.height()), (4, 3));
        assert_eq!(cv.cells(), &before[..]);
    }

    #[test]
    fn test_rotate_drops_odd_fullwidth() {
        let mut cv = Canvas::new(4, 1).unwrap();
        cv.put_str(1, 0, "日");
        cv.rotate_right().unwrap();
        assert_eq!(render(&cv), ["  ", "  "]);
    }

    #[test]
    fn test_rotate_applies_to_all_frames() {
        let mut cv = Canvas::new(2, 1).unwrap();
        cv.create_frame(1);
        cv.rotate_left().unwrap();
        assert!(cv.frames().iter().all(|f| f.width() == 2 && f.height() == 1));
    }

    #[test]
    fn test_rotate_busy() {
        let mut cv = Canvas::new(2, 2).unwrap();
        cv.attach_display();
        assert!(matches!(cv.rotate_left(), Err(Error::Busy)));
    }
}
