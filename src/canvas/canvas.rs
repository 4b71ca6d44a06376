//! Canvas: a multi-frame grid of attributed character cells.

use std::fmt;

use log::debug;
use rand::Rng;

use super::attr::{AnsiColor, Attr, Color, Style};
use super::cell::Cell;
use super::frame::{Frame, FrameId};
use crate::charset::{is_fullwidth, MAGIC_FULLWIDTH};
use crate::error::{Error, Result};
use crate::rect::Rect;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 1 << 20;

/// Largest accepted number of cells per frame.
pub const MAX_CELLS: u64 = 1 << 26;

const SPACE: u32 = ' ' as u32;

/// A character-cell canvas.
///
/// A canvas owns an ordered list of frames of identical size, exactly one
/// of which is active. Drawing operations write to the active frame using
/// the current attribute. Reads outside the canvas never fail: they return
/// a space with the current attribute.
///
/// # Example
/// ```
/// use cellgfx::{AnsiColor, Canvas};
///
/// let mut cv = Canvas::new(10, 2).unwrap();
/// cv.set_color_ansi(AnsiColor::Yellow, AnsiColor::Blue);
/// cv.put_str(1, 0, "hello");
/// assert_eq!(cv.char_at(1, 0), 'h' as u32);
/// assert_eq!(cv.char_at(20, 0), ' ' as u32);
/// ```
pub struct Canvas {
    pub(super) frames: Vec<Frame>,
    pub(super) active: usize,
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) attr: Attr,
    pub(super) cursor: (i32, i32),
    pub(super) handle: (i32, i32),
    next_frame_id: u32,
    refcount: u32,
}

impl Canvas {
    /// Create a canvas with a single frame of blank cells.
    ///
    /// # Errors
    /// [`Error::InvalidSize`] if the dimensions exceed [`MAX_DIMENSION`] or
    /// [`MAX_CELLS`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_size(width, height)?;
        let frame = Frame::new(width as usize, height as usize, Cell::EMPTY, FrameId(0));
        debug!("new canvas {width}x{height}");
        Ok(Self {
            frames: vec![frame],
            active: 0,
            width,
            height,
            attr: Attr::DEFAULT,
            cursor: (0, 0),
            handle: (0, 0),
            next_frame_id: 1,
            refcount: 0,
        })
    }

    /// Canvas width in cells.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in cells.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The whole canvas as a rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Resize every frame.
    ///
    /// Content in the intersection of the old and new bounds is kept.
    /// Newly exposed cells become spaces with the current attribute. The
    /// cursor and handle are clamped to the new size.
    ///
    /// # Errors
    /// [`Error::Busy`] while a display is attached, [`Error::InvalidSize`]
    /// for dimensions over the limits.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        if self.is_attached() {
            return Err(Error::Busy);
        }
        check_size(width, height)?;
        self.resize_frames(width, height);
        Ok(())
    }

    fn resize_frames(&mut self, width: u32, height: u32) {
        let fill = Cell::blank(self.attr);
        for frame in &mut self.frames {
            frame.resize(width as usize, height as usize, fill);
        }
        debug!("canvas resize {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.clamp_positions();
    }

    /// Crop or expand the canvas.
    ///
    /// The new canvas shows the region of size `width` x `height` whose
    /// top-left corner is at (`x`, `y`) in the old one. Cells outside the
    /// old canvas become spaces with the current attribute, and so do
    /// fullwidth glyphs split by the new edges. Every frame is affected.
    ///
    /// # Errors
    /// [`Error::Busy`] while a display is attached, [`Error::InvalidSize`]
    /// for negative or oversized dimensions.
    pub fn set_boundaries(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        if self.is_attached() {
            return Err(Error::Busy);
        }
        if width < 0 || height < 0 {
            return Err(Error::InvalidSize {
                width: i64::from(width) as u64,
                height: i64::from(height) as u64,
            });
        }
        let (w, h) = (width as u32, height as u32);
        check_size(w, h)?;

        let fill = Cell::blank(self.attr);
        for frame in &mut self.frames {
            frame.reframe(i64::from(x), i64::from(y), w as usize, h as usize, fill);
        }
        debug!("canvas boundaries {x},{y} {w}x{h}");
        self.width = w;
        self.height = h;
        let shift = |(px, py): (i32, i32)| {
            let nx = (i64::from(px) - i64::from(x)).clamp(0, i64::from(w));
            let ny = (i64::from(py) - i64::from(y)).clamp(0, i64::from(h));
            (nx as i32, ny as i32)
        };
        self.cursor = shift(self.cursor);
        self.handle = shift(self.handle);
        Ok(())
    }

    fn clamp_positions(&mut self) {
        let (w, h) = (self.width as i32, self.height as i32);
        self.cursor = (self.cursor.0.clamp(0, w), self.cursor.1.clamp(0, h));
        self.handle = (self.handle.0.clamp(0, w), self.handle.1.clamp(0, h));
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// The current drawing attribute.
    #[inline]
    pub const fn attr(&self) -> Attr {
        self.attr
    }

    /// Set the current drawing attribute.
    #[inline]
    pub fn set_attr(&mut self, attr: Attr) {
        self.attr = attr;
    }

    /// Replace the style flags of the current attribute, keeping colours.
    #[inline]
    pub fn set_style(&mut self, style: Style) {
        self.attr = self.attr.with_style(style);
    }

    /// Set the current colours from the ANSI palette, keeping style.
    pub fn set_color_ansi(&mut self, fg: AnsiColor, bg: AnsiColor) {
        self.attr = Attr::new(Color::Ansi(fg), Color::Ansi(bg), self.attr.style());
    }

    /// Set the current colours as 16-bit ARGB values, keeping style.
    pub fn set_color_argb(&mut self, fg: u16, bg: u16) {
        self.attr = Attr::new(Color::Argb(fg), Color::Argb(bg), self.attr.style());
    }

    // ========================================================================
    // Cell access
    // ========================================================================

    /// The cell at (x, y) in the active frame. Outside the canvas this is a
    /// space with the current attribute.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.active_frame()
            .get(x, y)
            .copied()
            .unwrap_or(Cell::blank(self.attr))
    }

    /// The codepoint at (x, y), or a space outside the canvas.
    #[inline]
    pub fn char_at(&self, x: i32, y: i32) -> u32 {
        self.cell_at(x, y).ch()
    }

    /// The attribute at (x, y), or the current attribute outside the canvas.
    #[inline]
    pub fn attr_at(&self, x: i32, y: i32) -> Attr {
        self.cell_at(x, y).attr()
    }

    /// Overwrite the attribute of one cell, keeping its character.
    /// Ignored outside the canvas.
    pub fn put_attr(&mut self, x: i32, y: i32, attr: Attr) {
        if let Some(cell) = self.active_frame_mut().get_mut(x, y) {
            cell.set_attr(attr);
        }
    }

    /// The active frame's cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        self.active_frame().cells()
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write one character with the current attribute.
    ///
    /// A fullwidth character takes two cells, the right one holding
    /// [`MAGIC_FULLWIDTH`]. Fullwidth characters partially overwritten are
    /// completed with a space, and a fullwidth character that would be
    /// split by the canvas edge is written as a space. Writes outside the
    /// canvas are silently dropped.
    ///
    /// Returns the number of cells the character occupies (1 or 2).
    pub fn put_char(&mut self, x: i32, y: i32, ch: u32) -> usize {
        if ch == MAGIC_FULLWIDTH {
            return 1;
        }
        let fullwidth = is_fullwidth(ch);
        let consumed = if fullwidth { 2 } else { 1 };

        if x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return consumed;
        }

        let (x, ch, fullwidth) = if x == -1 && fullwidth {
            (0, SPACE, false)
        } else {
            (x, ch, fullwidth)
        };
        if x < 0 {
            return consumed;
        }

        let width = self.width as usize;
        let attr = self.attr;
        let base = y as usize * width;
        let x = x as usize;
        let row = &mut self.active_frame_mut().cells_mut()[base..base + width];

        // Overwriting the right half of a fullwidth glyph.
        if x > 0 && row[x].is_fullwidth_tail() {
            row[x - 1].set_ch(SPACE);
        }

        let mut ch = ch;
        if fullwidth {
            if x + 1 == width {
                ch = SPACE;
            } else {
                if x + 2 < width && row[x + 2].is_fullwidth_tail() {
                    row[x + 2].set_ch(SPACE);
                }
                row[x + 1] = Cell::new(MAGIC_FULLWIDTH, attr);
            }
        } else if x + 1 < width && row[x + 1].is_fullwidth_tail() {
            row[x + 1].set_ch(SPACE);
        }

        row[x] = Cell::new(ch, attr);
        consumed
    }

    /// Write a UTF-8 string left to right, clipping at the canvas edges.
    ///
    /// Returns the number of cells actually written inside the canvas.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str) -> usize {
        if y < 0 || y >= self.height as i32 || x >= self.width as i32 {
            return 0;
        }

        let width = i64::from(self.width);
        let mut pos = i64::from(x);
        let mut written = 0;

        for ch in text.chars().map(u32::from) {
            if pos >= width {
                break;
            }
            let cells = if is_fullwidth(ch) { 2 } else { 1 };
            if pos + cells > 0 {
                self.put_char(pos as i32, y, ch);
                written += ((pos + cells).min(width) - pos.max(0)) as usize;
            }
            pos += cells;
        }

        written
    }

    /// Write formatted text, see [`Canvas::put_str`].
    ///
    /// ```
    /// # use cellgfx::Canvas;
    /// let mut cv = Canvas::new(20, 1).unwrap();
    /// cv.printf(0, 0, format_args!("{}x{}", 80, 24));
    /// assert_eq!(cv.char_at(2, 0), 'x' as u32);
    /// ```
    pub fn printf(&mut self, x: i32, y: i32, args: fmt::Arguments<'_>) -> usize {
        match args.as_str() {
            Some(s) => self.put_str(x, y, s),
            None => self.put_str(x, y, &args.to_string()),
        }
    }

    /// Fill the active frame with spaces in the current attribute.
    pub fn clear(&mut self) {
        let fill = Cell::blank(self.attr);
        self.active_frame_mut().fill(fill);
    }

    /// Move the cursor.
    #[inline]
    pub fn gotoxy(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    /// The cursor position.
    #[inline]
    pub const fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Set the handle, the point of this canvas that lands on the target
    /// coordinates when it is blitted.
    #[inline]
    pub fn set_handle(&mut self, x: i32, y: i32) {
        self.handle = (x, y);
    }

    /// The handle position.
    #[inline]
    pub const fn handle(&self) -> (i32, i32) {
        self.handle
    }

    // ========================================================================
    // Blit
    // ========================================================================

    /// Copy the active frame of `src` onto this canvas at (`x`, `y`) minus
    /// the source handle.
    ///
    /// When a mask is given, source cells whose mask cell holds a space are
    /// skipped. Cells falling outside this canvas are dropped. Fullwidth
    /// glyphs split by the blit edges are replaced with spaces.
    ///
    /// # Errors
    /// [`Error::MaskMismatch`] if the mask and the source differ in size.
    pub fn blit(&mut self, x: i32, y: i32, src: &Self, mask: Option<&Self>) -> Result<()> {
        if let Some(mask) = mask {
            if mask.width != src.width || mask.height != src.height {
                return Err(Error::MaskMismatch);
            }
        }

        let x = i64::from(x) - i64::from(src.handle.0);
        let y = i64::from(y) - i64::from(src.handle.1);
        let (sw, sh) = (i64::from(src.width), i64::from(src.height));
        let (dw, dh) = (i64::from(self.width), i64::from(self.height));

        let start_i = (-x).max(0);
        let start_j = (-y).max(0);
        let end_i = (dw - x).min(sw);
        let end_j = (dh - y).min(sh);
        if start_i >= end_i || start_j >= end_j {
            return Ok(());
        }

        let src_cells = src.cells();
        let mask_cells = mask.map(Self::cells);
        let stride = (end_i - start_i) as usize;
        let dst_cells = self.active_frame_mut().cells_mut();

        for j in start_j..end_j {
            let dst_ix = ((j + y) * dw + start_i + x) as usize;
            let src_ix = (j * sw + start_i) as usize;

            if start_i + x > 0 && dst_cells[dst_ix].is_fullwidth_tail() {
                dst_cells[dst_ix - 1].set_ch(SPACE);
            }
            if end_i + x < dw && dst_cells[dst_ix + stride].is_fullwidth_tail() {
                dst_cells[dst_ix + stride].set_ch(SPACE);
            }

            let src_row = &src_cells[src_ix..src_ix + stride];
            let dst_row = &mut dst_cells[dst_ix..dst_ix + stride];
            match mask_cells {
                Some(mask_cells) => {
                    let mask_row = &mask_cells[src_ix..src_ix + stride];
                    for ((dst, &cell), m) in dst_row.iter_mut().zip(src_row).zip(mask_row) {
                        if m.ch() != SPACE {
                            *dst = cell;
                        }
                    }
                }
                None => dst_row.copy_from_slice(src_row),
            }

            if src_row[0].is_fullwidth_tail() {
                dst_row[0].set_ch(SPACE);
            }
            if end_i < sw && src_cells[src_ix + stride].is_fullwidth_tail() {
                dst_row[stride - 1].set_ch(SPACE);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Number of frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the active frame.
    #[inline]
    pub const fn frame(&self) -> usize {
        self.active
    }

    /// The active frame.
    #[inline]
    pub fn active_frame(&self) -> &Frame {
        &self.frames[self.active]
    }

    pub(crate) fn active_frame_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.active]
    }

    /// All frames in order.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Activate the frame at `index`. Out-of-range indices are ignored.
    pub fn set_frame(&mut self, index: usize) {
        if index < self.frames.len() {
            self.active = index;
        }
    }

    /// Insert a copy of the active frame at `index`, clamped to
    /// `[0, frame_count]`. The active frame stays the same frame.
    ///
    /// Returns the index the new frame was inserted at.
    pub fn create_frame(&mut self, index: i32) -> usize {
        let index = (index.max(0) as usize).min(self.frames.len());
        let id = FrameId(self.next_frame_id);
        self.next_frame_id = self.next_frame_id.wrapping_add(1);

        let frame = self.active_frame().duplicate(id);
        self.frames.insert(index, frame);
        if self.active >= index {
            self.active += 1;
        }
        debug!("create frame {} at {index} ({} frames)", id.get(), self.frames.len());
        index
    }

    /// Remove the frame at `index`. An index past the end removes the last
    /// frame. If the active frame is removed, frame 0 becomes active.
    ///
    /// # Errors
    /// [`Error::InvalidRange`] for a negative index or when only one frame
    /// is left.
    pub fn free_frame(&mut self, index: i32) -> Result<()> {
        let count = self.frames.len();
        if index < 0 || count == 1 {
            return Err(Error::InvalidRange {
                index: i64::from(index),
                count,
            });
        }
        let index = (index as usize).min(count - 1);
        let frame = self.frames.remove(index);

        if self.active > index {
            self.active -= 1;
        } else if self.active == index {
            self.active = 0;
        }
        debug!("free frame {} at {index} ({} frames)", frame.id().get(), self.frames.len());
        Ok(())
    }

    /// Name of the active frame.
    #[inline]
    pub fn frame_name(&self) -> &str {
        self.active_frame().name()
    }

    /// Rename the active frame.
    pub fn set_frame_name(&mut self, name: &str) {
        self.active_frame_mut().set_name(name);
    }

    // ========================================================================
    // Display exclusivity
    // ========================================================================

    /// Mark the canvas as used by a display. Attachments are counted.
    pub fn attach_display(&mut self) {
        self.refcount += 1;
        debug!("display attached (refcount {})", self.refcount);
    }

    /// Release one display attachment.
    ///
    /// # Errors
    /// [`Error::MissingResource`] if no display is attached.
    pub fn detach_display(&mut self) -> Result<()> {
        if self.refcount == 0 {
            return Err(Error::MissingResource("display".to_string()));
        }
        self.refcount -= 1;
        debug!("display detached (refcount {})", self.refcount);
        Ok(())
    }

    /// Whether a display currently holds the canvas.
    #[inline]
    pub const fn is_attached(&self) -> bool {
        self.refcount > 0
    }

    /// Uniform random integer in `[min, max)`; `min` if the range is empty.
    pub fn rand(min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..max)
    }
}

pub(super) fn check_size(width: u32, height: u32) -> Result<()> {
    if width > MAX_DIMENSION
        || height > MAX_DIMENSION
        || u64::from(width) * u64::from(height) > MAX_CELLS
    {
        return Err(Error::InvalidSize {
            width: u64::from(width),
            height: u64::from(height),
        });
    }
    Ok(())
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            frames: vec![Frame::new(0, 0, Cell::EMPTY, FrameId(0))],
            active: 0,
            width: 0,
            height: 0,
            attr: Attr::DEFAULT,
            cursor: (0, 0),
            handle: (0, 0),
            next_frame_id: 1,
            refcount: 0,
        }
    }
}

impl Clone for Canvas {
    /// Clones are never attached to a display.
    fn clone(&self) -> Self {
        Self {
            frames: self.frames.clone(),
            active: self.active,
            width: self.width,
            height: self.height,
            attr: self.attr,
            cursor: self.cursor,
            handle: self.handle,
            next_frame_id: self.next_frame_id,
            refcount: 0,
        }
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frames", &self.frames.len())
            .field("active", &self.active)
            .field("attr", &self.attr)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cv: &Canvas, y: i32) -> String {
        (0..cv.width() as i32)
            .map(|x| match cv.char_at(x, y) {
                MAGIC_FULLWIDTH => '+',
                c => char::from_u32(c).unwrap_or('?'),
            })
            .collect()
    }

    #[test]
    fn test_new_canvas() {
        let cv = Canvas::new(80, 24).unwrap();
        assert_eq!(cv.width(), 80);
        assert_eq!(cv.height(), 24);
        assert_eq!(cv.frame_count(), 1);
        assert_eq!(cv.cells().len(), 80 * 24);
        assert_eq!(cv.frame_name(), "frame#00000000");
    }

    #[test]
    fn test_zero_size_canvas() {
        let cv = Canvas::default();
        assert_eq!(cv.width(), 0);
        assert!(cv.cells().is_empty());
        assert_eq!(cv.cell_at(0, 0), Cell::blank(Attr::DEFAULT));
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            Canvas::new(MAX_DIMENSION + 1, 1),
            Err(Error::InvalidSize { .. })
        ));
        assert!(matches!(
            Canvas::new(MAX_DIMENSION, MAX_DIMENSION),
            Err(Error::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_read_uses_current_attr() {
        let mut cv = Canvas::new(4, 4).unwrap();
        cv.set_color_ansi(AnsiColor::Red, AnsiColor::Green);
        let cell = cv.cell_at(-1, 2);
        assert_eq!(cell.ch(), SPACE);
        assert_eq!(cell.attr(), cv.attr());
    }

    #[test]
    fn test_set_color_keeps_style() {
        let mut cv = Canvas::new(1, 1).unwrap();
        cv.set_style(Style::BOLD);
        cv.set_color_argb(0xf0f0, 0xf000);
        assert_eq!(cv.attr().style(), Style::BOLD);
        assert_eq!(cv.attr().fg(), Color::Argb(0xf0f0));
    }

    #[test]
    fn test_put_char_fullwidth() {
        let mut cv = Canvas::new(6, 1).unwrap();
        assert_eq!(cv.put_char(1, 0, '日' as u32), 2);
        assert_eq!(row(&cv, 0), " 日+   ");
        assert_eq!(cv.char_at(2, 0), MAGIC_FULLWIDTH);

        // Overwrite the right half: the left half becomes a space.
        cv.put_char(2, 0, 'a' as u32);
        assert_eq!(row(&cv, 0), "  a   ");
    }

    #[test]
    fn test_put_char_overwrites_left_half() {
        let mut cv = Canvas::new(6, 1).unwrap();
        cv.put_char(2, 0, '日' as u32);
        cv.put_char(2, 0, 'b' as u32);
        assert_eq!(row(&cv, 0), "  b   ");
    }

    #[test]
    fn test_put_char_fullwidth_split_by_edge() {
        let mut cv = Canvas::new(4, 1).unwrap();
        cv.put_char(3, 0, '日' as u32);
        assert_eq!(cv.char_at(3, 0), SPACE);

        cv.put_char(-1, 0, '日' as u32);
        assert_eq!(cv.char_at(0, 0), SPACE);
        assert_ne!(cv.char_at(1, 0), MAGIC_FULLWIDTH);
    }

    #[test]
    fn test_put_str_clips() {
        let mut cv = Canvas::new(5, 2).unwrap();
        assert_eq!(cv.put_str(-2, 0, "abcdef"), 4);
        assert_eq!(row(&cv, 0), "cdef ");
        assert_eq!(cv.put_str(3, 1, "xyz"), 2);
        assert_eq!(row(&cv, 1), "   xy");
        assert_eq!(cv.put_str(0, 5, "nope"), 0);
    }

    #[test]
    fn test_printf() {
        let mut cv = Canvas::new(10, 1).unwrap();
        let n = cv.printf(0, 0, format_args!("{:03}", 7));
        assert_eq!(n, 3);
        assert_eq!(row(&cv, 0), "007       ");
    }

    #[test]
    fn test_clear_uses_current_attr() {
        let mut cv = Canvas::new(3, 3).unwrap();
        cv.put_str(0, 0, "abc");
        cv.set_color_ansi(AnsiColor::White, AnsiColor::Blue);
        cv.clear();
        assert!(cv.cells().iter().all(|c| *c == Cell::blank(cv.attr())));
    }

    #[test]
    fn test_resize_clamps_cursor() {
        let mut cv = Canvas::new(10, 10).unwrap();
        cv.gotoxy(11, 3);
        cv.set_size(5, 10).unwrap();
        assert_eq!(cv.cursor(), (5, 3));
    }

    #[test]
    fn test_resize_fills_with_current_attr() {
        let mut cv = Canvas::new(2, 2).unwrap();
        cv.put_char(1, 1, 'z' as u32);
        cv.set_color_ansi(AnsiColor::Black, AnsiColor::White);
        cv.set_size(3, 3).unwrap();
        assert_eq!(cv.char_at(1, 1), 'z' as u32);
        assert_eq!(cv.attr_at(2, 2), cv.attr());
        assert_eq!(cv.attr_at(0, 0), Attr::DEFAULT);
    }

    #[test]
    fn test_attached_canvas_is_busy() {
        let mut cv = Canvas::new(4, 4).unwrap();
        cv.attach_display();
        assert!(matches!(cv.set_size(8, 8), Err(Error::Busy)));
        assert!(matches!(cv.set_boundaries(0, 0, 2, 2), Err(Error::Busy)));
        cv.detach_display().unwrap();
        cv.set_size(8, 8).unwrap();
        assert!(matches!(cv.detach_display(), Err(Error::MissingResource(_))));
    }

    #[test]
    fn test_set_boundaries() {
        let mut cv = Canvas::new(4, 2).unwrap();
        cv.put_str(0, 0, "abcd");
        cv.set_boundaries(1, -1, 5, 3).unwrap();
        assert_eq!((cv.width(), cv.height()), (5, 3));
        assert_eq!(row(&cv, 1), "bcd  ");
        assert_eq!(row(&cv, 0), "     ");
    }

    #[test]
    fn test_set_boundaries_extreme_origin() {
        let mut cv = Canvas::new(4, 2).unwrap();
        cv.gotoxy(3, 1);
        cv.set_handle(2, 2);
        cv.set_boundaries(i32::MIN, i32::MAX, 3, 2).unwrap();
        assert_eq!(cv.cursor(), (3, 0));
        assert_eq!(cv.handle(), (3, 0));
        cv.set_boundaries(i32::MAX, i32::MIN, 3, 2).unwrap();
        assert_eq!(cv.cursor(), (0, 2));
        assert_eq!(row(&cv, 0), "   ");
    }

    #[test]
    fn test_blit_with_handle() {
        let mut dst = Canvas::new(5, 3).unwrap();
        let mut src = Canvas::new(2, 2).unwrap();
        src.put_str(0, 0, "ab");
        src.put_str(0, 1, "cd");
        src.set_handle(1, 1);

        dst.blit(1, 1, &src, None).unwrap();
        assert_eq!(row(&dst, 0), "ab   ");
        assert_eq!(row(&dst, 1), "cd   ");
    }

    #[test]
    fn test_blit_clips() {
        let mut dst = Canvas::new(3, 3).unwrap();
        let mut src = Canvas::new(2, 2).unwrap();
        src.put_str(0, 0, "ab");
        src.put_str(0, 1, "cd");

        dst.blit(2, -1, &src, None).unwrap();
        assert_eq!(row(&dst, 0), "  c");
        assert_eq!(row(&dst, 1), "   ");
    }

    #[test]
    fn test_blit_mask() {
        let mut dst = Canvas::new(3, 1).unwrap();
        dst.put_str(0, 0, "xyz");
        let mut src = Canvas::new(3, 1).unwrap();
        src.put_str(0, 0, "abc");
        let mut mask = Canvas::new(3, 1).unwrap();
        mask.put_str(0, 0, "# #");

        dst.blit(0, 0, &src, Some(&mask)).unwrap();
        assert_eq!(row(&dst, 0), "ayc");

        let bad = Canvas::new(2, 1).unwrap();
        assert!(matches!(dst.blit(0, 0, &src, Some(&bad)), Err(Error::MaskMismatch)));
    }

    #[test]
    fn test_blit_splits_fullwidth() {
        let mut dst = Canvas::new(4, 1).unwrap();
        let mut src = Canvas::new(4, 1).unwrap();
        src.put_str(0, 0, "日本");
        dst.blit(-1, 0, &src, None).unwrap();
        assert_eq!(dst.char_at(0, 0), SPACE);
        assert_eq!(dst.char_at(1, 0), '本' as u32);
    }

    #[test]
    fn test_create_and_free_frame() {
        let mut cv = Canvas::new(2, 2).unwrap();
        cv.put_char(0, 0, 'a' as u32);

        assert_eq!(cv.create_frame(0), 0);
        assert_eq!(cv.frame_count(), 2);
        assert_eq!(cv.frame(), 1);
        assert_eq!(cv.frames()[0].cells()[0].ch(), 'a' as u32);
        assert_ne!(cv.frames()[0].id(), cv.frames()[1].id());
        assert_ne!(cv.frames()[0].name(), cv.frames()[1].name());

        cv.free_frame(0).unwrap();
        assert_eq!(cv.frame_count(), 1);
        assert_eq!(cv.frame(), 0);
        assert_eq!(cv.active_frame().id(), FrameId(0));
    }

    #[test]
    fn test_create_frame_clamps() {
        let mut cv = Canvas::new(1, 1).unwrap();
        assert_eq!(cv.create_frame(-5), 0);
        assert_eq!(cv.create_frame(99), 2);
        assert_eq!(cv.frame_count(), 3);
    }

    #[test]
    fn test_free_frame_errors() {
        let mut cv = Canvas::new(1, 1).unwrap();
        assert!(matches!(cv.free_frame(0), Err(Error::InvalidRange { .. })));
        assert_eq!(cv.frame_count(), 1);

        cv.create_frame(1);
        assert!(matches!(cv.free_frame(-1), Err(Error::InvalidRange { .. })));
        cv.free_frame(7).unwrap();
        assert_eq!(cv.frame_count(), 1);
    }

    #[test]
    fn test_free_active_frame_activates_first() {
        let mut cv = Canvas::new(1, 1).unwrap();
        cv.create_frame(1);
        cv.create_frame(2);
        cv.set_frame(2);
        cv.free_frame(2).unwrap();
        assert_eq!(cv.frame(), 0);
    }

    #[test]
    fn test_set_frame_out_of_range_is_ignored() {
        let mut cv = Canvas::new(1, 1).unwrap();
        cv.create_frame(1);
        cv.set_frame(1);
        cv.set_frame(5);
        assert_eq!(cv.frame(), 1);
    }

    #[test]
    fn test_frame_names() {
        let mut cv = Canvas::new(1, 1).unwrap();
        cv.set_frame_name("intro");
        assert_eq!(cv.frame_name(), "intro");
        cv.create_frame(1);
        cv.set_frame(1);
        assert_eq!(cv.frame_name(), "frame#00000001");
    }

    #[test]
    fn test_rand_range() {
        for _ in 0..100 {
            let v = Canvas::rand(-3, 3);
            assert!((-3..3).contains(&v));
        }
        assert_eq!(Canvas::rand(5, 5), 5);
    }
}
