//! Frame: one grid of cells owned by a canvas.
//!
//! Cells are stored contiguously in row-major order:
//! `index = y * width + x`.

use super::cell::Cell;

/// Stable identity of a frame, unaffected by insertions and removals
/// around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u32);

impl FrameId {
    /// The raw identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A grid of cells. Frames are created and destroyed only through
/// [`Canvas`](super::Canvas) operations.
#[derive(Clone)]
pub struct Frame {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    id: FrameId,
    name: String,
}

impl Frame {
    pub(crate) fn new(width: usize, height: usize, fill: Cell, id: FrameId) -> Self {
        Self {
            cells: vec![fill; width * height],
            width,
            height,
            id,
            name: format!("frame#{:08x}", id.0),
        }
    }

    /// Copy this frame's contents under a new identity.
    pub(crate) fn duplicate(&self, id: FrameId) -> Self {
        Self {
            cells: self.cells.clone(),
            width: self.width,
            height: self.height,
            id,
            name: format!("frame#{:08x}", id.0),
        }
    }

    /// Frame width in cells.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Frame height in cells.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the frame holds no cells (zero width or height).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stable frame identity.
    #[inline]
    pub const fn id(&self) -> FrameId {
        self.id
    }

    /// Frame name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// The cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Convert signed coordinates to a linear index.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// The cell at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index_of(x, y).map(|i| &mut self.cells[i])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Cell]> {
        self.cells.chunks_mut(self.width.max(1))
    }

    pub(crate) fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Replace the contents with the region of the old grid starting at
    /// (`x`, `y`) of size `new_width` x `new_height`. Cells outside the
    /// old grid are set to `fill`.
    pub(crate) fn reframe(&mut self, x: i64, y: i64, new_width: usize, new_height: usize, fill: Cell) {
        let mut new_cells = vec![fill; new_width * new_height];

        for row in 0..new_height {
            let sy = y + row as i64;
            if sy < 0 || sy >= self.height as i64 {
                continue;
            }
            let x_start = (-x).max(0);
            let x_end = (self.width as i64 - x).min(new_width as i64);
            if x_start >= x_end {
                continue;
            }
            let (x_start, x_end) = (x_start as usize, x_end as usize);
            let old_col = (x + x_start as i64) as usize;
            let old_row = &self.cells[sy as usize * self.width..(sy as usize + 1) * self.width];
            let len = x_end - x_start;
            let new_start = row * new_width;
            let dst = &mut new_cells[new_start + x_start..new_start + x_end];
            dst.copy_from_slice(&old_row[old_col..old_col + len]);

            // Fullwidth glyphs split by the new edges become spaces.
            if dst[0].is_fullwidth_tail() {
                dst[0].set_ch(' ' as u32);
            }
            if old_row.get(old_col + len).is_some_and(Cell::is_fullwidth_tail) {
                dst[len - 1].set_ch(' ' as u32);
            }
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
    }

    /// Resize, preserving content in the top-left intersection.
    pub(crate) fn resize(&mut self, new_width: usize, new_height: usize, fill: Cell) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        self.reframe(0, 0, new_width, new_height, fill);
    }

    /// Replace the grid wholesale.
    pub(crate) fn replace(&mut self, width: usize, height: usize, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), width * height);
        self.cells = cells;
        self.width = width;
        self.height = height;
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
