// SPDX-License-Identifier: MIT
//
// ScreenBuffer: the 2D cell grid that everything paints to.
//
// Widgets paint into a ScreenBuffer through a PaintContext; the diff
// renderer then compares it against the previous frame's buffer and emits
// escape sequences for the cells that differ.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous, so left-to-right scanning (which the renderer does) is a
//     linear walk.
//
//   - Every write goes through `set_cell`, which skips cells that are
//     already equal. An unchanged cell is therefore never dirty, and an
//     unchanged frame has no dirty regions at all.
//
//   - Out-of-range coordinates are never an error. Reads return `None`,
//     writes are dropped. Debug builds trace the dropped write so that bad
//     layout arithmetic upstream is still visible in logs.

use tracing::debug;

use crate::cell::Cell;
use crate::dirty::{DirtyRegion, DirtyRegionManager};

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// A rectangle in buffer coordinates.
///
/// Unsigned: terminal positions are never negative. Edges saturate at
/// `u16::MAX` instead of overflowing.
///
/// ```
/// use weft_term::buffer::Bounds;
///
/// let b = Bounds::new(10, 5, 80, 24);
/// assert!(b.contains(10, 5));
/// assert!(b.contains(89, 28));
/// assert!(!b.contains(90, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// A rectangle of `width × height` whose origin is this one's origin
    /// moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: u16, dy: u16, width: u16, height: u16) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            width,
            height,
        )
    }

    /// The overlap of two rectangles, or `None` if they share no cells.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        (x2 > x1 && y2 > y1).then(|| Self::new(x1, y1, x2 - x1, y2 - y1))
    }
}

// ─── ScreenBuffer ────────────────────────────────────────────────────────────

/// A 2D grid of cells plus the dirty regions accumulated since the last
/// [`clear_dirty`](Self::clear_dirty).
///
/// ```
/// use weft_term::buffer::ScreenBuffer;
/// use weft_term::cell::Cell;
///
/// let mut buf = ScreenBuffer::new(80, 24);
/// buf.set_cell(5, 3, Cell::new('X'));
/// assert_eq!(buf.get_cell(5, 3), Some(Cell::new('X')));
/// assert_eq!(buf.get_cell(80, 0), None);
/// assert_eq!(buf.get_dirty_regions().len(), 1);
/// ```
#[derive(Clone)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    dirty: DirtyRegionManager,
}

impl ScreenBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer of blank cells with no dirty history.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
            dirty: DirtyRegionManager::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether this buffer has the same dimensions as `other`.
    #[inline]
    #[must_use]
    pub const fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// The whole buffer as a [`Bounds`] at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(0, 0, self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` outside the buffer.
    #[inline]
    #[must_use]
    pub fn get_cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.in_bounds(x, y).then(|| self.cells[self.index(x, y)])
    }

    /// A row as a slice, or `None` if `y` is out of range.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Iterate cells with their `(x, y)` coordinates, row by row.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, Cell)> + '_ {
        let w = usize::from(self.width).max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            // x < width and y < height, both u16.
            ((i % w) as u16, (i / w) as u16, *cell)
        })
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Write `cell` at `(x, y)`.
    ///
    /// Returns `true` if the buffer changed. Writing a cell equal to the one
    /// already there changes nothing and marks nothing dirty. Writes outside
    /// the buffer are dropped.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            #[cfg(debug_assertions)]
            tracing::trace!(x, y, width = self.width, height = self.height, "dropped out-of-bounds write");
            return false;
        }
        let idx = self.index(x, y);
        if self.cells[idx] == cell {
            return false;
        }
        self.cells[idx] = cell;
        self.dirty.mark_dirty(i32::from(x), i32::from(y), 1, 1);
        true
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Reset every cell to blank and mark the whole buffer dirty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.mark_all_dirty();
    }

    /// Change dimensions, keeping the cells that fit in both the old and new
    /// size. New cells are blank; content outside the new size is dropped.
    /// The whole buffer is marked dirty.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        debug!(
            from_w = self.width,
            from_h = self.height,
            to_w = width,
            to_h = height,
            "resizing screen buffer"
        );

        let mut cells = vec![Cell::BLANK; usize::from(width) * usize::from(height)];
        let keep_w = usize::from(width.min(self.width));
        let keep_h = height.min(self.height);
        for y in 0..keep_h {
            let src = self.index(0, y);
            let dst = usize::from(y) * usize::from(width);
            cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }

        self.width = width;
        self.height = height;
        self.cells = cells;
        self.mark_all_dirty();
    }

    // ─── Dirty Tracking ──────────────────────────────────────────────────

    /// Mark a rectangle dirty without writing to it. Zero or negative sizes
    /// are ignored.
    pub fn mark_dirty(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.dirty.mark_dirty(x, y, width, height);
    }

    /// Mark the whole buffer dirty, discarding individual regions.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.mark_full_screen(self.width, self.height);
    }

    /// The full-screen region if everything is dirty, else the merged
    /// regions.
    #[must_use]
    pub fn get_dirty_regions(&self) -> Vec<DirtyRegion> {
        self.dirty.get_merged_regions()
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    #[inline]
    #[must_use]
    pub const fn is_full_screen_dirty(&self) -> bool {
        self.dirty.is_full_screen_dirty()
    }

    /// Forget all dirty tracking.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

/// Two buffers are equal when they show the same picture. Dirty state is
/// bookkeeping and does not take part.
impl PartialEq for ScreenBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.same_size(other) && self.cells == other.cells
    }
}

impl Eq for ScreenBuffer {}

impl std::fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScreenBuffer({}x{})", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
