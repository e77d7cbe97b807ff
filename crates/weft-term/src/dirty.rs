// SPDX-License-Identifier: MIT
//
// Dirty region tracking.
//
// Every write that changes a cell marks a rectangle dirty. Rather than keep
// one rectangle per cell, the manager folds each new rectangle into any
// tracked rectangle it overlaps or sits flush against, so a run of writes
// across a row collapses into one region.
//
// Merging uses bounding boxes, not polygon union: two regions that merge
// become the smallest rectangle containing both, which may cover a few
// cells that never changed.
//
// Adjacency is strict. Two regions are adjacent only when they
// touch along an edge AND share that edge's full extent: same `y` and
// `height` for side-by-side regions, same `x` and `width` for stacked ones.
// Regions that merely touch at a corner, or along a partial edge, stay
// separate.

use tracing::trace;

// ─── DirtyRegion ─────────────────────────────────────────────────────────────

/// A rectangle of cells that changed since the last render.
///
/// Signed so that callers can pass raw, unclamped arithmetic; the manager
/// refuses anything with a non-positive width or height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRegion {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive): `x + width`, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive): `y + height`, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Number of cells covered. Zero for degenerate regions.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Whether the region covers no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the two regions share at least one cell.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the two regions touch along one full edge.
    ///
    /// Side by side: same row range (`y` and `height` equal) and one's right
    /// edge is the other's left edge. Stacked: same column range (`x` and
    /// `width` equal) and one's bottom edge is the other's top edge.
    /// Symmetric.
    #[must_use]
    pub const fn is_adjacent(&self, other: &Self) -> bool {
        let same_rows = self.y == other.y && self.height == other.height;
        let same_cols = self.x == other.x && self.width == other.width;

        (same_rows && (self.right() == other.x || other.right() == self.x))
            || (same_cols && (self.bottom() == other.y || other.bottom() == self.y))
    }

    /// The smallest region containing both.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

// ─── DirtyRegionManager ──────────────────────────────────────────────────────

/// Tracks dirty rectangles for one buffer, merging as it goes.
///
/// Once [`mark_full_screen`](Self::mark_full_screen) is called, individual
/// rectangles are neither stored nor merged until [`clear`](Self::clear).
///
/// ```
/// use weft_term::dirty::{DirtyRegion, DirtyRegionManager};
///
/// let mut dirty = DirtyRegionManager::new();
/// dirty.mark_dirty(0, 0, 10, 10);
/// dirty.mark_dirty(20, 0, 10, 10);
/// dirty.mark_dirty(10, 0, 10, 10); // bridges the gap
/// assert_eq!(dirty.get_merged_regions(), vec![DirtyRegion::new(0, 0, 30, 10)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyRegionManager {
    regions: Vec<DirtyRegion>,
    /// Set by `mark_full_screen`: the screen dimensions to report.
    full_screen: Option<(u16, u16)>,
}

impl DirtyRegionManager {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regions: Vec::new(),
            full_screen: None,
        }
    }

    /// Record a changed rectangle.
    ///
    /// Ignored when the whole screen is already dirty, or when `width` or
    /// `height` is zero or negative.
    pub fn mark_dirty(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if self.full_screen.is_some() {
            return;
        }
        let region = DirtyRegion::new(x, y, width, height);
        if region.is_empty() {
            trace!(?region, "ignoring empty dirty region");
            return;
        }
        self.add_and_merge(region);
    }

    /// Fold `candidate` into every tracked region it overlaps or touches.
    ///
    /// Each merge can make the candidate reach regions it didn't touch
    /// before, so the scan restarts after every merge until the candidate
    /// is isolated.
    fn add_and_merge(&mut self, mut candidate: DirtyRegion) {
        while let Some(i) = self
            .regions
            .iter()
            .position(|r| r.overlaps(&candidate) || r.is_adjacent(&candidate))
        {
            let absorbed = self.regions.remove(i);
            candidate = candidate.merge(&absorbed);
        }
        self.regions.push(candidate);
    }

    /// Mark the whole `width × height` screen dirty, discarding tracked
    /// rectangles.
    pub fn mark_full_screen(&mut self, width: u16, height: u16) {
        self.regions.clear();
        self.full_screen = Some((width, height));
    }

    /// The dirty rectangles: one full-screen rectangle when the full-screen
    /// flag is set, otherwise the merged set in the order it was built.
    #[must_use]
    pub fn get_merged_regions(&self) -> Vec<DirtyRegion> {
        match self.full_screen {
            Some((w, h)) => vec![DirtyRegion::new(0, 0, i32::from(w), i32::from(h))],
            None => self.regions.clone(),
        }
    }

    /// Whether anything is dirty.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.full_screen.is_some() || !self.regions.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn is_full_screen_dirty(&self) -> bool {
        self.full_screen.is_some()
    }

    /// Forget everything, including the full-screen flag.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.full_screen = None;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
