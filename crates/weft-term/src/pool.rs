// SPDX-License-Identifier: MIT
//
// CellPool: a small cache of styled cells.
//
// Widgets paint the same handful of (character, style) pairs over and over:
// spaces in the panel background, border glyphs, the same label text every
// frame. The pool interns those combinations so painting hands back an
// already-built cell instead of assembling one per write.
//
// The pool is an ordinary value owned by whoever drives painting and passed
// down by `&mut`. There is no process-wide instance. The only contract is
// that `get` returns a cell equal to `Cell::styled(ch, style)`; hit/miss
// accounting exists for profiling.

use std::collections::HashMap;

use tracing::debug;

use crate::cell::{Cell, CellStyle};

/// Counters describing how well the pool is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that built a new cell.
    pub misses: u64,
    /// Cells currently cached.
    pub len: usize,
}

/// Interning cache for `(char, CellStyle)` → [`Cell`].
///
/// Bounded: once `capacity` entries are stored, the next miss flushes the
/// whole cache. Working sets in a UI are small and stable, so a flush is
/// rare and cheaper than tracking recency.
///
/// ```
/// use weft_term::cell::{Cell, CellStyle};
/// use weft_term::pool::CellPool;
///
/// let mut pool = CellPool::new();
/// let a = pool.get('x', CellStyle::PLAIN);
/// let b = pool.get('x', CellStyle::PLAIN);
/// assert_eq!(a, b);
/// assert_eq!(a, Cell::new('x'));
/// assert_eq!(pool.stats().hits, 1);
/// ```
#[derive(Debug, Clone)]
pub struct CellPool {
    cells: HashMap<(char, CellStyle), Cell>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl CellPool {
    /// Default number of distinct cells kept before a flush.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Create a pool with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a pool holding at most `capacity` cells. A capacity of 0
    /// disables caching entirely.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity.min(256)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// The cell for `ch` drawn in `style`.
    pub fn get(&mut self, ch: char, style: CellStyle) -> Cell {
        if let Some(cell) = self.cells.get(&(ch, style)) {
            self.hits += 1;
            return *cell;
        }

        self.misses += 1;
        let cell = Cell::styled(ch, style);
        if self.capacity == 0 {
            return cell;
        }
        if self.cells.len() >= self.capacity {
            debug!(capacity = self.capacity, "cell pool full, flushing");
            self.cells.clear();
        }
        self.cells.insert((ch, style), cell);
        cell
    }

    /// A space in `style`, the fill cell for clears and backgrounds.
    #[inline]
    pub fn blank(&mut self, style: CellStyle) -> Cell {
        self.get(' ', style)
    }

    /// Number of cached cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every cached cell and reset the counters.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits,
            misses: self.misses,
            len: self.cells.len(),
        }
    }
}

impl Default for CellPool {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
