//! Index geometry for LED buffers
//!
//! Buffers are always one-dimensional. A [`Grid`] maps `index = row * cols + col`,
//! a [`GridPlacement`] positions a smaller grid inside a bounding grid, and a
//! [`LedRange`] selects an inclusive span of a strip.

/// Row-major grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// A single row of `count` lights
    pub const fn strip(count: usize) -> Self {
        Self {
            rows: 1,
            cols: count,
        }
    }

    /// Number of lights covered by the grid
    pub const fn count(self) -> usize {
        self.rows * self.cols
    }

    pub const fn row_of(self, n: usize) -> usize {
        if self.cols == 0 { 0 } else { n / self.cols }
    }

    pub const fn col_of(self, n: usize) -> usize {
        if self.cols == 0 { 0 } else { n % self.cols }
    }

    /// Index of a cell, `None` when outside the grid
    pub const fn index(self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

/// Placement of a sub-rectangle inside a larger bounding grid
///
/// The origin may be negative or hang over the far edges; cells that land
/// outside the bounding grid are reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub row0: i32,
    pub col0: i32,
    pub bounds: Grid,
}

impl GridPlacement {
    pub const fn new(row0: i32, col0: i32, bounds: Grid) -> Self {
        Self { row0, col0, bounds }
    }

    /// Map local index `n` of `local` into the bounding grid
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn target_index(self, local: Grid, n: usize) -> Option<usize> {
        let row = i64::from(self.row0) + local.row_of(n) as i64;
        let col = i64::from(self.col0) + local.col_of(n) as i64;
        if row < 0 || col < 0 {
            return None;
        }
        self.bounds.index(row as usize, col as usize)
    }
}

/// Inclusive range of LED indices within a strip of `total` lights
///
/// Construction validates the range: `end` is raised to `start` and capped
/// at `total - 1`. An empty strip yields an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedRange {
    start: usize,
    end: usize,
    total: usize,
}

impl LedRange {
    pub const fn new(start: usize, end: usize, total: usize) -> Self {
        let mut end = if end < start { start } else { end };
        if total > 0 && end >= total {
            end = total - 1;
        }
        Self { start, end, total }
    }

    /// The whole strip
    pub const fn full(total: usize) -> Self {
        Self::new(0, total.saturating_sub(1), total)
    }

    pub const fn start(self) -> usize {
        self.start
    }

    pub const fn end(self) -> usize {
        self.end
    }

    pub const fn total(self) -> usize {
        self.total
    }

    pub const fn is_empty(self) -> bool {
        self.total == 0 || self.start >= self.total
    }

    /// Number of lights in the range
    pub const fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub const fn contains(self, index: usize) -> bool {
        !self.is_empty() && index >= self.start && index <= self.end
    }

    /// Indices of the range, empty when the strip is empty
    pub fn indices(self) -> core::ops::Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            self.start..self.end + 1
        }
    }

    #[must_use]
    pub const fn with_start(self, start: usize) -> Self {
        Self::new(start, self.end, self.total)
    }

    #[must_use]
    pub const fn with_end(self, end: usize) -> Self {
        Self::new(self.start, end, self.total)
    }

    #[must_use]
    pub const fn with_total(self, total: usize) -> Self {
        Self::new(self.start, self.end, total)
    }
}
