//! Toroidal grid coordinates.
//!
//! The grid has no edge: every coordinate is reduced modulo the grid size
//! when it is constructed or offset. [`GridCoord`] has private fields so the
//! only way to obtain one is through the wrapping constructors, which keeps
//! `0 <= row < size` and `0 <= col < size` true for every value in flight.

use serde::Serialize;
use ts_rs::TS;

/// A cell on the square toroidal grid, stored as `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridCoord {
    /// Row index, `0 <= row < size`.
    row: u32,
    /// Column index, `0 <= col < size`.
    col: u32,
}

impl GridCoord {
    /// Build a coordinate from signed components, wrapping both axes into
    /// `[0, size)`.
    ///
    /// A zero `size` has no valid cells; the origin is returned in that case
    /// rather than dividing by zero. Engine configuration rejects zero-sized
    /// grids before any coordinate is built.
    pub fn wrapped(row: i64, col: i64, size: u32) -> Self {
        Self {
            row: wrap_axis(row, size),
            col: wrap_axis(col, size),
        }
    }

    /// Build a coordinate from unsigned components, wrapping both axes.
    pub fn new(row: u32, col: u32, size: u32) -> Self {
        Self::wrapped(i64::from(row), i64::from(col), size)
    }

    /// Return this coordinate shifted by `(d_row, d_col)`, wrapped.
    pub fn offset(self, d_row: i64, d_col: i64, size: u32) -> Self {
        Self::wrapped(
            i64::from(self.row).saturating_add(d_row),
            i64::from(self.col).saturating_add(d_col),
            size,
        )
    }

    /// Row index.
    pub const fn row(self) -> u32 {
        self.row
    }

    /// Column index.
    pub const fn col(self) -> u32 {
        self.col
    }

    /// Flat index `row * size + col` into a dense grid layer.
    ///
    /// Returns `None` if the coordinate does not belong to a grid of this
    /// size or the product does not fit in `usize`.
    pub fn flat_index(self, size: u32) -> Option<usize> {
        if self.row >= size || self.col >= size {
            return None;
        }
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        let size = usize::try_from(size).ok()?;
        row.checked_mul(size)?.checked_add(col)
    }
}

impl core::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

fn wrap_axis(value: i64, size: u32) -> u32 {
    value
        .checked_rem_euclid(i64::from(size))
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}
