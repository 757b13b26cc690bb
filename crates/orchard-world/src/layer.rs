//! Dense per-cell layers.
//!
//! A [`ResourceLayer`] stores one value per grid cell in a flat `Vec`
//! indexed `row * size + col`. Every access goes through a [`GridCoord`],
//! which is already wrapped, so reads and writes can never address a cell
//! outside the grid.

use orchard_types::GridCoord;

use crate::error::WorldError;

/// Largest supported grid side length.
///
/// Keeps the flat layers comfortably within memory (16M cells per layer).
pub const MAX_GRID_SIZE: u32 = 4096;

/// A grid-sized scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayer<T> {
    /// Side length of the square grid.
    size: u32,
    /// Row-major cell values.
    cells: Vec<T>,
}

impl<T: Copy + Default + PartialEq> ResourceLayer<T> {
    /// Create a layer with every cell set to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] for a zero size and
    /// [`WorldError::GridTooLarge`] above [`MAX_GRID_SIZE`].
    pub fn new(size: u32) -> Result<Self, WorldError> {
        let len = cell_count(size)?;
        Ok(Self {
            size,
            cells: vec![T::default(); len],
        })
    }

    /// Side length of the grid this layer covers.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Value at `coord`.
    ///
    /// Coordinates built for a different grid size fall back to the default
    /// value rather than reading a neighboring cell.
    pub fn get(&self, coord: GridCoord) -> T {
        coord
            .flat_index(self.size)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or_default()
    }

    /// Overwrite the value at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOutOfBounds`] if `coord` does not belong to
    /// this grid.
    pub fn set(&mut self, coord: GridCoord, value: T) -> Result<(), WorldError> {
        let size = self.size;
        let slot = coord
            .flat_index(size)
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(WorldError::CellOutOfBounds { coord, size })?;
        *slot = value;
        Ok(())
    }

    /// Coordinates of every cell whose value differs from the default, in
    /// row-major order.
    pub fn non_default_cells(&self) -> Vec<(GridCoord, T)> {
        let empty = T::default();
        self.coords()
            .zip(self.cells.iter().copied())
            .filter(|(_, value)| *value != empty)
            .collect()
    }

    /// Number of cells whose value differs from the default.
    pub fn count_non_default(&self) -> usize {
        let empty = T::default();
        self.cells.iter().filter(|value| **value != empty).count()
    }

    /// Iterate every coordinate in row-major order.
    fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| GridCoord::new(row, col, size)))
    }
}

/// Number of cells in a `size x size` grid, validated.
fn cell_count(size: u32) -> Result<usize, WorldError> {
    if size == 0 {
        return Err(WorldError::EmptyGrid);
    }
    if size > MAX_GRID_SIZE {
        return Err(WorldError::GridTooLarge {
            size,
            max: MAX_GRID_SIZE,
        });
    }
    let side = usize::try_from(size).map_err(|_err| WorldError::GridTooLarge {
        size,
        max: MAX_GRID_SIZE,
    })?;
    side.checked_mul(side).ok_or(WorldError::GridTooLarge {
        size,
        max: MAX_GRID_SIZE,
    })
}
