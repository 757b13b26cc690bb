//! The egocentric observation tensor delivered to each agent per tick.
//!
//! An observation is a dense `5 x 5 x 5` block of `f32` laid out as
//! `[row_offset][col_offset][channel]`, where offsets run from -2 to +2
//! around the observing agent. Index `(2, 2, _)` is the agent's own cell.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Side length of the square observation window.
pub const WINDOW: usize = 5;

/// Number of channels per cell.
pub const CHANNELS: usize = 5;

/// Half-width of the window (cells on each side of the agent).
pub const VIEW_RADIUS: i64 = 2;

/// Shape of every observation tensor.
pub const OBSERVATION_SHAPE: [usize; 3] = [WINDOW, WINDOW, CHANNELS];

/// Total number of values in one observation.
pub const OBSERVATION_LEN: usize = WINDOW * WINDOW * CHANNELS;

/// Meaning of each channel in the observation tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ObservationChannel {
    /// 1.0 if the cell holds a forageable resource.
    Forageable,
    /// Raw sapling growth stage (0 = none).
    Sapling,
    /// 1.0 if the cell carries the hazard marker.
    Hazard,
    /// 1.0 if any agent, the observer included, stands on the cell.
    Occupied,
    /// Observer's stamina divided by 100, constant across the window.
    Stamina,
}

impl ObservationChannel {
    /// Channel position in the innermost tensor axis.
    pub const fn index(self) -> usize {
        match self {
            Self::Forageable => 0,
            Self::Sapling => 1,
            Self::Hazard => 2,
            Self::Occupied => 3,
            Self::Stamina => 4,
        }
    }
}

/// A `5 x 5 x 5` observation tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Observation {
    /// Row-major values, length [`OBSERVATION_LEN`].
    data: Vec<f32>,
}

impl Default for Observation {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Observation {
    /// An all-zero tensor.
    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; OBSERVATION_LEN],
        }
    }

    /// Flat position of `(row, col, channel)`, or `None` if out of bounds.
    fn position(row: usize, col: usize, channel: ObservationChannel) -> Option<usize> {
        if row >= WINDOW || col >= WINDOW {
            return None;
        }
        row.checked_mul(WINDOW)?
            .checked_add(col)?
            .checked_mul(CHANNELS)?
            .checked_add(channel.index())
    }

    /// Read one value.
    pub fn get(&self, row: usize, col: usize, channel: ObservationChannel) -> Option<f32> {
        Self::position(row, col, channel).and_then(|i| self.data.get(i).copied())
    }

    /// Write one value. Returns `false` if the position is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, channel: ObservationChannel, value: f32) -> bool {
        match Self::position(row, col, channel).and_then(|i| self.data.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The raw row-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Tensor shape, always [`OBSERVATION_SHAPE`].
    pub const fn shape(&self) -> [usize; 3] {
        OBSERVATION_SHAPE
    }
}
