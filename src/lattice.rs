//! Fixed-step discretization of the global value range.

use crate::{interval::Interval, solver::SolveError};

// Absorbs floating drift when counting how many steps fit into a width.
const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Upper bound on lattice values and on `positions * lattice values` table cells.
pub const MAX_TABLE_CELLS: usize = 1 << 23;

/// Grid of values `min, min + step, min + 2*step, ...` covering `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    min: f64,
    max: f64,
    step: f64,
    size: usize,
}

impl Lattice {
    /// Lattice covering every interval of the slice with the given `step`.
    pub fn covering(intervals: &[Interval], step: f64) -> Result<Self, SolveError> {
        let hull = Interval::hull(intervals)
            .ok_or_else(|| SolveError::InvalidInterval("interval sequence is empty".to_string()))?;
        Lattice::new(hull.low(), hull.high(), step)
    }

    fn new(min: f64, max: f64, step: f64) -> Result<Self, SolveError> {
        let steps = ((max - min) / step).ceil();
        if !steps.is_finite() || steps < 0.0 || steps >= MAX_TABLE_CELLS as f64 {
            return Err(SolveError::InvalidConfig(format!(
                "step {} splits [{}, {}] into more than {} values",
                step, min, max, MAX_TABLE_CELLS
            )));
        }
        let size = (steps as usize)
            .checked_add(1)
            .ok_or_else(|| SolveError::InvalidConfig(format!("step {} is too small", step)))?;
        Ok(Lattice { min, max, step, size })
    }

    /// Number of cells of a table with one row of lattice values per position.
    /// # Errors
    /// [SolveError::InvalidConfig] when the table would exceed [MAX_TABLE_CELLS].
    pub fn table_cells(&self, positions: usize) -> Result<usize, SolveError> {
        positions
            .checked_mul(self.size)
            .filter(|cells| *cells <= MAX_TABLE_CELLS)
            .ok_or_else(|| {
                SolveError::InvalidConfig(format!(
                    "{} positions over {} lattice values exceed {} table cells",
                    positions, self.size, MAX_TABLE_CELLS
                ))
            })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Index of the lattice point nearest to `value`.
    /// # Errors
    /// [SolveError::OutOfLattice] when the nearest point lies outside the lattice.
    pub fn index_of(&self, value: f64) -> Result<usize, SolveError> {
        let relative = ((value - self.min) / self.step).round();
        if !relative.is_finite() || relative < 0.0 || relative >= self.size as f64 {
            return Err(SolveError::OutOfLattice {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(relative as usize)
    }

    pub fn value_at(&self, index: usize) -> f64 {
        self.min + index as f64 * self.step
    }

    /// Every value `low + k*step` not exceeding `high` of the interval.
    /// The last value is clamped to `high` so drift never leaves the interval.
    pub fn candidates(&self, interval: &Interval) -> Vec<f64> {
        let count = (interval.width() / self.step + STEP_COUNT_EPSILON).floor() as usize + 1;
        (0..count)
            .map(|k| (interval.low() + k as f64 * self.step).min(interval.high()))
            .collect()
    }
}
