//! Free-cell sampler for power-up placement
//!
//! Rejection sampling over the playable interior. Draws that land on an
//! occupied cell, or on the half of the board a reference point sits in, are
//! thrown away. The attempt cap turns a full board into a skipped spawn
//! instead of an endless loop.

use glam::Vec3;
use rand::Rng;

use super::grid::{Cell, GridConfig};
use super::occupancy::OccupancyIndex;
use crate::consts::DEFAULT_MAX_ATTEMPTS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSampler {
    pub grid: GridConfig,
    /// Draws allowed per call; every draw counts, rejected or not
    pub max_attempts: u32,
}

/// Sign of a world x-coordinate, 0 for the centre column (and NaN)
#[inline]
fn side_of(x: f32) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

impl CellSampler {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Find a free cell and return its world position.
    ///
    /// With a `reference`, cells on the same x-side as the reference are
    /// rejected; the centre column is always allowed, and a reference on the
    /// centre column applies no restriction. `None` means no cell was found
    /// within the attempt cap and the caller should skip this spawn.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        occupancy: &OccupancyIndex,
        reference: Option<Vec3>,
        rng: &mut R,
    ) -> Option<Vec3> {
        self.sample_cell(occupancy, reference, rng)
            .map(|cell| cell.to_world(self.grid.cell_size))
    }

    pub fn sample_cell<R: Rng + ?Sized>(
        &self,
        occupancy: &OccupancyIndex,
        reference: Option<Vec3>,
        rng: &mut R,
    ) -> Option<Cell> {
        let extent = self.grid.extent();
        let avoid_side = reference.map_or(0, |r| side_of(r.x));

        for _ in 0..self.max_attempts {
            let cell = Cell::new(
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
            );

            if avoid_side != 0 && cell.x != 0 && cell.x.signum() == avoid_side {
                continue;
            }
            if occupancy.contains(cell) {
                continue;
            }
            return Some(cell);
        }

        log::warn!(
            "No free cell after {} attempts (avoid side {})",
            self.max_attempts,
            avoid_side
        );
        None
    }
}
