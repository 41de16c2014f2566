//! Discrete arena lattice
//!
//! The arena is a square of `size` cells centred on the origin. World space
//! uses x for width and z for depth; y is height and is ignored for placement.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One integer-addressed square of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Snap a world position to the nearest cell
    #[inline]
    pub fn from_world(pos: Vec3, cell_size: f32) -> Self {
        Self {
            x: (pos.x / cell_size).round() as i32,
            z: (pos.z / cell_size).round() as i32,
        }
    }

    /// Floor-level world position of the cell centre
    #[inline]
    pub fn to_world(self, cell_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * cell_size, 0.0, self.z as f32 * cell_size)
    }

    /// Both coordinates even: the fixed pillar lattice
    #[inline]
    pub fn is_lattice(self) -> bool {
        self.x % 2 == 0 && self.z % 2 == 0
    }
}

/// Immutable grid geometry for one arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells per side (odd)
    pub size: i32,
    /// World units per cell
    pub cell_size: f32,
}

impl GridConfig {
    pub fn new(size: i32, cell_size: f32) -> Self {
        Self { size, cell_size }
    }

    /// Largest |coordinate| of the playable interior.
    ///
    /// Bounds both the pillar lattice and the power-up candidate domain; the
    /// outer ring holds the border walls.
    #[inline]
    pub fn extent(&self) -> i32 {
        (self.size - 3) / 2
    }

    /// Whether a cell lies in `[-extent, extent]` on both axes
    pub fn in_domain(&self, cell: Cell) -> bool {
        let e = self.extent();
        (-e..=e).contains(&cell.x) && (-e..=e).contains(&cell.z)
    }

    /// Every cell of the playable interior, x-major
    pub fn domain_cells(&self) -> impl Iterator<Item = Cell> {
        let e = self.extent();
        (-e..=e).flat_map(move |x| (-e..=e).map(move |z| Cell::new(x, z)))
    }

    /// Number of cells in the playable interior
    pub fn domain_len(&self) -> usize {
        let side = (2 * self.extent() + 1) as usize;
        side * side
    }

    /// Indestructible pillars: every (even, even) interior cell
    pub fn indestructible_cells(&self) -> impl Iterator<Item = Cell> {
        self.domain_cells().filter(|c| c.is_lattice())
    }

    /// Player 1 and player 2 start cells (opposite corners of the interior)
    pub fn player_spawns(&self) -> [Cell; 2] {
        let s = self.extent() - 1;
        [Cell::new(-s, -s), Cell::new(s, s)]
    }

    /// Cells kept clear of destructibles around each spawn
    pub fn safe_zones(&self) -> [[Cell; 3]; 2] {
        self.player_spawns().map(|spawn| {
            let step_x = -spawn.x.signum();
            let step_z = -spawn.z.signum();
            [
                spawn,
                Cell::new(spawn.x, spawn.z + step_z),
                Cell::new(spawn.x + step_x, spawn.z),
            ]
        })
    }

    pub fn is_safe_zone(&self, cell: Cell) -> bool {
        self.safe_zones().iter().flatten().any(|&c| c == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_rounds_drift() {
        assert_eq!(Cell::from_world(Vec3::new(2.97, 1.0, -4.02), 1.0), Cell::new(3, -4));
        assert_eq!(Cell::from_world(Vec3::new(3.9, 0.0, -2.1), 2.0), Cell::new(2, -1));
        assert_eq!(Cell::new(-3, 5).to_world(2.0), Vec3::new(-6.0, 0.0, 10.0));
    }

    #[test]
    fn test_default_geometry() {
        let grid = GridConfig::new(15, 1.0);
        assert_eq!(grid.extent(), 6);
        assert_eq!(grid.domain_len(), 169);
        assert_eq!(grid.domain_cells().count(), 169);
        assert_eq!(grid.indestructible_cells().count(), 49);
        assert_eq!(grid.player_spawns(), [Cell::new(-5, -5), Cell::new(5, 5)]);
    }

    #[test]
    fn test_safe_zones_match_spawn_corners() {
        let grid = GridConfig::new(15, 1.0);
        let [p1, p2] = grid.safe_zones();
        let mut p1 = p1.to_vec();
        let mut p2 = p2.to_vec();
        p1.sort();
        p2.sort();
        assert_eq!(p1, vec![Cell::new(-5, -5), Cell::new(-5, -4), Cell::new(-4, -5)]);
        assert_eq!(p2, vec![Cell::new(4, 5), Cell::new(5, 4), Cell::new(5, 5)]);
        assert!(grid.is_safe_zone(Cell::new(5, 4)));
        assert!(!grid.is_safe_zone(Cell::new(4, 4)));
    }

    #[test]
    fn test_in_domain() {
        let grid = GridConfig::new(15, 1.0);
        assert!(grid.in_domain(Cell::new(6, -6)));
        assert!(!grid.in_domain(Cell::new(7, 0)));
        assert!(!grid.in_domain(Cell::new(0, -7)));
    }
}
