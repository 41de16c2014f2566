//! Occupancy index
//!
//! Set of cells that cannot receive a new entity. Rebuilt from the live entity
//! lists whenever a placement decision is made; never stored between ticks.

use std::collections::HashSet;

use glam::Vec3;

use super::grid::{Cell, GridConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    cells: HashSet<Cell>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pillars, player spawns, destructibles and collectibles.
    ///
    /// Entity positions are world-space and snapped to the nearest cell.
    pub fn build(
        grid: &GridConfig,
        destructibles: impl IntoIterator<Item = Vec3>,
        collectibles: impl IntoIterator<Item = Vec3>,
    ) -> Self {
        let mut cells: HashSet<Cell> = grid.indestructible_cells().collect();
        cells.extend(grid.player_spawns());
        cells.extend(
            destructibles
                .into_iter()
                .map(|pos| Cell::from_world(pos, grid.cell_size)),
        );
        cells.extend(
            collectibles
                .into_iter()
                .map(|pos| Cell::from_world(pos, grid.cell_size)),
        );
        Self { cells }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

impl FromIterator<Cell> for OccupancyIndex {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridConfig {
        GridConfig::new(15, 1.0)
    }

    #[test]
    fn test_empty_arena_has_pillars_and_spawns() {
        let index = OccupancyIndex::build(&grid(), std::iter::empty(), std::iter::empty());
        assert_eq!(index.len(), 49 + 2);
        assert!(index.contains(Cell::new(0, 0)));
        assert!(index.contains(Cell::new(-6, 6)));
        assert!(index.contains(Cell::new(-5, -5)));
        assert!(index.contains(Cell::new(5, 5)));
        assert!(!index.contains(Cell::new(-5, -4)));
    }

    #[test]
    fn test_entities_snap_to_cells() {
        let walls = [Vec3::new(1.02, 1.0, 2.98)];
        let pickups = [Vec3::new(-2.6, 1.25, 0.4)];
        let index = OccupancyIndex::build(&grid(), walls, pickups);
        assert!(index.contains(Cell::new(1, 3)));
        assert!(index.contains(Cell::new(-3, 0)));
    }

    #[test]
    fn test_scaled_cells() {
        let grid = GridConfig::new(15, 2.0);
        let index = OccupancyIndex::build(&grid, [Vec3::new(6.1, 0.0, -2.0)], std::iter::empty());
        assert!(index.contains(Cell::new(3, -1)));
    }

    #[test]
    fn test_build_is_idempotent() {
        let walls = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, -5.0)];
        let pickups = vec![Vec3::new(-1.0, 1.0, 3.0)];
        let a = OccupancyIndex::build(&grid(), walls.iter().copied(), pickups.iter().copied());
        let b = OccupancyIndex::build(&grid(), walls.iter().copied(), pickups.iter().copied());
        assert_eq!(a, b);
    }
}
