//! Destructible obstacle layout, rolled once per arena

use rand::Rng;

use super::grid::{Cell, GridConfig};

/// Roll destructible obstacles over the playable interior.
///
/// Pillar cells and both spawn safe zones are never candidates. Every other
/// interior cell is kept independently when a uniform draw falls below
/// `probability`. An empty layout is valid.
pub fn generate_destructibles<R: Rng + ?Sized>(
    grid: &GridConfig,
    probability: f64,
    rng: &mut R,
) -> Vec<Cell> {
    let candidates = grid
        .domain_cells()
        .filter(|&c| !c.is_lattice() && !grid.is_safe_zone(c));

    let mut cells = Vec::new();
    for cell in candidates {
        if rng.random::<f64>() < probability {
            cells.push(cell);
        }
    }
    log::info!(
        "Generated {} destructible obstacles (p = {})",
        cells.len(),
        probability
    );
    cells
}

/// Cells eligible for destructibles
pub fn eligible_cells(grid: &GridConfig) -> usize {
    grid.domain_cells()
        .filter(|&c| !c.is_lattice() && !grid.is_safe_zone(c))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> GridConfig {
        GridConfig::new(15, 1.0)
    }

    #[test]
    fn test_eligible_count() {
        // 169 interior cells, 49 pillars, 6 safe cells
        assert_eq!(eligible_cells(&grid()), 114);
    }

    #[test]
    fn test_probability_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(generate_destructibles(&grid(), 0.0, &mut rng).is_empty());
        let all = generate_destructibles(&grid(), 1.0, &mut rng);
        assert_eq!(all.len(), 114);
    }

    #[test]
    fn test_expected_density() {
        // Mean over many layouts should sit near 0.4 * 114 = 45.6
        let mut rng = Pcg32::seed_from_u64(2024);
        let runs = 400;
        let total: usize = (0..runs)
            .map(|_| generate_destructibles(&grid(), 0.4, &mut rng).len())
            .sum();
        let mean = total as f64 / runs as f64;
        assert!((mean - 45.6).abs() < 2.0, "mean {mean}");
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let a = generate_destructibles(&grid(), 0.4, &mut Pcg32::seed_from_u64(99));
        let b = generate_destructibles(&grid(), 0.4, &mut Pcg32::seed_from_u64(99));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn layout_avoids_pillars_and_safe_zones(seed in any::<u64>(), p in 0.0f64..=1.0) {
            let grid = grid();
            let cells = generate_destructibles(&grid, p, &mut Pcg32::seed_from_u64(seed));
            for cell in cells {
                prop_assert!(grid.in_domain(cell));
                prop_assert!(!(cell.x % 2 == 0 && cell.z % 2 == 0));
                prop_assert!(!grid.is_safe_zone(cell));
            }
        }
    }
}
