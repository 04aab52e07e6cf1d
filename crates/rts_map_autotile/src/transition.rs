//! Transition propagation
//!
//! When a region of the terrain grid is repainted, terrain types that cannot
//! sit next to each other (deep water next to grass, say) are separated by
//! bleeding intermediate types outward from the region, one ring of cells per
//! iteration, until a ring produces no change.

use rts_map_core::{Region, TerrainGrid, TerrainType};
use tracing::debug;

/// Default number of rings walked per edit
pub const DEFAULT_MAX_RINGS: usize = 3;

const DG: TerrainType = TerrainType::DarkGrass;
const LG: TerrainType = TerrainType::LightGrass;
const LD: TerrainType = TerrainType::LightDirt;
const SW: TerrainType = TerrainType::ShallowWater;

/// `TRANSITIONS[placed][existing]` lists the terrain written into ring 0,
/// ring 1, ... between a placed type and an existing neighbor. Indexed by
/// base type; empty means the pair renders without an intermediate.
///
/// Adjacent pairs: dark/light grass, light grass/light dirt, light/dark dirt,
/// light dirt/rock, light grass/forest, light dirt/shallow water,
/// shallow/deep water. Every other pair takes the shortest path through
/// those, cut to two rings.
#[rustfmt::skip]
const TRANSITIONS: [[&[TerrainType]; TerrainType::BASE_COUNT]; TerrainType::BASE_COUNT] = [
    //                 DarkGrass   LightGrass  DarkDirt    LightDirt   Rock        Forest      DeepWater   ShallowWater
    /* DarkGrass    */ [&[],        &[],        &[LG, LD],  &[LG],      &[LG, LD],  &[LG],      &[LG, LD],  &[LG, LD]],
    /* LightGrass   */ [&[],        &[],        &[LD],      &[],        &[LD],      &[],        &[LD, SW],  &[LD]],
    /* DarkDirt     */ [&[LD, LG],  &[LD],      &[],        &[],        &[LD],      &[LD, LG],  &[LD, SW],  &[LD]],
    /* LightDirt    */ [&[LG],      &[],        &[],        &[],        &[],        &[LG],      &[SW],      &[]],
    /* Rock         */ [&[LD, LG],  &[LD],      &[LD],      &[],        &[],        &[LD, LG],  &[LD, SW],  &[LD]],
    /* Forest       */ [&[LG],      &[],        &[LG, LD],  &[LG],      &[LG, LD],  &[],        &[LG, LD],  &[LG, LD]],
    /* DeepWater    */ [&[SW, LD],  &[SW, LD],  &[SW, LD],  &[SW],      &[SW, LD],  &[SW, LD],  &[],        &[]],
    /* ShallowWater */ [&[LD, LG],  &[LD],      &[LD],      &[],        &[LD],      &[LD, LG],  &[],        &[]],
];

/// Intermediate type to write into `ring` for a cell of `existing` type next
/// to `placed` terrain, if any
pub fn transition(placed: TerrainType, existing: TerrainType, ring: usize) -> Option<TerrainType> {
    TRANSITIONS[placed.base().index()][existing.base().index()]
        .get(ring)
        .copied()
}

/// Result of a propagation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    /// Region that needs index recomputation (unclamped)
    pub region: Region,
    /// Rings walked, including the final ring that changed nothing
    pub rings: usize,
    /// Cells overwritten, in ring walk order
    pub changed: Vec<(i32, i32)>,
}

impl Propagation {
    pub fn changed_cells(&self) -> usize {
        self.changed.len()
    }
}

/// Bleed transitions outward from `region`, which the caller has already
/// painted with `new_type`, and return the affected region.
pub fn apply_terrain_type(
    grid: &mut TerrainGrid,
    new_type: TerrainType,
    region: Region,
    max_rings: usize,
) -> Region {
    propagate(grid, new_type, region, max_rings).region
}

/// Like [`apply_terrain_type`], also reporting rings walked and cells overwritten
pub fn propagate(
    grid: &mut TerrainGrid,
    new_type: TerrainType,
    region: Region,
    max_rings: usize,
) -> Propagation {
    let mut region = region;
    let mut rings = 0;
    let mut written = Vec::new();

    for ring in 0..max_rings {
        rings = ring + 1;
        let ring_start = written.len();
        for (x, y) in ring_cells(region) {
            // Cells outside the grid are skipped
            let Some(current) = grid.try_get(x, y) else {
                continue;
            };
            if let Some(next) = transition(new_type, current, ring) {
                if next != current && grid.set(x, y, next).is_ok() {
                    written.push((x, y));
                }
            }
        }
        let changed = written.len() - ring_start;
        debug!(
            "transition ring {} around {:?}: {} cells changed",
            ring, region, changed
        );
        if changed == 0 {
            break;
        }
        region = region.grown(1);
    }

    Propagation {
        region,
        rings,
        changed: written,
    }
}

/// Cells of the one-cell ring just outside `region`.
///
/// Walks the top edge left to right, the right edge downward, the bottom edge
/// right to left and the left edge upward; each edge owns the corner it
/// starts on, so every ring cell is yielded once.
pub fn ring_cells(region: Region) -> impl Iterator<Item = (i32, i32)> {
    let Region {
        x,
        y,
        width,
        height,
    } = region;
    let w = width.max(0);
    let h = height.max(0);
    let (left_x, top_y) = (x.saturating_sub(1), y.saturating_sub(1));
    let (right_x, bottom_y) = (x.saturating_add(w), y.saturating_add(h));

    let top = (0..=w).map(move |i| (left_x.saturating_add(i), top_y));
    let right = (0..=h).map(move |i| (right_x, top_y.saturating_add(i)));
    let bottom = (0..=w).map(move |i| (right_x.saturating_sub(i), bottom_y));
    let left = (0..=h).map(move |i| (left_x, bottom_y.saturating_sub(i)));

    top.chain(right).chain(bottom).chain(left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid_of(width: usize, height: usize, fill: TerrainType) -> TerrainGrid {
        TerrainGrid::new(width, height, fill)
    }

    #[test]
    fn test_same_type_pairs_are_empty() {
        for t in &TerrainType::ALL[..TerrainType::BASE_COUNT] {
            assert_eq!(transition(*t, *t, 0), None);
        }
    }

    #[test]
    fn test_table_is_ordered_pairs() {
        // Grass next to dirt differs from dirt next to grass
        assert_eq!(transition(DG, TerrainType::DarkDirt, 0), Some(LG));
        assert_eq!(transition(TerrainType::DarkDirt, DG, 0), Some(LD));
        assert_eq!(transition(DG, TerrainType::DarkDirt, 1), Some(LD));
        assert_eq!(transition(DG, TerrainType::DarkDirt, 2), None);
    }

    #[test]
    fn test_partial_types_use_base_row() {
        assert_eq!(
            transition(TerrainType::RockPartial, LG, 0),
            transition(TerrainType::Rock, LG, 0)
        );
        assert_eq!(transition(SW, TerrainType::ForestPartial, 1), Some(LG));
    }

    #[test]
    fn test_ring_cells_visit_each_border_cell_once() {
        let region = Region::new(2, 3, 3, 2);
        let cells: Vec<_> = ring_cells(region).collect();
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(cells.len(), 2 * (3 + 1) + 2 * (2 + 1));
        assert_eq!(unique.len(), cells.len());

        let outer = region.grown(1);
        for (x, y) in &cells {
            assert!(outer.contains(*x, *y));
            assert!(!region.contains(*x, *y));
        }
    }

    #[test]
    fn test_shallow_water_in_grass_makes_dirt_ring() {
        let mut grid = grid_of(5, 5, LG);
        grid.set(2, 2, SW).unwrap();

        let result = propagate(&mut grid, SW, Region::cell(2, 2), DEFAULT_MAX_RINGS);

        for (x, y) in Region::new(1, 1, 3, 3).cells() {
            let expected = if (x, y) == (2, 2) { SW } else { LD };
            assert_eq!(grid.get(x, y).unwrap(), expected, "cell ({x}, {y})");
        }
        // Outer ring untouched
        assert_eq!(grid.get(0, 0).unwrap(), LG);
        assert_eq!(grid.get(4, 2).unwrap(), LG);

        assert_eq!(result.changed_cells(), 8);
        // Walk starts at the ring's top-left corner
        assert_eq!(result.changed[0], (1, 1));
        assert_eq!(result.rings, 2);
        assert_eq!(result.region, Region::new(1, 1, 3, 3));
        assert!(result.region.width >= 1 + 2 && result.region.height >= 1 + 2);
    }

    #[test]
    fn test_deep_water_in_grass_makes_two_rings() {
        let mut grid = grid_of(9, 9, LG);
        grid.set(4, 4, TerrainType::DeepWater).unwrap();

        let result = propagate(
            &mut grid,
            TerrainType::DeepWater,
            Region::cell(4, 4),
            DEFAULT_MAX_RINGS,
        );

        assert_eq!(grid.get(3, 3).unwrap(), SW);
        assert_eq!(grid.get(5, 4).unwrap(), SW);
        assert_eq!(grid.get(2, 2).unwrap(), LD);
        assert_eq!(grid.get(6, 4).unwrap(), LD);
        assert_eq!(grid.get(1, 1).unwrap(), LG);
        assert_eq!(result.changed_cells(), 8 + 16);
        assert_eq!(result.region, Region::new(2, 2, 5, 5));
        assert_eq!(result.rings, 3);
    }

    #[test]
    fn test_second_application_is_idempotent() {
        let mut grid = grid_of(5, 5, LG);
        grid.set(2, 2, SW).unwrap();
        propagate(&mut grid, SW, Region::cell(2, 2), DEFAULT_MAX_RINGS);
        let before = grid.clone();

        let again = propagate(&mut grid, SW, Region::cell(2, 2), DEFAULT_MAX_RINGS);
        assert_eq!(again.changed_cells(), 0);
        assert_eq!(again.rings, 1);
        assert_eq!(again.region, Region::cell(2, 2));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_ring_limit_is_respected() {
        let mut grid = grid_of(12, 12, DG);
        grid.fill_region(Region::new(5, 5, 2, 2), TerrainType::DeepWater);

        let result = propagate(
            &mut grid,
            TerrainType::DeepWater,
            Region::new(5, 5, 2, 2),
            DEFAULT_MAX_RINGS,
        );
        assert!(result.rings <= DEFAULT_MAX_RINGS);

        let limited = propagate(&mut grid_of(12, 12, DG), DG, Region::cell(0, 0), 1);
        assert_eq!(limited.rings, 1);

        let mut grid = grid_of(12, 12, DG);
        grid.fill_region(Region::new(5, 5, 2, 2), TerrainType::DeepWater);
        let one_ring = propagate(&mut grid, TerrainType::DeepWater, Region::new(5, 5, 2, 2), 1);
        assert_eq!(one_ring.rings, 1);
        assert_eq!(one_ring.region, Region::new(4, 4, 4, 4));
        // Second ring never ran
        assert_eq!(grid.get(3, 3).unwrap(), DG);
    }

    #[test]
    fn test_edge_of_grid_is_skipped() {
        let mut grid = grid_of(3, 3, LG);
        grid.set(0, 0, SW).unwrap();

        let region = apply_terrain_type(&mut grid, SW, Region::cell(0, 0), DEFAULT_MAX_RINGS);

        assert_eq!(grid.get(1, 0).unwrap(), LD);
        assert_eq!(grid.get(0, 1).unwrap(), LD);
        assert_eq!(grid.get(1, 1).unwrap(), LD);
        assert_eq!(grid.get(2, 2).unwrap(), LG);
        assert_eq!(region, Region::new(-1, -1, 3, 3));
    }

    #[test]
    fn test_compatible_neighbors_do_nothing() {
        let mut grid = grid_of(4, 4, LG);
        grid.set(1, 1, DG).unwrap();
        let result = propagate(&mut grid, DG, Region::cell(1, 1), DEFAULT_MAX_RINGS);
        assert_eq!(result.changed_cells(), 0);
        assert_eq!(result.region, Region::cell(1, 1));
    }
}
