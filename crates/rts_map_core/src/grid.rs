//! Row-major 2D grids for terrain and partial bits

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::region::Region;
use crate::terrain::{TerrainType, PARTIAL_BITS_MASK};

/// A dense 2D grid stored row by row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Corner-sample terrain grid, one larger than the visible map in each dimension
pub type TerrainGrid = Grid<TerrainType>;

/// Per-corner 4-bit partial values, same dimensions as the terrain grid
pub type PartialBitsGrid = Grid<u8>;

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Build a grid from complete rows. Every row must have `width` cells.
    pub fn from_rows(width: usize, rows: Vec<Vec<T>>) -> Option<Self> {
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let height = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Full extent of the grid as a region
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Result<usize, MapError> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(MapError::BoundaryViolation {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Read a cell, failing on out-of-bounds coordinates
    pub fn get(&self, x: i32, y: i32) -> Result<T, MapError> {
        self.index_of(x, y).map(|i| self.cells[i])
    }

    /// Read a cell, `None` when out of bounds
    pub fn try_get(&self, x: i32, y: i32) -> Option<T> {
        self.index_of(x, y).ok().map(|i| self.cells[i])
    }

    /// Write a cell, failing on out-of-bounds coordinates
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<(), MapError> {
        let i = self.index_of(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Set every in-bounds cell of `region` to `value`; cells outside are ignored
    pub fn fill_region(&mut self, region: Region, value: T) {
        let clamped = region.clamped(self.width, self.height);
        for (x, y) in clamped.cells() {
            let i = y as usize * self.width + x as usize;
            self.cells[i] = value;
        }
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; an empty-width grid has no rows to yield
        self.cells.chunks(self.width.max(1)).take(self.height)
    }
}

impl Grid<u8> {
    /// Write a partial value, keeping only the low four bits
    pub fn set_bits(&mut self, x: i32, y: i32, bits: u8) -> Result<(), MapError> {
        self.set(x, y, bits & PARTIAL_BITS_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid() {
        let grid = TerrainGrid::new(5, 4, TerrainType::LightGrass);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(4, 3).unwrap(), TerrainType::LightGrass);
        assert_eq!(grid.rows().count(), 4);
    }

    #[test]
    fn test_out_of_bounds_is_boundary_violation() {
        let grid = TerrainGrid::new(3, 3, TerrainType::Rock);
        let err = grid.get(3, 0).unwrap_err();
        assert!(matches!(
            err,
            MapError::BoundaryViolation { x: 3, y: 0, .. }
        ));
        assert!(grid.get(-1, 1).is_err());
        assert_eq!(grid.try_get(0, 3), None);
    }

    #[test]
    fn test_fill_region_clips() {
        let mut grid = TerrainGrid::new(3, 3, TerrainType::LightGrass);
        grid.fill_region(Region::new(1, 1, 5, 5), TerrainType::DeepWater);
        assert_eq!(grid.get(0, 0).unwrap(), TerrainType::LightGrass);
        assert_eq!(grid.get(1, 1).unwrap(), TerrainType::DeepWater);
        assert_eq!(grid.get(2, 2).unwrap(), TerrainType::DeepWater);
        assert_eq!(grid.get(0, 2).unwrap(), TerrainType::LightGrass);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(PartialBitsGrid::from_rows(2, vec![vec![1, 2], vec![3]]).is_none());
        let grid = PartialBitsGrid::from_rows(2, vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(grid.get(1, 1).unwrap(), 4);
    }

    #[test]
    fn test_set_bits_masks() {
        let mut bits = PartialBitsGrid::new(2, 2, 0xF);
        bits.set_bits(0, 0, 0x37).unwrap();
        assert_eq!(bits.get(0, 0).unwrap(), 0x7);
    }
}
