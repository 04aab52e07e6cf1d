//! Draw layer: the derived per-tile render data

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::grid::Grid;
use crate::region::Region;
use crate::terrain::TerrainType;

/// Render data for one visible tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawTile {
    /// Terrain type the tile is drawn as
    pub tile_type: TerrainType,
    /// Sprite-sheet row selected through the tileset
    pub index: u32,
}

impl Default for DrawTile {
    fn default() -> Self {
        Self {
            tile_type: TerrainType::LightGrass,
            index: 0,
        }
    }
}

/// One [`DrawTile`] per visible tile.
///
/// This is a cache: it is fully recomputable from the terrain grid, the
/// partial-bits grid and the tileset, and is only written by index
/// recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawLayer {
    tiles: Grid<DrawTile>,
}

impl DrawLayer {
    /// Create a layer of default tiles for a `width` x `height` visible map
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            tiles: Grid::new(width, height, DrawTile::default()),
        }
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn bounds(&self) -> Region {
        self.tiles.bounds()
    }

    /// Get the tile at a visible coordinate
    pub fn tile(&self, x: i32, y: i32) -> Result<DrawTile, MapError> {
        self.tiles.get(x, y)
    }

    /// Store a recomputed tile
    pub fn set_tile(&mut self, x: i32, y: i32, tile: DrawTile) -> Result<(), MapError> {
        self.tiles.set(x, y, tile)
    }

    /// Tiles inside `region` (clipped to the layer) with their coordinates
    pub fn tiles_in(&self, region: Region) -> Vec<((i32, i32), DrawTile)> {
        region
            .clamped(self.width(), self.height())
            .cells()
            .filter_map(|(x, y)| self.tiles.try_get(x, y).map(|t| ((x, y), t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draw_layer() {
        let layer = DrawLayer::new(4, 3);
        assert_eq!(layer.width(), 4);
        assert_eq!(layer.height(), 3);
        assert_eq!(layer.tile(3, 2).unwrap(), DrawTile::default());
        assert!(layer.tile(4, 0).is_err());
    }

    #[test]
    fn test_tiles_in_clips_region() {
        let mut layer = DrawLayer::new(2, 2);
        let rock = DrawTile {
            tile_type: TerrainType::Rock,
            index: 7,
        };
        layer.set_tile(1, 1, rock).unwrap();

        let tiles = layer.tiles_in(Region::new(-1, -1, 10, 10));
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&((1, 1), rock)));
    }
}
