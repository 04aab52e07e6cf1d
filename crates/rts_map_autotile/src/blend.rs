//! Corner-blend index calculation
//!
//! Each visible tile at `(x, y)` is drawn from the four corner-cells around it:
//!
//! ```text
//!   UL (x, y)   ---   UR (x+1, y)
//!       |     tile (x, y)   |
//!   LL (x, y+1) --- LR (x+1, y+1)
//! ```
//!
//! A 4-bit mask is read from the partial bits of those corners, the winning
//! terrain is chosen by a fixed precedence, and corners of other terrain are
//! cleared from the mask before the tileset lookup.

use rts_map_core::{
    DrawLayer, DrawTile, MapError, PartialBitsGrid, Region, TerrainGrid, TerrainType,
};
use tracing::debug;

use crate::tileset::Tileset;
use crate::variant::VariantPicker;

/// Mask bit owned by each corner, in UL, UR, LL, LR order
pub const CORNER_BITS: [u8; 4] = [0x1, 0x2, 0x4, 0x8];

/// Mask with every corner set
pub const FULL_MASK: u8 = 0xF;

/// Winning-type precedence; a later type is only considered when no corner
/// holds any earlier one
pub const TIE_BREAK_ORDER: [TerrainType; 7] = [
    TerrainType::DarkGrass,
    TerrainType::DarkDirt,
    TerrainType::DeepWater,
    TerrainType::ShallowWater,
    TerrainType::Rock,
    TerrainType::Forest,
    TerrainType::LightDirt,
];

/// Rendered type when no corner matches a tie-break candidate
pub const BASE_TERRAIN: TerrainType = TerrainType::LightGrass;

/// Build the raw mask from the four corners' partial bits.
///
/// Each corner contributes the partial bit of the quadrant that faces the
/// tile: UL its bit 3, UR its bit 2, LL its bit 1, LR its bit 0.
pub fn raw_mask(ul: u8, ur: u8, ll: u8, lr: u8) -> u8 {
    ((ul & 0x8) >> 3) | ((ur & 0x4) >> 1) | ((ll & 0x2) << 1) | ((lr & 0x1) << 3)
}

/// Pick the rendered terrain for a tile and clear mask bits of corners that
/// are not that terrain.
///
/// `corners` is in UL, UR, LL, LR order. A Forest winner whose mask clears to
/// zero keeps the standard Forest lookup.
pub fn resolve_blend(corners: [TerrainType; 4], mask: u8) -> (TerrainType, u8) {
    let Some(winner) = TIE_BREAK_ORDER
        .iter()
        .copied()
        .find(|candidate| corners.contains(candidate))
    else {
        return (BASE_TERRAIN, FULL_MASK);
    };

    let cleared = corners
        .iter()
        .zip(CORNER_BITS)
        .filter(|(corner, _)| **corner != winner)
        .fold(mask, |m, (_, bit)| m & !bit);

    (winner, cleared & FULL_MASK)
}

/// Recomputes draw-layer entries from the terrain and partial-bits grids
pub struct CornerBlender<'a> {
    terrain: &'a TerrainGrid,
    partial_bits: &'a PartialBitsGrid,
    tileset: &'a Tileset,
}

impl<'a> CornerBlender<'a> {
    pub fn new(
        terrain: &'a TerrainGrid,
        partial_bits: &'a PartialBitsGrid,
        tileset: &'a Tileset,
    ) -> Self {
        Self {
            terrain,
            partial_bits,
            tileset,
        }
    }

    /// Visible width: one less than the corner grid
    pub fn width(&self) -> usize {
        self.terrain.width().saturating_sub(1)
    }

    /// Visible height: one less than the corner grid
    pub fn height(&self) -> usize {
        self.terrain.height().saturating_sub(1)
    }

    /// Compute the draw tile for visible tile `(x, y)`.
    ///
    /// Out-of-range coordinates are a boundary violation; callers clamp
    /// regions before recomputing.
    pub fn compute_tile(
        &self,
        x: i32,
        y: i32,
        picker: &mut dyn VariantPicker,
    ) -> Result<DrawTile, MapError> {
        let (width, height) = (self.width(), self.height());
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            return Err(MapError::BoundaryViolation {
                x,
                y,
                width,
                height,
            });
        }

        let corners = [
            self.terrain.get(x, y)?,
            self.terrain.get(x + 1, y)?,
            self.terrain.get(x, y + 1)?,
            self.terrain.get(x + 1, y + 1)?,
        ];
        let mask = raw_mask(
            self.partial_bits.get(x, y)?,
            self.partial_bits.get(x + 1, y)?,
            self.partial_bits.get(x, y + 1)?,
            self.partial_bits.get(x + 1, y + 1)?,
        );

        let (tile_type, mask) = resolve_blend(corners, mask);
        let alt = picker.pick(self.tileset, tile_type, mask);
        Ok(DrawTile {
            tile_type,
            index: self.tileset.lookup(tile_type, mask, alt),
        })
    }

    /// Recompute every tile touched by the corner-cell `region`.
    ///
    /// The region is widened to its blend footprint and clamped to the
    /// visible map. Returns the tile region that was rewritten.
    pub fn recompute_indices(
        &self,
        layer: &mut DrawLayer,
        region: Region,
        picker: &mut dyn VariantPicker,
    ) -> Result<Region, MapError> {
        let tiles = region
            .blend_footprint()
            .clamped(self.width(), self.height());
        self.recompute_tiles(layer, tiles, picker)?;
        debug!("recomputed {} tiles in {:?}", tiles.area(), tiles);
        Ok(tiles)
    }

    /// Recompute the whole layer
    pub fn recompute_all(
        &self,
        layer: &mut DrawLayer,
        picker: &mut dyn VariantPicker,
    ) -> Result<Region, MapError> {
        let tiles = layer.bounds();
        self.recompute_tiles(layer, tiles, picker)?;
        Ok(tiles)
    }

    fn recompute_tiles(
        &self,
        layer: &mut DrawLayer,
        tiles: Region,
        picker: &mut dyn VariantPicker,
    ) -> Result<(), MapError> {
        for (x, y) in tiles.cells() {
            let tile = self.compute_tile(x, y, picker)?;
            layer.set_tile(x, y, tile)?;
        }
        Ok(())
    }
}
