//! Terrain autotiling for RTS maps
//!
//! This crate turns edits to the corner-cell terrain grid into a consistent
//! draw layer:
//!
//! - [`transition`] bleeds intermediate terrain around a painted region so
//!   incompatible types never touch
//! - [`blend`] derives each visible tile's terrain and 4-bit corner mask
//! - [`tileset`] maps `(terrain, mask, alt)` to a sprite-sheet row
//!
//! # Example
//!
//! ```rust,ignore
//! use rts_map_autotile::{apply_terrain_type, CornerBlender, FixedVariant, Tileset};
//! use rts_map_core::{DrawLayer, PartialBitsGrid, Region, TerrainGrid, TerrainType};
//!
//! let tileset = Tileset::parse(&std::fs::read_to_string("terrain.txt")?)?;
//! let mut terrain = TerrainGrid::new(17, 17, TerrainType::LightGrass);
//! let partial_bits = PartialBitsGrid::new(17, 17, 0xF);
//! let mut layer = DrawLayer::new(16, 16);
//!
//! let painted = Region::cell(8, 8);
//! terrain.fill_region(painted, TerrainType::DeepWater);
//! let affected = apply_terrain_type(&mut terrain, TerrainType::DeepWater, painted, 3);
//!
//! CornerBlender::new(&terrain, &partial_bits, &tileset)
//!     .recompute_indices(&mut layer, affected, &mut FixedVariant)?;
//! ```

pub mod blend;
pub mod config;
pub mod tileset;
pub mod transition;
pub mod variant;

pub use blend::{raw_mask, resolve_blend, CornerBlender, TIE_BREAK_ORDER};
pub use config::{AutotileConfig, ConfigError};
pub use tileset::{TileNamePolicy, Tileset, TilesetError, TilesetWarning, MASK_COUNT};
pub use transition::{
    apply_terrain_type, propagate, ring_cells, transition, Propagation, DEFAULT_MAX_RINGS,
};
pub use variant::{AltVariantMode, FixedVariant, RandomVariant, VariantPicker};

pub use rts_map_core;
