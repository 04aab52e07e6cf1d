//! Core data structures for the RTS map editor
//!
//! This crate provides the plain data the autotiling engine works on:
//! - `TerrainType` - The terrain kinds and their persisted codes
//! - `TerrainGrid` / `PartialBitsGrid` - Corner-sample grids, one larger than the map
//! - `DrawLayer` - Derived per-tile render data
//! - `Region` - Rectangles used to scope incremental recomputation
//! - `MapDocument` - The persisted map text format

mod error;
mod grid;
mod layer;
mod map_file;
mod region;
mod terrain;

pub use error::MapError;
pub use grid::{Grid, PartialBitsGrid, TerrainGrid};
pub use layer::{DrawLayer, DrawTile};
pub use map_file::{MapDocument, MapSection, ParseOptions, ParseWarning, UnknownTerrainPolicy};
pub use region::Region;
pub use terrain::{
    partial_bits_from_char, partial_bits_to_char, TerrainType, FULL_PARTIAL_BITS,
    PARTIAL_BITS_MASK,
};
