//! rts_map_editor - Terrain editing core for an RTS map editor
//!
//! This crate ties the map data and the autotiler together:
//! - Map and tileset loading
//! - Terrain painting with transition propagation
//! - Partial-bit edits (forest harvesting, rock breaking)
//! - Undo/redo support
//! - Synchronous "tiles updated" notifications for renderers
//!
//! # Usage
//!
//! ```rust,ignore
//! use rts_map_editor::{load_map_file, load_tileset_file, EditorSession};
//! use rts_map_autotile::AutotileConfig;
//! use rts_map_core::{DrawLayer, Region, TerrainType};
//! use std::sync::Arc;
//!
//! let config = AutotileConfig::load("autotile.toml".as_ref())?;
//! let (document, _) = load_map_file("maps/two_rivers.map".as_ref(), &config)?;
//! let (tileset, _) = load_tileset_file("tilesets/terrain.txt".as_ref(), &config)?;
//!
//! let mut session = EditorSession::new(document, Arc::new(tileset), config)?;
//! session.subscribe(|region, layer: &DrawLayer| redraw(region, layer));
//! session.paint_terrain(Region::new(4, 4, 2, 2), TerrainType::DeepWater)?;
//! ```

pub mod commands;
mod files;
mod listeners;
mod session;

pub use files::{load_map_file, load_tileset_file};
pub use listeners::{ListenerId, Listeners, TilesUpdatedListener};
pub use session::EditorSession;

// Re-export core types from rts_map_* crates
pub use rts_map_autotile;
pub use rts_map_core;

use rts_map_autotile::{ConfigError, TilesetError};
use rts_map_core::MapError;
use thiserror::Error;

/// Errors surfaced by editor operations and file loading
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Tileset(#[from] TilesetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
