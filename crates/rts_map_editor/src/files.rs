//! Map and tileset loading with the session's config applied

use rts_map_autotile::{AutotileConfig, Tileset, TilesetWarning};
use rts_map_core::{MapDocument, ParseWarning};
use std::path::Path;
use tracing::warn;

use crate::EditorError;

/// Load a map file. Recoverable problems are logged and returned.
pub fn load_map_file(
    path: &Path,
    config: &AutotileConfig,
) -> Result<(MapDocument, Vec<ParseWarning>), EditorError> {
    let (document, warnings) = MapDocument::load(path, &config.parse_options())?;
    for warning in &warnings {
        warn!("{}: {:?}", path.display(), warning);
    }
    Ok((document, warnings))
}

/// Load a tileset descriptor. Recoverable problems are logged and returned.
pub fn load_tileset_file(
    path: &Path,
    config: &AutotileConfig,
) -> Result<(Tileset, Vec<TilesetWarning>), EditorError> {
    let (tileset, warnings) = Tileset::load(path, config.unknown_tile_names)?;
    for warning in &warnings {
        warn!("{}: {:?}", path.display(), warning);
    }
    Ok((tileset, warnings))
}
