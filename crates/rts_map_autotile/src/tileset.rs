//! Tileset index table
//!
//! Maps `(terrain type, blend mask, alt variant)` to a sprite-sheet row. The
//! table is built once from a textual descriptor and is read-only afterwards.
//!
//! Descriptor layout (`#` lines and blank lines are ignored):
//!
//! ```text
//! terrain.png        <- sprite sheet path
//! 3                  <- declared tile count
//! dark-grass-F-0     <- row 0
//! dark-grass-UK-0    <- row 1, unused
//! rock-partial-3-1   <- row 2
//! ```

use rts_map_core::TerrainType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Number of distinct blend masks
pub const MASK_COUNT: usize = 16;

/// Hex field value marking a row with no terrain meaning
const UNKNOWN_FIELD: &str = "UK";

/// Errors raised while building a tileset
#[derive(Debug, Error)]
pub enum TilesetError {
    #[error("line {line}: malformed tile name '{text}'")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: unknown terrain name '{name}'")]
    UnknownTerrainName { line: usize, name: String },
    #[error("line {line}: invalid tile count '{text}'")]
    InvalidTileCount { line: usize, text: String },
    #[error("descriptor is missing its {0}")]
    MissingHeader(&'static str),
    #[error("failed to read tileset descriptor: {0}")]
    Io(#[from] std::io::Error),
}

/// What to do with a tile line whose terrain name is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TileNamePolicy {
    /// Drop the row and report a [`TilesetWarning`]
    #[default]
    Skip,
    /// Fail with [`TilesetError::UnknownTerrainName`]
    Reject,
}

/// A recoverable problem found while parsing a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilesetWarning {
    UnknownTerrainName {
        line: usize,
        name: String,
    },
    DuplicateEntry {
        line: usize,
        terrain: TerrainType,
        mask: u8,
        alt: u16,
    },
    TileCountMismatch {
        declared: usize,
        found: usize,
    },
}

/// Immutable lookup table from blend data to sprite-sheet rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    sprite_sheet: String,
    tile_count: usize,
    /// `table[terrain][mask][alt]`, `None` where the descriptor has no row
    table: Vec<[Vec<Option<u32>>; MASK_COUNT]>,
}

/// One parsed tile-name line
enum TileName<'a> {
    Unused,
    Entry {
        terrain_name: &'a str,
        mask: u8,
        alt: u16,
    },
}

impl Tileset {
    /// Create an empty table
    pub fn new(sprite_sheet: impl Into<String>) -> Self {
        Self {
            sprite_sheet: sprite_sheet.into(),
            tile_count: 0,
            table: vec![Default::default(); TerrainType::COUNT],
        }
    }

    /// Parse a descriptor, dropping rows with unknown terrain names
    pub fn parse(text: &str) -> Result<Self, TilesetError> {
        Self::parse_with(text, TileNamePolicy::Skip).map(|(tileset, _)| tileset)
    }

    /// Parse a descriptor with an explicit unknown-name policy
    pub fn parse_with(
        text: &str,
        policy: TileNamePolicy,
    ) -> Result<(Self, Vec<TilesetWarning>), TilesetError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (_, sprite_sheet) = lines
            .next()
            .ok_or(TilesetError::MissingHeader("sprite sheet path"))?;
        let (count_line, count_text) = lines
            .next()
            .ok_or(TilesetError::MissingHeader("tile count"))?;
        let declared = count_text
            .parse::<usize>()
            .map_err(|_| TilesetError::InvalidTileCount {
                line: count_line,
                text: count_text.to_string(),
            })?;

        let mut tileset = Tileset::new(sprite_sheet);
        let mut warnings = Vec::new();
        let mut row: u32 = 0;

        for (line, text) in lines {
            match parse_tile_name(text) {
                Some(TileName::Unused) => {}
                Some(TileName::Entry {
                    terrain_name,
                    mask,
                    alt,
                }) => match TerrainType::from_descriptor_name(terrain_name) {
                    Some(terrain) => {
                        if tileset.insert(terrain, mask, alt, row).is_some() {
                            warn!(
                                "line {}: duplicate tile {}-{:X}-{}, keeping row {}",
                                line, terrain, mask, alt, row
                            );
                            warnings.push(TilesetWarning::DuplicateEntry {
                                line,
                                terrain,
                                mask,
                                alt,
                            });
                        }
                    }
                    None => match policy {
                        TileNamePolicy::Reject => {
                            return Err(TilesetError::UnknownTerrainName {
                                line,
                                name: terrain_name.to_string(),
                            });
                        }
                        TileNamePolicy::Skip => {
                            warn!(
                                "line {}: unknown terrain name '{}', row dropped",
                                line, terrain_name
                            );
                            warnings.push(TilesetWarning::UnknownTerrainName {
                                line,
                                name: terrain_name.to_string(),
                            });
                        }
                    },
                },
                None => {
                    return Err(TilesetError::MalformedLine {
                        line,
                        text: text.to_string(),
                    });
                }
            }
            row += 1;
        }

        tileset.tile_count = row as usize;
        if declared != tileset.tile_count {
            warn!(
                "tileset declares {} tiles but lists {}",
                declared, tileset.tile_count
            );
            warnings.push(TilesetWarning::TileCountMismatch {
                declared,
                found: tileset.tile_count,
            });
        }

        Ok((tileset, warnings))
    }

    /// Read and parse a descriptor file
    pub fn load(
        path: &Path,
        policy: TileNamePolicy,
    ) -> Result<(Self, Vec<TilesetWarning>), TilesetError> {
        let text = std::fs::read_to_string(path)?;
        let (tileset, warnings) = Self::parse_with(&text, policy)?;
        info!(
            "Loaded tileset '{}' with {} rows from {}",
            tileset.sprite_sheet,
            tileset.tile_count,
            path.display()
        );
        Ok((tileset, warnings))
    }

    /// Store a row, returning the row previously stored for the same key
    pub fn insert(&mut self, terrain: TerrainType, mask: u8, alt: u16, row: u32) -> Option<u32> {
        let variants = &mut self.table[terrain.index()][(mask as usize) % MASK_COUNT];
        let alt = alt as usize;
        if variants.len() <= alt {
            variants.resize(alt + 1, None);
        }
        let previous = variants[alt].replace(row);
        self.tile_count = self.tile_count.max(row as usize + 1);
        previous
    }

    /// Sprite-sheet row for a blend, or row 0 when the combination was never
    /// populated
    pub fn lookup(&self, terrain: TerrainType, mask: u8, alt: u16) -> u32 {
        self.table[terrain.index()]
            .get(mask as usize)
            .and_then(|variants| variants.get(alt as usize).copied().flatten())
            .unwrap_or(0)
    }

    /// Alt indices populated for `(terrain, mask)`, ascending
    pub fn variants(&self, terrain: TerrainType, mask: u8) -> Vec<u16> {
        self.table[terrain.index()]
            .get(mask as usize)
            .map(|variants| {
                variants
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.is_some())
                    .map(|(alt, _)| alt as u16)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn variant_count(&self, terrain: TerrainType, mask: u8) -> usize {
        self.variants(terrain, mask).len()
    }

    pub fn sprite_sheet(&self) -> &str {
        &self.sprite_sheet
    }

    /// Number of sprite-sheet rows listed by the descriptor
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }
}

/// Split `<terrain-name>-<hex|UK>-<alt>` from the right
fn parse_tile_name(text: &str) -> Option<TileName<'_>> {
    let mut parts = text.rsplitn(3, '-');
    let alt = parts.next()?.parse::<u16>().ok()?;
    let hex = parts.next()?;
    let terrain_name = parts.next().filter(|n| !n.is_empty())?;

    if hex == UNKNOWN_FIELD {
        return Some(TileName::Unused);
    }
    let mut digits = hex.chars();
    let mask = digits.next()?.to_digit(16)? as u8;
    if digits.next().is_some() {
        return None;
    }
    Some(TileName::Entry {
        terrain_name,
        mask,
        alt,
    })
}

/// Descriptor listing every base terrain with all 16 masks at alt 0, in
/// terrain-major order, so row = `terrain * 16 + mask`
#[cfg(test)]
pub(crate) fn full_descriptor() -> String {
    let mut text = String::from("# test tileset\nterrain.png\n128\n");
    for terrain in &TerrainType::ALL[..TerrainType::BASE_COUNT] {
        for mask in 0..MASK_COUNT {
            text.push_str(&format!("{}-{:X}-0\n", terrain.descriptor_name(), mask));
        }
    }
    text
}
