//! Terrain types and the partial-bits encoding
//!
//! Every corner-cell of the terrain grid holds one [`TerrainType`] plus a 4-bit
//! partial value. The partial value says how much of a partial feature (a mined
//! rock face, a harvested forest) is still present at that corner, one bit per
//! quadrant of the corner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partial value for a corner whose feature is fully present
pub const FULL_PARTIAL_BITS: u8 = 0xF;

/// Mask applied to every partial value before it is stored
pub const PARTIAL_BITS_MASK: u8 = 0xF;

/// Abstract terrain kind stored in the terrain grid
///
/// Declaration order is the numeric storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerrainType {
    DarkGrass,
    LightGrass,
    DarkDirt,
    LightDirt,
    Rock,
    Forest,
    DeepWater,
    ShallowWater,
    RockPartial,
    ForestPartial,
}

impl TerrainType {
    /// Number of terrain types, including the partial variants
    pub const COUNT: usize = 10;

    /// Number of base (non-partial) terrain types
    pub const BASE_COUNT: usize = 8;

    /// All terrain types in storage order
    pub const ALL: [TerrainType; Self::COUNT] = [
        TerrainType::DarkGrass,
        TerrainType::LightGrass,
        TerrainType::DarkDirt,
        TerrainType::LightDirt,
        TerrainType::Rock,
        TerrainType::Forest,
        TerrainType::DeepWater,
        TerrainType::ShallowWater,
        TerrainType::RockPartial,
        TerrainType::ForestPartial,
    ];

    /// Numeric value used for storage and table indexing
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Terrain type for a numeric storage value
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The base type used for transition lookups.
    ///
    /// Partial rock and forest blend like their full counterparts.
    pub const fn base(self) -> Self {
        match self {
            TerrainType::RockPartial => TerrainType::Rock,
            TerrainType::ForestPartial => TerrainType::Forest,
            other => other,
        }
    }

    /// Whether this is one of the partial variants
    pub const fn is_partial(self) -> bool {
        matches!(self, TerrainType::RockPartial | TerrainType::ForestPartial)
    }

    /// Single-character code used by the persisted map format.
    ///
    /// Partial variants share the code of their base type; the partial
    /// coverage itself is persisted in the partial-bits section.
    pub const fn code(self) -> char {
        match self.base() {
            TerrainType::DarkGrass => 'G',
            TerrainType::LightGrass => 'g',
            TerrainType::DarkDirt => 'D',
            TerrainType::LightDirt => 'd',
            TerrainType::Rock => 'R',
            TerrainType::Forest => 'F',
            TerrainType::DeepWater => 'W',
            TerrainType::ShallowWater => 'w',
            // base() never yields a partial variant
            TerrainType::RockPartial => 'R',
            TerrainType::ForestPartial => 'F',
        }
    }

    /// Parse a persisted map character
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'G' => Some(TerrainType::DarkGrass),
            'g' => Some(TerrainType::LightGrass),
            'D' => Some(TerrainType::DarkDirt),
            'd' => Some(TerrainType::LightDirt),
            'R' => Some(TerrainType::Rock),
            'F' => Some(TerrainType::Forest),
            'W' => Some(TerrainType::DeepWater),
            'w' => Some(TerrainType::ShallowWater),
            _ => None,
        }
    }

    /// Name used in tileset descriptor lines (e.g. `dark-grass`)
    pub const fn descriptor_name(self) -> &'static str {
        match self {
            TerrainType::DarkGrass => "dark-grass",
            TerrainType::LightGrass => "light-grass",
            TerrainType::DarkDirt => "dark-dirt",
            TerrainType::LightDirt => "light-dirt",
            TerrainType::Rock => "rock",
            TerrainType::Forest => "forest",
            TerrainType::DeepWater => "deep-water",
            TerrainType::ShallowWater => "shallow-water",
            TerrainType::RockPartial => "rock-partial",
            TerrainType::ForestPartial => "forest-partial",
        }
    }

    /// Resolve a descriptor terrain name
    pub fn from_descriptor_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.descriptor_name() == name)
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor_name())
    }
}

/// Parse one hex digit of a persisted partial-bits row
pub fn partial_bits_from_char(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

/// Format a partial value as its persisted hex digit (uppercase)
pub fn partial_bits_to_char(bits: u8) -> char {
    // Masked to 4 bits, so from_digit always succeeds
    char::from_digit((bits & PARTIAL_BITS_MASK) as u32, 16)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('F')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_for_base_types() {
        let row = "GgDdRFWw";
        let parsed: Vec<TerrainType> = row
            .chars()
            .map(|c| TerrainType::from_code(c).unwrap())
            .collect();
        let written: String = parsed.iter().map(|t| t.code()).collect();
        assert_eq!(written, row);
    }

    #[test]
    fn test_partial_types_share_base_code() {
        assert_eq!(TerrainType::RockPartial.code(), 'R');
        assert_eq!(TerrainType::ForestPartial.code(), 'F');
        assert_eq!(TerrainType::RockPartial.base(), TerrainType::Rock);
        assert!(TerrainType::ForestPartial.is_partial());
        assert!(!TerrainType::Forest.is_partial());
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(TerrainType::from_code('x'), None);
        assert_eq!(TerrainType::from_code(' '), None);
    }

    #[test]
    fn test_storage_order() {
        for (i, t) in TerrainType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
            assert_eq!(TerrainType::from_index(i), Some(*t));
        }
        assert_eq!(TerrainType::from_index(TerrainType::COUNT), None);
    }

    #[test]
    fn test_descriptor_names() {
        assert_eq!(
            TerrainType::from_descriptor_name("shallow-water"),
            Some(TerrainType::ShallowWater)
        );
        assert_eq!(
            TerrainType::from_descriptor_name("rock-partial"),
            Some(TerrainType::RockPartial)
        );
        assert_eq!(TerrainType::from_descriptor_name("lava"), None);
    }

    #[test]
    fn test_partial_bits_chars() {
        assert_eq!(partial_bits_from_char('A'), Some(10));
        assert_eq!(partial_bits_from_char('f'), Some(15));
        assert_eq!(partial_bits_from_char('G'), None);
        assert_eq!(partial_bits_to_char(0xB), 'B');
        assert_eq!(partial_bits_to_char(0x3F), 'F');
    }
}
