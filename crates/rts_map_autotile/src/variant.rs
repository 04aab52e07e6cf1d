//! Alt-variant selection
//!
//! A tileset may list several sprite rows for the same `(terrain, mask)`
//! pair. The picker decides which one a recomputed tile uses.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rts_map_core::TerrainType;
use serde::{Deserialize, Serialize};

use crate::tileset::Tileset;

/// Chooses the alt index passed to [`Tileset::lookup`]
pub trait VariantPicker {
    fn pick(&mut self, tileset: &Tileset, terrain: TerrainType, mask: u8) -> u16;
}

/// Always alt 0
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedVariant;

impl VariantPicker for FixedVariant {
    fn pick(&mut self, _tileset: &Tileset, _terrain: TerrainType, _mask: u8) -> u16 {
        0
    }
}

/// Uniform choice among the alt rows the tileset populates, from a seeded RNG
#[derive(Debug, Clone)]
pub struct RandomVariant {
    rng: SmallRng,
}

impl RandomVariant {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl VariantPicker for RandomVariant {
    fn pick(&mut self, tileset: &Tileset, terrain: TerrainType, mask: u8) -> u16 {
        let variants = tileset.variants(terrain, mask);
        match variants.len() {
            0 => 0,
            1 => variants[0],
            n => variants[self.rng.gen_range(0..n)],
        }
    }
}

/// Configured variant strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AltVariantMode {
    #[default]
    Fixed,
    Random { seed: u64 },
}

impl AltVariantMode {
    /// Build the picker for this mode
    pub fn picker(&self) -> Box<dyn VariantPicker> {
        match *self {
            AltVariantMode::Fixed => Box::new(FixedVariant),
            AltVariantMode::Random { seed } => Box::new(RandomVariant::new(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset_with_variants() -> Tileset {
        Tileset::parse("sheet.png\n4\nforest-F-0\nforest-F-1\nforest-F-3\nrock-F-2\n").unwrap()
    }

    #[test]
    fn test_fixed_is_always_zero() {
        let tileset = tileset_with_variants();
        let mut picker = FixedVariant;
        assert_eq!(picker.pick(&tileset, TerrainType::Forest, 0xF), 0);
        assert_eq!(picker.pick(&tileset, TerrainType::Rock, 0xF), 0);
    }

    #[test]
    fn test_random_only_picks_populated_variants() {
        let tileset = tileset_with_variants();
        let mut picker = RandomVariant::new(7);
        for _ in 0..64 {
            let alt = picker.pick(&tileset, TerrainType::Forest, 0xF);
            assert!([0, 1, 3].contains(&alt), "alt {alt}");
        }
        assert_eq!(picker.pick(&tileset, TerrainType::Rock, 0xF), 2);
        assert_eq!(picker.pick(&tileset, TerrainType::DeepWater, 0xF), 0);
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let tileset = tileset_with_variants();
        let mut a = RandomVariant::new(42);
        let mut b = RandomVariant::new(42);
        let seq_a: Vec<u16> = (0..16)
            .map(|_| a.pick(&tileset, TerrainType::Forest, 0xF))
            .collect();
        let seq_b: Vec<u16> = (0..16)
            .map(|_| b.pick(&tileset, TerrainType::Forest, 0xF))
            .collect();
        assert_eq!(seq_a, seq_b);
    }
}
