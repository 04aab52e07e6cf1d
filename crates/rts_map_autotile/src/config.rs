//! Autotile configuration
//!
//! Settings are read from a TOML file; every field is optional:
//!
//! ```toml
//! max_transition_rings = 3
//! default_partial_bits = 15
//! unknown_tile_names = "skip"
//! unknown_terrain = { substitute = "light-grass" }
//! alt_variants = { random = { seed = 7 } }
//! ```

use rts_map_core::{ParseOptions, UnknownTerrainPolicy, FULL_PARTIAL_BITS, PARTIAL_BITS_MASK};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::tileset::TileNamePolicy;
use crate::transition::DEFAULT_MAX_RINGS;
use crate::variant::{AltVariantMode, VariantPicker};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for transition propagation, index calculation and file loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutotileConfig {
    /// Upper bound on transition rings walked per edit
    pub max_transition_rings: usize,
    /// Partial bits for maps saved without a partial-bits section
    pub default_partial_bits: u8,
    pub unknown_tile_names: TileNamePolicy,
    pub unknown_terrain: UnknownTerrainPolicy,
    pub alt_variants: AltVariantMode,
}

impl Default for AutotileConfig {
    fn default() -> Self {
        Self {
            max_transition_rings: DEFAULT_MAX_RINGS,
            default_partial_bits: FULL_PARTIAL_BITS,
            unknown_tile_names: TileNamePolicy::default(),
            unknown_terrain: UnknownTerrainPolicy::default(),
            alt_variants: AltVariantMode::default(),
        }
    }
}

impl AutotileConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No autotile config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transition_rings == 0 {
            return Err(ConfigError::Invalid(
                "max_transition_rings must be at least 1".to_string(),
            ));
        }
        if self.default_partial_bits > PARTIAL_BITS_MASK {
            return Err(ConfigError::Invalid(format!(
                "default_partial_bits {} does not fit in 4 bits",
                self.default_partial_bits
            )));
        }
        Ok(())
    }

    /// Map parse options derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            unknown_terrain: self.unknown_terrain,
            default_partial_bits: self.default_partial_bits,
        }
    }

    pub fn variant_picker(&self) -> Box<dyn VariantPicker> {
        self.alt_variants.picker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rts_map_core::TerrainType;

    #[test]
    fn test_empty_document_is_default() {
        let config = AutotileConfig::from_toml_str("").unwrap();
        assert_eq!(config, AutotileConfig::default());
        assert_eq!(config.max_transition_rings, 3);
        assert_eq!(config.default_partial_bits, 0xF);
        assert_eq!(config.unknown_terrain, UnknownTerrainPolicy::Reject);
        assert_eq!(config.unknown_tile_names, TileNamePolicy::Skip);
        assert_eq!(config.alt_variants, AltVariantMode::Fixed);
    }

    #[test]
    fn test_parse_all_fields() {
        let toml_str = r#"
max_transition_rings = 5
default_partial_bits = 0
unknown_tile_names = "reject"
unknown_terrain = { substitute = "light-grass" }
alt_variants = { random = { seed = 7 } }
"#;
        let config = AutotileConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.max_transition_rings, 5);
        assert_eq!(config.default_partial_bits, 0);
        assert_eq!(config.unknown_tile_names, TileNamePolicy::Reject);
        assert_eq!(
            config.unknown_terrain,
            UnknownTerrainPolicy::Substitute(TerrainType::LightGrass)
        );
        assert_eq!(config.alt_variants, AltVariantMode::Random { seed: 7 });

        let options = config.parse_options();
        assert_eq!(options.default_partial_bits, 0);
        assert_eq!(options.unknown_terrain, config.unknown_terrain);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AutotileConfig::from_toml_str("max_transition_rings = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AutotileConfig::from_toml_str("default_partial_bits = 16"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AutotileConfig::from_toml_str("unknown_tile_names = \"ignore\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("autotile.toml");

        let config = AutotileConfig {
            max_transition_rings: 2,
            unknown_terrain: UnknownTerrainPolicy::Substitute(TerrainType::Rock),
            alt_variants: AltVariantMode::Random { seed: 99 },
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = AutotileConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AutotileConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AutotileConfig::default());
    }
}
