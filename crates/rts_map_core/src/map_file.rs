//! Persisted map text format
//!
//! A map file is a sequence of sections, each introduced by a `#` header line:
//!
//! ```text
//! # Map Name
//! Two Rivers
//! # Map Dimensions - W H
//! 4 3
//! # Terrain
//! ggggg
//! gwwgg
//! gwwgg
//! ggggg
//! # Partial Bits
//! FFFFF
//! ...
//! ```
//!
//! The terrain and partial-bits sections have `H + 1` rows of `W + 1` cells,
//! one per corner-cell. Sections this module does not understand (players,
//! assets) are kept verbatim and written back in their original order.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::MapError;
use crate::grid::{PartialBitsGrid, TerrainGrid};
use crate::terrain::{
    partial_bits_from_char, partial_bits_to_char, TerrainType, FULL_PARTIAL_BITS,
};

const NAME_HEADER: &str = "# Map Name";
const DIMENSIONS_HEADER: &str = "# Map Dimensions - W H";
const TERRAIN_HEADER: &str = "# Terrain";
const PARTIAL_BITS_HEADER: &str = "# Partial Bits";

/// What to do with a terrain character that has no terrain type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTerrainPolicy {
    /// Fail the load with [`MapError::UnknownTerrainCode`]
    #[default]
    Reject,
    /// Put this terrain in the cell and report a [`ParseWarning`]
    Substitute(TerrainType),
}

/// Options for [`MapDocument::parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub unknown_terrain: UnknownTerrainPolicy,
    /// Partial value used when the file has no partial-bits section
    pub default_partial_bits: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unknown_terrain: UnknownTerrainPolicy::Reject,
            default_partial_bits: FULL_PARTIAL_BITS,
        }
    }
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    SubstitutedTerrainCode {
        line: usize,
        column: usize,
        code: char,
        substitute: TerrainType,
    },
}

/// A section kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSection {
    /// The full header line, including the leading `#`
    pub header: String,
    pub lines: Vec<String>,
}

/// An editable map: name, visible size, terrain and partial-bits grids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    pub name: String,
    /// Visible width in tiles
    pub width: usize,
    /// Visible height in tiles
    pub height: usize,
    pub terrain: TerrainGrid,
    pub partial_bits: PartialBitsGrid,
    /// Sections this format does not interpret
    #[serde(default)]
    pub extra_sections: Vec<MapSection>,
}

/// A section as it was read, before interpretation
struct RawSection {
    header: String,
    /// (1-based line number, text)
    lines: Vec<(usize, String)>,
}

impl RawSection {
    fn key(&self) -> String {
        self.header
            .trim_start_matches('#')
            .trim()
            .to_ascii_lowercase()
    }

    /// Non-blank lines, trailing whitespace removed
    fn content(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .map(|(n, l)| (*n, l.trim_end()))
            .filter(|(_, l)| !l.is_empty())
    }
}

impl MapDocument {
    /// Create a map of `width` x `height` visible tiles filled with one terrain
    pub fn new(name: impl Into<String>, width: usize, height: usize, fill: TerrainType) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            terrain: TerrainGrid::new(width + 1, height + 1, fill),
            partial_bits: PartialBitsGrid::new(width + 1, height + 1, FULL_PARTIAL_BITS),
            extra_sections: Vec::new(),
        }
    }

    /// Parse a map file's text
    pub fn parse(
        text: &str,
        options: &ParseOptions,
    ) -> Result<(Self, Vec<ParseWarning>), MapError> {
        let sections = split_sections(text);
        let mut warnings = Vec::new();

        let mut name = None;
        let mut dimensions = None;
        let mut terrain_section = None;
        let mut bits_section = None;
        let mut extra_sections = Vec::new();

        for section in &sections {
            let key = section.key();
            if key.starts_with("map name") {
                name = Some(
                    section
                        .content()
                        .next()
                        .map(|(_, l)| l.trim().to_string())
                        .unwrap_or_default(),
                );
            } else if key.starts_with("map dimensions") {
                dimensions = Some(parse_dimensions(section)?);
            } else if key.starts_with("terrain") {
                terrain_section = Some(section);
            } else if key.starts_with("partial bits") {
                bits_section = Some(section);
            } else {
                extra_sections.push(MapSection {
                    header: section.header.clone(),
                    lines: section.lines.iter().map(|(_, l)| l.clone()).collect(),
                });
            }
        }

        let name = name.ok_or(MapError::MissingSection("map name"))?;
        let (width, height) = dimensions.ok_or(MapError::MissingSection("map dimensions"))?;
        let terrain_section = terrain_section.ok_or(MapError::MissingSection("terrain"))?;

        let cols = width + 1;
        let rows = height + 1;
        let terrain = parse_grid(terrain_section, "terrain", cols, rows, |c, line, column| {
            match TerrainType::from_code(c) {
                Some(t) => Ok(t),
                None => match options.unknown_terrain {
                    UnknownTerrainPolicy::Reject => Err(MapError::UnknownTerrainCode {
                        line,
                        column,
                        code: c,
                    }),
                    UnknownTerrainPolicy::Substitute(substitute) => {
                        warn!(
                            "line {}, column {}: unknown terrain code '{}', using {}",
                            line, column, c, substitute
                        );
                        warnings.push(ParseWarning::SubstitutedTerrainCode {
                            line,
                            column,
                            code: c,
                            substitute,
                        });
                        Ok(substitute)
                    }
                },
            }
        })?;

        let partial_bits = match bits_section {
            Some(section) => parse_grid(section, "partial bits", cols, rows, |c, line, column| {
                partial_bits_from_char(c).ok_or(MapError::InvalidPartialBits {
                    line,
                    column,
                    found: c,
                })
            })?,
            None => PartialBitsGrid::new(cols, rows, options.default_partial_bits),
        };

        Ok((
            Self {
                name,
                width,
                height,
                terrain,
                partial_bits,
                extra_sections,
            },
            warnings,
        ))
    }

    /// Read and parse a map file
    pub fn load(
        path: &Path,
        options: &ParseOptions,
    ) -> Result<(Self, Vec<ParseWarning>), MapError> {
        let text = std::fs::read_to_string(path)?;
        let (document, warnings) = Self::parse(&text, options)?;
        info!(
            "Loaded map '{}' ({}x{}) from {}",
            document.name,
            document.width,
            document.height,
            path.display()
        );
        Ok((document, warnings))
    }

    /// Serialize back to the text format
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(NAME_HEADER);
        out.push('\n');
        out.push_str(&self.name);
        out.push('\n');
        out.push_str(DIMENSIONS_HEADER);
        out.push('\n');
        out.push_str(&format!("{} {}\n", self.width, self.height));

        out.push_str(TERRAIN_HEADER);
        out.push('\n');
        for row in self.terrain.rows() {
            out.extend(row.iter().map(|t| t.code()));
            out.push('\n');
        }

        out.push_str(PARTIAL_BITS_HEADER);
        out.push('\n');
        for row in self.partial_bits.rows() {
            out.extend(row.iter().map(|b| partial_bits_to_char(*b)));
            out.push('\n');
        }

        for section in &self.extra_sections {
            out.push_str(&section.header);
            out.push('\n');
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Write the map to disk
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        std::fs::write(path, self.to_text())?;
        info!("Saved map '{}' to {}", self.name, path.display());
        Ok(())
    }
}

fn split_sections(text: &str) -> Vec<RawSection> {
    let mut sections: Vec<RawSection> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim_start().starts_with('#') {
            sections.push(RawSection {
                header: line.trim_end().to_string(),
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push((line_no, line.to_string()));
        } else if !line.trim().is_empty() {
            warn!("line {}: text before the first section header ignored", line_no);
        }
    }
    sections
}

fn parse_dimensions(section: &RawSection) -> Result<(usize, usize), MapError> {
    let Some((line, text)) = section.content().next() else {
        return Err(MapError::MissingSection("map dimensions"));
    };
    let invalid = || MapError::InvalidDimensions {
        line,
        text: text.to_string(),
    };
    let mut parts = text.split_whitespace();
    let width = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(invalid)?;
    let height = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() || width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

fn parse_grid<T: Copy>(
    section: &RawSection,
    name: &'static str,
    width: usize,
    height: usize,
    mut cell: impl FnMut(char, usize, usize) -> Result<T, MapError>,
) -> Result<crate::grid::Grid<T>, MapError> {
    let mut rows = Vec::with_capacity(height);
    for (line, text) in section.content() {
        let found = text.chars().count();
        if found != width {
            return Err(MapError::RowLength {
                line,
                expected: width,
                found,
            });
        }
        let row = text
            .chars()
            .enumerate()
            .map(|(i, c)| cell(c, line, i + 1))
            .collect::<Result<Vec<T>, MapError>>()?;
        rows.push(row);
    }
    if rows.len() != height {
        return Err(MapError::RowCount {
            section: name,
            expected: height,
            found: rows.len(),
        });
    }
    // Row lengths were checked above
    crate::grid::Grid::from_rows(width, rows).ok_or(MapError::RowCount {
        section: name,
        expected: height,
        found: 0,
    })
}
