//! Command pattern for undo/redo

use rts_map_core::{MapDocument, Region, TerrainType};
use tracing::debug;

/// A command that can be undone/redone
pub trait Command {
    /// Execute the command (do/redo)
    fn execute(&self, document: &mut MapDocument);
    /// Undo the command
    fn undo(&self, document: &mut MapDocument);
    /// Corner cells whose draw tiles must be recomputed after execute or undo
    fn region(&self) -> Region;
    /// Get a description of the command
    fn description(&self) -> &str;
}

/// Terrain and partial bits of one corner-cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerSample {
    pub terrain: TerrainType,
    pub partial_bits: u8,
}

/// Snapshot of corner-cells, row-major over a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerSnapshot {
    region: Region,
    samples: Vec<CornerSample>,
}

impl CornerSnapshot {
    /// Capture `region`, clamped to the document's corner grid
    pub fn capture(document: &MapDocument, region: Region) -> Self {
        let region = region.clamped(document.terrain.width(), document.terrain.height());
        let samples = region
            .cells()
            .filter_map(|(x, y)| {
                Some(CornerSample {
                    terrain: document.terrain.try_get(x, y)?,
                    partial_bits: document.partial_bits.try_get(x, y)?,
                })
            })
            .collect();
        Self { region, samples }
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

/// Command for an edit of the terrain and partial-bits grids (paint strokes,
/// transitions, harvesting)
pub struct TerrainEditCommand {
    /// Corner-cells to recompute; covers every changed cell
    region: Region,
    /// Changes: (x, y) -> (old, new)
    pub changes: Vec<((i32, i32), (CornerSample, CornerSample))>,
    description: String,
}

impl TerrainEditCommand {
    /// Create from before/after snapshots of the same region.
    ///
    /// `region` is the corner region the edit recomputed; it is widened to
    /// cover every recorded change.
    pub fn from_diff(
        region: Region,
        before: &CornerSnapshot,
        after: &CornerSnapshot,
        description: impl Into<String>,
    ) -> Self {
        let changes: Vec<_> = before
            .region
            .cells()
            .zip(before.samples.iter().zip(&after.samples))
            .filter(|(_, (old, new))| old != new)
            .map(|(cell, (old, new))| (cell, (*old, *new)))
            .collect();

        let region = changes
            .iter()
            .fold(region, |r, ((x, y), _)| r.union(&Region::cell(*x, *y)));

        Self {
            region,
            changes,
            description: description.into(),
        }
    }

    /// Returns `true` if no cell changed
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn write(document: &mut MapDocument, (x, y): (i32, i32), sample: CornerSample) {
        let written = document
            .terrain
            .set(x, y, sample.terrain)
            .and_then(|()| document.partial_bits.set_bits(x, y, sample.partial_bits));
        // Commands recorded against a document of another size are skipped
        if let Err(err) = written {
            debug!("skipping recorded corner: {}", err);
        }
    }
}

impl Command for TerrainEditCommand {
    fn execute(&self, document: &mut MapDocument) {
        for (cell, (_, new)) in &self.changes {
            Self::write(document, *cell, *new);
        }
    }

    fn undo(&self, document: &mut MapDocument) {
        for (cell, (old, _)) in &self.changes {
            Self::write(document, *cell, *old);
        }
    }

    fn region(&self) -> Region {
        self.region
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Stores command history for undo/redo
#[derive(Default)]
pub struct CommandHistory {
    /// Stack of commands that have been executed
    undo_stack: Vec<Box<dyn Command>>,
    /// Stack of commands that have been undone
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    /// Undo the last command, returning the region it touched
    pub fn undo(&mut self, document: &mut MapDocument) -> Option<Region> {
        let command = self.undo_stack.pop()?;
        command.undo(document);
        let region = command.region();
        self.redo_stack.push(command);
        Some(region)
    }

    /// Redo the last undone command, returning the region it touched
    pub fn redo(&mut self, document: &mut MapDocument) -> Option<Region> {
        let command = self.redo_stack.pop()?;
        command.execute(document);
        let region = command.region();
        self.undo_stack.push(command);
        Some(region)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of command to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get description of command to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Push a command directly onto the undo stack without executing it.
    /// Use this when the changes have already been applied.
    pub fn push_undo(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(
        document: &mut MapDocument,
        x: i32,
        y: i32,
        terrain: TerrainType,
    ) -> TerrainEditCommand {
        let region = Region::cell(x, y);
        let before = CornerSnapshot::capture(document, region);
        document.terrain.set(x, y, terrain).unwrap();
        let after = CornerSnapshot::capture(document, region);
        TerrainEditCommand::from_diff(region, &before, &after, "Paint")
    }

    #[test]
    fn test_from_diff_keeps_only_changes() {
        let mut document = MapDocument::new("test", 3, 3, TerrainType::LightGrass);
        let region = Region::new(0, 0, 4, 4);
        let before = CornerSnapshot::capture(&document, region);
        document.terrain.set(1, 2, TerrainType::Rock).unwrap();
        document.partial_bits.set_bits(3, 3, 0x3).unwrap();
        let after = CornerSnapshot::capture(&document, region);

        let command = TerrainEditCommand::from_diff(region, &before, &after, "Edit");
        assert_eq!(command.changes.len(), 2);
        assert_eq!(command.region(), region);

        let unchanged = TerrainEditCommand::from_diff(region, &after, &after, "Edit");
        assert!(unchanged.is_empty());
    }

    #[test]
    fn test_snapshot_is_clamped() {
        let document = MapDocument::new("test", 2, 2, TerrainType::LightGrass);
        let snapshot = CornerSnapshot::capture(&document, Region::new(-2, -2, 10, 10));
        assert_eq!(snapshot.region(), Region::new(0, 0, 3, 3));
    }

    #[test]
    fn test_undo_redo_restores_cells() {
        let mut document = MapDocument::new("test", 3, 3, TerrainType::LightGrass);
        let mut history = CommandHistory::default();

        let command = paint(&mut document, 1, 1, TerrainType::DeepWater);
        history.push_undo(Box::new(command));
        assert!(history.can_undo());
        assert_eq!(history.undo_description(), Some("Paint"));

        assert_eq!(history.undo(&mut document), Some(Region::cell(1, 1)));
        assert_eq!(document.terrain.get(1, 1).unwrap(), TerrainType::LightGrass);
        assert!(history.can_redo());

        history.redo(&mut document);
        assert_eq!(document.terrain.get(1, 1).unwrap(), TerrainType::DeepWater);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut document = MapDocument::new("test", 3, 3, TerrainType::LightGrass);
        let mut history = CommandHistory::default();

        let first = paint(&mut document, 0, 0, TerrainType::Rock);
        history.push_undo(Box::new(first));
        history.undo(&mut document);
        assert!(history.can_redo());

        let second = paint(&mut document, 2, 2, TerrainType::Forest);
        history.push_undo(Box::new(second));
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut document), None);

        history.clear();
        assert!(!history.can_undo());
        assert_eq!(history.undo(&mut document), None);
    }

    #[test]
    fn test_cells_outside_smaller_document_are_skipped() {
        let mut source = MapDocument::new("test", 3, 3, TerrainType::LightGrass);
        let region = Region::new(0, 0, 4, 4);
        let before = CornerSnapshot::capture(&source, region);
        source.terrain.set(0, 0, TerrainType::Rock).unwrap();
        source.terrain.set(3, 3, TerrainType::Rock).unwrap();
        let after = CornerSnapshot::capture(&source, region);
        let command = TerrainEditCommand::from_diff(region, &before, &after, "Paint");

        let mut small = MapDocument::new("small", 1, 1, TerrainType::LightGrass);
        command.execute(&mut small);
        assert_eq!(small.terrain.get(0, 0).unwrap(), TerrainType::Rock);
        assert_eq!(small.terrain.get(1, 1).unwrap(), TerrainType::LightGrass);

        command.undo(&mut small);
        assert_eq!(small.terrain.get(0, 0).unwrap(), TerrainType::LightGrass);
    }
}
