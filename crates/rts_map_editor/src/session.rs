//! Editing session: the map being edited, its draw layer and undo history

use rts_map_autotile::{propagate, AutotileConfig, CornerBlender, Tileset, VariantPicker};
use rts_map_core::{DrawLayer, MapDocument, Region, TerrainType, FULL_PARTIAL_BITS};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::commands::{CommandHistory, CornerSnapshot, TerrainEditCommand};
use crate::listeners::{ListenerId, Listeners, TilesUpdatedListener};
use crate::EditorError;

pub struct EditorSession {
    document: MapDocument,
    tileset: Arc<Tileset>,
    layer: DrawLayer,
    config: AutotileConfig,
    picker: Box<dyn VariantPicker>,
    listeners: Listeners,
    history: CommandHistory,
    dirty: bool,
}

impl EditorSession {
    /// Start a session and compute the whole draw layer
    pub fn new(
        document: MapDocument,
        tileset: Arc<Tileset>,
        config: AutotileConfig,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        let mut session = Self {
            layer: DrawLayer::new(document.width, document.height),
            picker: config.variant_picker(),
            document,
            tileset,
            config,
            listeners: Listeners::default(),
            history: CommandHistory::default(),
            dirty: false,
        };
        let blender = CornerBlender::new(
            &session.document.terrain,
            &session.document.partial_bits,
            &session.tileset,
        );
        blender.recompute_all(&mut session.layer, session.picker.as_mut())?;
        info!(
            "Opened map '{}' ({}x{})",
            session.document.name, session.document.width, session.document.height
        );
        Ok(session)
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    pub fn layer(&self) -> &DrawLayer {
        &self.layer
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    pub fn config(&self) -> &AutotileConfig {
        &self.config
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Whether the document changed since it was opened or saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn subscribe(&mut self, listener: impl TilesUpdatedListener + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Paint the visible tiles in `tiles` with `new_type`.
    ///
    /// Every corner of those tiles gets the new type with full partial bits,
    /// transitions are bled outward and the affected tiles are redrawn.
    /// Returns the tile region passed to listeners.
    pub fn paint_terrain(
        &mut self,
        tiles: Region,
        new_type: TerrainType,
    ) -> Result<Region, EditorError> {
        let corners = Region::new(
            tiles.x,
            tiles.y,
            tiles.width.saturating_add(1),
            tiles.height.saturating_add(1),
        )
        .clamped(self.document.terrain.width(), self.document.terrain.height());
        if corners.is_empty() {
            return Ok(Region::default());
        }

        let before = self.snapshot_reach(corners);
        self.document.terrain.fill_region(corners, new_type);
        self.document
            .partial_bits
            .fill_region(corners, FULL_PARTIAL_BITS);
        self.edit(new_type, corners, before, format!("Paint {new_type}"))
    }

    /// Bleed transitions for `new_type` around the corner-cell `region`,
    /// which already holds that terrain, and redraw the affected tiles
    pub fn apply_terrain_type(
        &mut self,
        new_type: TerrainType,
        region: Region,
    ) -> Result<Region, EditorError> {
        let region = region
            .clamped(self.document.terrain.width(), self.document.terrain.height());
        if region.is_empty() {
            return Ok(Region::default());
        }
        let before = self.snapshot_reach(region);
        self.edit(new_type, region, before, format!("Apply {new_type}"))
    }

    /// Set one corner's partial bits and redraw the tiles around it
    pub fn set_partial_bits(&mut self, x: i32, y: i32, bits: u8) -> Result<Region, EditorError> {
        let corner = Region::cell(x, y);
        let before = CornerSnapshot::capture(&self.document, corner);
        self.document.partial_bits.set_bits(x, y, bits)?;
        let after = CornerSnapshot::capture(&self.document, corner);

        let command = TerrainEditCommand::from_diff(corner, &before, &after, "Set Partial Bits");
        self.record(command);
        self.redraw(corner)
    }

    /// Undo the last edit; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Result<Option<Region>, EditorError> {
        match self.history.undo(&mut self.document) {
            Some(corners) => {
                self.dirty = true;
                self.redraw(corners).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Redo the last undone edit; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Result<Option<Region>, EditorError> {
        match self.history.redo(&mut self.document) {
            Some(corners) => {
                self.dirty = true;
                self.redraw(corners).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn save_map_file(&mut self, path: &Path) -> Result<(), EditorError> {
        self.document.save(path)?;
        self.dirty = false;
        Ok(())
    }

    /// Every corner propagation from `region` could write
    fn snapshot_reach(&self, region: Region) -> CornerSnapshot {
        let reach = self.config.max_transition_rings.min(i32::MAX as usize) as i32;
        CornerSnapshot::capture(&self.document, region.grown(reach))
    }

    fn edit(
        &mut self,
        new_type: TerrainType,
        region: Region,
        before: CornerSnapshot,
        description: String,
    ) -> Result<Region, EditorError> {
        let propagation = propagate(
            &mut self.document.terrain,
            new_type,
            region,
            self.config.max_transition_rings,
        );
        debug!(
            "{}: {} transition cells over {} rings",
            description,
            propagation.changed_cells(),
            propagation.rings
        );
        // Terrain written by a transition starts with full coverage
        for &(x, y) in &propagation.changed {
            self.document.partial_bits.set_bits(x, y, FULL_PARTIAL_BITS)?;
        }
        let corners = propagation
            .region
            .clamped(self.document.terrain.width(), self.document.terrain.height());

        let after = CornerSnapshot::capture(&self.document, before.region());
        let command = TerrainEditCommand::from_diff(corners, &before, &after, description);
        self.record(command);
        self.redraw(corners)
    }

    fn record(&mut self, command: TerrainEditCommand) {
        if !command.is_empty() {
            self.history.push_undo(Box::new(command));
            self.dirty = true;
        }
    }

    /// Recompute the tiles around `corners` and notify listeners
    fn redraw(&mut self, corners: Region) -> Result<Region, EditorError> {
        let blender = CornerBlender::new(
            &self.document.terrain,
            &self.document.partial_bits,
            &self.tileset,
        );
        let tiles = blender.recompute_indices(&mut self.layer, corners, self.picker.as_mut())?;
        self.listeners.notify(tiles, &self.layer);
        Ok(tiles)
    }
}
