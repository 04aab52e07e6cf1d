//! "Tiles updated" observers
//!
//! Listeners run synchronously, in registration order, before the edit that
//! triggered them returns.

use rts_map_core::{DrawLayer, Region};

/// Receives the tile region a finished edit rewrote
pub trait TilesUpdatedListener {
    fn tiles_updated(&mut self, region: Region, layer: &DrawLayer);
}

impl<F> TilesUpdatedListener for F
where
    F: FnMut(Region, &DrawLayer),
{
    fn tiles_updated(&mut self, region: Region, layer: &DrawLayer) {
        self(region, layer)
    }
}

/// Handle returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn TilesUpdatedListener>)>,
}

impl Listeners {
    pub fn subscribe(&mut self, listener: impl TilesUpdatedListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, region: Region, layer: &DrawLayer) {
        for (_, listener) in &mut self.entries {
            listener.tiles_updated(region, layer);
        }
    }
}
