use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::options::{Error, TileOptions};
use crate::types::{Rect, TileKey, TileRange};

#[cfg(feature = "std")]
type TileMap<T> = HashMap<TileKey, T>;
#[cfg(not(feature = "std"))]
type TileMap<T> = BTreeMap<TileKey, T>;

/// Maintains the minimal set of materialized tiles covering a visible rect.
///
/// The engine is headless: `T` is whatever the host considers a tile (a view
/// handle, a texture id, a cache entry). The engine only decides which keys
/// exist; creation and release run through the closures handed to
/// [`reconcile`](Self::reconcile).
///
/// There is no eviction policy beyond visibility. The working set is bounded
/// by the visible area divided by the tile area (plus one partial row and
/// column), which is bounded by design as long as the recenter controller
/// keeps the window away from the surface edges.
pub struct TileEngine<T> {
    options: TileOptions,
    tiles: TileMap<T>,
    last_range: Option<TileRange>,
}

impl<T> TileEngine<T> {
    pub fn new(options: TileOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            options,
            tiles: TileMap::new(),
            last_range: None,
        })
    }

    pub fn options(&self) -> &TileOptions {
        &self.options
    }

    /// Replaces the options. This invalidates the cached range, so the next
    /// `reconcile` performs a full diff even for an unchanged visible rect —
    /// a changed inclusion predicate must be able to evict existing tiles.
    pub fn set_options(&mut self, options: TileOptions) -> Result<(), Error> {
        options.validate()?;
        self.options = options;
        self.last_range = None;
        Ok(())
    }

    /// Number of materialized tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.tiles.contains_key(&key)
    }

    pub fn get(&self, key: TileKey) -> Option<&T> {
        self.tiles.get(&key)
    }

    pub fn get_mut(&mut self, key: TileKey) -> Option<&mut T> {
        self.tiles.get_mut(&key)
    }

    /// Iterates materialized tiles without allocating. Order is unspecified.
    pub fn for_each_tile(&self, mut f: impl FnMut(TileKey, &T)) {
        for (key, tile) in &self.tiles {
            f(*key, tile);
        }
    }

    /// The index range of the last reconciled visible rect, if any.
    pub fn visible_range(&self) -> Option<TileRange> {
        self.last_range
    }

    /// The frame of the tile at `key`, with the configured gutter applied.
    pub fn tile_frame(&self, key: TileKey) -> Rect {
        let w = self.options.tile_size.width;
        let h = self.options.tile_size.height;
        Rect::new(key.x as f64 * w, key.y as f64 * h, w, h)
            .inset(self.options.inset, self.options.inset)
    }

    /// Reconciles the tile map against `visible`.
    ///
    /// Every included in-range key that is absent gets a handle from `make`;
    /// every present key that fell out of range (or out of the inclusion
    /// predicate) is removed and released through `teardown`. No ordering is
    /// guaranteed among sibling creations/removals; the post-condition is
    /// only that the key set equals the included in-range set.
    ///
    /// Calling this with the same visible range twice is an allocation-free
    /// no-op, so it is safe to drive from every scroll tick.
    pub fn reconcile(
        &mut self,
        visible: Rect,
        mut make: impl FnMut(TileKey, Rect) -> T,
        mut teardown: impl FnMut(TileKey, T),
    ) {
        let range = TileRange::from_rect(visible, self.options.tile_size);
        if self.last_range == Some(range) {
            return;
        }

        for key in range.keys() {
            if !self.options.included(key) || self.tiles.contains_key(&key) {
                continue;
            }
            let frame = self.tile_frame(key);
            self.tiles.insert(key, make(key, frame));
        }

        let stale: Vec<TileKey> = self
            .tiles
            .keys()
            .copied()
            .filter(|k| !range.contains(*k) || !self.options.included(*k))
            .collect();
        for key in &stale {
            if let Some(tile) = self.tiles.remove(key) {
                teardown(*key, tile);
            }
        }

        itrace!(
            range_len = range.len(),
            live = self.tiles.len(),
            "reconcile"
        );
        self.last_range = Some(range);
    }

    /// Removes and releases every tile and forgets the cached range.
    pub fn clear(&mut self, mut teardown: impl FnMut(TileKey, T)) {
        let keys: Vec<TileKey> = self.tiles.keys().copied().collect();
        for key in keys {
            if let Some(tile) = self.tiles.remove(&key) {
                teardown(key, tile);
            }
        }
        self.last_range = None;
    }
}

impl<T> core::fmt::Debug for TileEngine<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TileEngine")
            .field("options", &self.options)
            .field("tiles", &self.tiles.len())
            .field("last_range", &self.last_range)
            .finish()
    }
}
