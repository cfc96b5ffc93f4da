use alloc::sync::Arc;

use crate::clip::ClipContent;
use crate::options::{Error, TileFactory, TileOptions, TileTeardown};
use crate::tiling::TileEngine;
use crate::types::{Rect, TileKey};

/// A ready-made [`ClipContent`] that reconciles a [`TileEngine`] on every
/// geometry event.
///
/// Hosts that want the plain "grid of cells" behavior plug one of these into
/// [`crate::InfiniteClip::set_content`]; hosts with their own content model
/// implement [`ClipContent`] directly and drive a `TileEngine` (or anything
/// else) themselves.
pub struct TiledContent<T> {
    engine: TileEngine<T>,
    make: TileFactory<T>,
    teardown: Option<TileTeardown<T>>,
}

impl<T> TiledContent<T> {
    pub fn new(
        options: TileOptions,
        make: impl Fn(TileKey, Rect) -> T + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        Ok(Self {
            engine: TileEngine::new(options)?,
            make: Arc::new(make),
            teardown: None,
        })
    }

    /// Installs a release hook called with each tile leaving visibility.
    /// Without one, handles are simply dropped.
    pub fn with_teardown(mut self, teardown: impl Fn(TileKey, T) + Send + Sync + 'static) -> Self {
        self.teardown = Some(Arc::new(teardown));
        self
    }

    pub fn engine(&self) -> &TileEngine<T> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TileEngine<T> {
        &mut self.engine
    }
}

impl<T> ClipContent for TiledContent<T> {
    fn refresh(&mut self, visible: Rect) {
        let make = Arc::clone(&self.make);
        let teardown = self.teardown.clone();
        self.engine.reconcile(
            visible,
            |key, frame| make(key, frame),
            |key, tile| {
                if let Some(teardown) = &teardown {
                    teardown(key, tile);
                }
            },
        );
    }
}

impl<T> core::fmt::Debug for TiledContent<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TiledContent")
            .field("engine", &self.engine)
            .field("teardown", &self.teardown.as_ref().map(|_| ".."))
            .finish()
    }
}
