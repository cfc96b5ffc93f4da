use alloc::sync::Arc;

use crate::types::{Rect, Size, TileKey};

/// Decides whether a tile key inside the visible range should materialize.
///
/// The default (no predicate) includes every key. A provider can skip cells,
/// e.g. `|k| (k.x + k.y) % 2 == 0` for a checkerboard.
pub type IncludePredicate = Arc<dyn Fn(TileKey) -> bool + Send + Sync>;

/// Creates the handle for a tile entering visibility, given its key and frame.
pub type TileFactory<T> = Arc<dyn Fn(TileKey, Rect) -> T + Send + Sync>;

/// Releases the handle for a tile leaving visibility.
pub type TileTeardown<T> = Arc<dyn Fn(TileKey, T) + Send + Sync>;

/// A setup-time configuration error.
///
/// Geometry events never fail (bad states degrade to no-ops); only building a
/// clip or engine from inconsistent options is rejected, and rejected early.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The backing surface cannot fit the visible window plus a recenter
    /// margin on both sides; recentering would never find room.
    DocTooSmall {
        doc: Size,
        clip: Size,
        threshold: f64,
    },
    /// The recenter threshold is not a finite positive number.
    BadThreshold(f64),
    /// The tile size is not finite and positive on both axes.
    BadTileSize(Size),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DocTooSmall {
                doc,
                clip,
                threshold,
            } => write!(
                f,
                "document size {}x{} must be at least the clip size {}x{} plus 2x the recenter threshold {} on each axis",
                doc.width, doc.height, clip.width, clip.height, threshold
            ),
            Self::BadThreshold(t) => {
                write!(f, "recenter threshold must be finite and positive, got {t}")
            }
            Self::BadTileSize(s) => write!(
                f,
                "tile size must be finite and positive, got {}x{}",
                s.width, s.height
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Configuration for [`crate::InfiniteClip`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipOptions {
    /// Total size of the finite backing surface.
    pub doc_size: Size,
    /// Size of the visible window.
    pub clip_size: Size,
    /// Recenter when any edge margin drops below this many coordinate units.
    ///
    /// Must be strictly larger than the biggest single panning delta the host
    /// can deliver in one event, or the window can hit the surface edge
    /// before the deferred recenter runs. 500 is a generous default for
    /// wheel/trackpad-style input.
    pub threshold: f64,
}

impl ClipOptions {
    pub const DEFAULT_THRESHOLD: f64 = 500.0;

    pub fn new(doc_size: Size, clip_size: Size) -> Self {
        Self {
            doc_size,
            clip_size,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(Error::BadThreshold(self.threshold));
        }
        let fits = |doc: f64, clip: f64| {
            doc.is_finite() && clip.is_finite() && clip > 0.0 && doc >= clip + 2.0 * self.threshold
        };
        if !fits(self.doc_size.width, self.clip_size.width)
            || !fits(self.doc_size.height, self.clip_size.height)
        {
            return Err(Error::DocTooSmall {
                doc: self.doc_size,
                clip: self.clip_size,
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

/// Configuration for [`crate::TileEngine`].
#[derive(Clone)]
pub struct TileOptions {
    /// Size of one grid cell.
    pub tile_size: Size,
    /// Gutter trimmed off each side of a tile's frame (purely visual; the
    /// grid math always uses the full `tile_size`).
    pub inset: f64,
    /// Optional per-key materialization filter.
    pub include: Option<IncludePredicate>,
}

impl TileOptions {
    pub fn new(tile_size: Size) -> Self {
        Self {
            tile_size,
            inset: 0.0,
            include: None,
        }
    }

    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    pub fn with_include(
        mut self,
        include: Option<impl Fn(TileKey) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.include = include.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.tile_size.width) || !ok(self.tile_size.height) {
            return Err(Error::BadTileSize(self.tile_size));
        }
        Ok(())
    }

    pub(crate) fn included(&self, key: TileKey) -> bool {
        self.include.as_ref().is_none_or(|f| f(key))
    }
}

impl core::fmt::Debug for TileOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TileOptions")
            .field("tile_size", &self.tile_size)
            .field("inset", &self.inset)
            .field("include", &self.include.as_ref().map(|_| ".."))
            .finish()
    }
}
