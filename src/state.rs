use crate::types::{Point, Rect};

/// A lightweight, serializable snapshot of a clip's geometry.
///
/// Captured with [`crate::InfiniteClip::geometry_state`] and restored with
/// [`crate::InfiniteClip::restore_geometry_state`], e.g. to keep the user's
/// pan position across sessions. With `feature = "serde"`, this type
/// implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryState {
    pub doc_frame: Rect,
    pub doc_origin: Point,
    pub clip: Rect,
}
