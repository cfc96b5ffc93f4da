//! A headless infinite-panning and tile virtualization engine.
//!
//! Finite, fixed-precision scroll surfaces can fake unbounded panning with two
//! cooperating algorithms:
//!
//! - **Recentering** ([`InfiniteClip`]): whenever the visible window drifts
//!   within a threshold of the backing surface's edges, the coordinate origin
//!   is shifted back toward the center. The shift is applied to both the
//!   content origin and the window origin at once, so the user never sees a
//!   jump — panning simply never runs out of room.
//! - **Tile virtualization** ([`TileEngine`]): the logical visible rectangle
//!   is mapped onto a sparse grid of fixed-size cells; cell handles are
//!   created as indices scroll into view and dropped as they scroll out.
//!
//! The crate is UI-agnostic. A host layer is expected to provide:
//! - geometry events (scroll / resize), delivered via [`InfiniteClip::scroll_to`]
//!   and [`InfiniteClip::set_clip_size`]
//! - a way to run a callback on the next turn of its event loop (the
//!   [`TaskQueue`] trait; [`MainQueue`] is a ready-made single-threaded queue)
//! - what a tile actually *is* (the handle type of [`TileEngine`] is opaque)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod clip;
mod content;
mod options;
mod queue;
mod state;
mod tiling;
mod types;


pub use clip::{ClipContent, InfiniteClip, recenter_offset};
pub use content::TiledContent;
pub use options::{ClipOptions, Error, IncludePredicate, TileFactory, TileOptions, TileTeardown};
pub use queue::{MainQueue, Task, TaskQueue};
pub use state::GeometryState;
pub use tiling::TileEngine;
pub use types::{Point, Rect, Size, TileKey, TileRange, TileRangeIter, Vec2};
