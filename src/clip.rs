use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use crate::options::{ClipOptions, Error};
use crate::queue::TaskQueue;
use crate::state::GeometryState;
use crate::types::{Point, Rect, Size, Vec2};

/// Content hosted inside an [`InfiniteClip`].
///
/// `refresh` is called synchronously on every geometry change (user scroll,
/// resize, or a recenter), with the visible rectangle expressed in logical
/// content coordinates. It fires on every scroll tick, so implementations
/// must be cheap when nothing changed — [`crate::TileEngine`] already is.
///
/// `refresh` must not synchronously scroll or resize the clip it is hosted
/// in; a reentrant geometry event skips the nested provider forward.
pub trait ClipContent {
    fn refresh(&mut self, visible: Rect);
}

/// Computes the translation that would recenter `clip` inside `doc_frame`,
/// or [`Vec2::ZERO`] when every edge margin is still at least `threshold`.
///
/// The centered origin is integer-truncated per axis, so recentering a
/// pixel-aligned window keeps it pixel-aligned. Pure and idempotent: applying
/// the returned offset to `clip.origin` and recomputing yields zero.
pub fn recenter_offset(doc_frame: Rect, clip: Rect, threshold: f64) -> Vec2 {
    // Margins from the clip window to each edge of the backing surface. If
    // any of these ever reaches zero the scroll edge has been hit and the
    // threshold was too small for the host's per-event scroll deltas.
    let min_horizontal = clip.min_x() - doc_frame.min_x();
    let max_horizontal = doc_frame.max_x() - clip.max_x();
    let min_vertical = clip.min_y() - doc_frame.min_y();
    let max_vertical = doc_frame.max_y() - clip.max_y();

    if min_horizontal < threshold
        || max_horizontal < threshold
        || min_vertical < threshold
        || max_vertical < threshold
    {
        let centered = Point::new(
            doc_frame.min_x() + ((doc_frame.size.width - clip.size.width) / 2.0).trunc(),
            doc_frame.min_y() + ((doc_frame.size.height - clip.size.height) / 2.0).trunc(),
        );
        centered - clip.origin
    } else {
        Vec2::ZERO
    }
}

#[derive(Clone, Copy, Debug)]
struct Geometry {
    /// The finite backing surface; its size never changes after setup.
    doc_frame: Rect,
    /// Logical origin of the content plane; recentering shifts it so the
    /// content under the window stays put.
    doc_origin: Point,
    /// The visible window, in backing-surface coordinates.
    clip: Rect,
}

impl Geometry {
    fn visible_rect(&self) -> Rect {
        let origin = self.doc_origin + (self.clip.origin - self.doc_frame.origin);
        Rect::from_origin_size(origin, self.clip.size)
    }
}

struct ClipInner {
    options: ClipOptions,
    geom: RefCell<Geometry>,
    content: RefCell<Option<Box<dyn ClipContent>>>,
    queue: Rc<dyn TaskQueue>,
    in_recenter: Cell<bool>,
    recenter_scheduled: Cell<bool>,
}

/// Clears the in-recenter flag when the recenter scope exits, even if the
/// content refresh it dispatches panics.
struct RecenterGuard<'a>(&'a Cell<bool>);

impl<'a> RecenterGuard<'a> {
    fn arm(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for RecenterGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A finite viewport that fakes unbounded panning.
///
/// The clip owns three pieces of geometry: the fixed backing surface
/// (`doc_frame`), the movable visible window inside it (`clip_bounds`), and
/// the logical content origin (`doc_origin`). Hosts feed scroll and resize
/// events in through [`scroll_to`](Self::scroll_to) and
/// [`set_clip_size`](Self::set_clip_size); the clip keeps the window away
/// from the surface edges by deferred recentering and forwards every
/// geometry change to the attached [`ClipContent`].
///
/// The type is built on `Rc`/`RefCell` and is deliberately `!Send`: all
/// geometry mutation belongs to the single UI task, and handing a clip to
/// another thread is a compile error rather than a data race.
#[derive(Clone)]
pub struct InfiniteClip {
    inner: Rc<ClipInner>,
}

impl InfiniteClip {
    /// Creates a clip with the window at the surface origin and the logical
    /// origin at `(0, 0)`.
    ///
    /// Fails fast when the options cannot support recentering (surface
    /// smaller than the window plus two thresholds, bad threshold).
    pub fn new(options: ClipOptions, queue: Rc<dyn TaskQueue>) -> Result<Self, Error> {
        options.validate()?;
        idebug!(
            doc_width = options.doc_size.width,
            doc_height = options.doc_size.height,
            clip_width = options.clip_size.width,
            clip_height = options.clip_size.height,
            threshold = options.threshold,
            "InfiniteClip::new"
        );
        Ok(Self {
            inner: Rc::new(ClipInner {
                geom: RefCell::new(Geometry {
                    doc_frame: Rect::from_origin_size(Point::ZERO, options.doc_size),
                    doc_origin: Point::ZERO,
                    clip: Rect::from_origin_size(Point::ZERO, options.clip_size),
                }),
                options,
                content: RefCell::new(None),
                queue,
                in_recenter: Cell::new(false),
                recenter_scheduled: Cell::new(false),
            }),
        })
    }

    pub fn options(&self) -> ClipOptions {
        self.inner.options
    }

    /// Attaches the content provider and delivers an initial geometry event
    /// so it can materialize the starting visible rect.
    pub fn set_content(&self, content: impl ClipContent + 'static) {
        *self.inner.content.borrow_mut() = Some(Box::new(content));
        self.geometry_changed();
    }

    /// Detaches and returns the content provider, if any. With no content
    /// attached, recentering and refresh forwarding degrade to no-ops.
    pub fn take_content(&self) -> Option<Box<dyn ClipContent>> {
        self.inner.content.borrow_mut().take()
    }

    /// The visible rectangle in logical content coordinates. This is what
    /// the content provider sees, and it is unchanged by recentering.
    pub fn visible_rect(&self) -> Rect {
        self.inner.geom.borrow().visible_rect()
    }

    /// The visible window in backing-surface coordinates.
    pub fn clip_bounds(&self) -> Rect {
        self.inner.geom.borrow().clip
    }

    /// The finite backing surface.
    pub fn doc_frame(&self) -> Rect {
        self.inner.geom.borrow().doc_frame
    }

    /// The logical content origin.
    pub fn doc_origin(&self) -> Point {
        self.inner.geom.borrow().doc_origin
    }

    /// The pending recenter translation for the current geometry; zero when
    /// the window is comfortably inside the surface.
    pub fn recenter_offset(&self) -> Vec2 {
        let geom = self.inner.geom.borrow();
        recenter_offset(geom.doc_frame, geom.clip, self.inner.options.threshold)
    }

    /// Moves the visible window to `origin` (backing-surface coordinates).
    ///
    /// This is the direct scroll path: hosts with their own smoothing should
    /// resolve it to a plain origin move before calling in, since a recenter
    /// between smoothing steps would be misinterpreted as user scrolling.
    pub fn scroll_to(&self, origin: Point) {
        itrace!(x = origin.x, y = origin.y, "scroll_to");
        self.inner.geom.borrow_mut().clip.origin = origin;
        self.geometry_changed();
    }

    /// Scrolls by a delta in logical content coordinates.
    pub fn scroll_by(&self, delta: Vec2) {
        let origin = self.inner.geom.borrow().clip.origin + delta;
        self.scroll_to(origin);
    }

    /// Resizes the visible window, e.g. when the host view is resized.
    pub fn set_clip_size(&self, size: Size) {
        itrace!(width = size.width, height = size.height, "set_clip_size");
        self.inner.geom.borrow_mut().clip.size = size;
        self.geometry_changed();
    }

    /// The single entry point for "the geometry changed, for any reason".
    ///
    /// Sequencing only, no state: schedule a deferred recenter when one is
    /// needed, then unconditionally forward the visible rect to the content
    /// provider. Hosts normally reach this through `scroll_to` /
    /// `set_clip_size`; it is public for hosts that mutate geometry through
    /// [`restore_geometry_state`](Self::restore_geometry_state) equivalents
    /// of their own.
    pub fn geometry_changed(&self) {
        let (offset, visible) = {
            let geom = self.inner.geom.borrow();
            (
                recenter_offset(geom.doc_frame, geom.clip, self.inner.options.threshold),
                geom.visible_rect(),
            )
        };

        // Recentering synchronously from inside the event that reported the
        // geometry change corrupts the host's pending-scroll bookkeeping, so
        // it is always deferred to the next queue turn.
        if !offset.is_zero() && self.has_content() {
            self.schedule_recenter();
        }

        // A provider that re-enters the clip from `refresh` finds the slot
        // borrowed; the nested forward is skipped rather than panicking.
        if let Ok(mut slot) = self.inner.content.try_borrow_mut() {
            if let Some(content) = slot.as_mut() {
                content.refresh(visible);
            }
        }
    }

    /// Applies a pending recenter immediately.
    ///
    /// No-op when no content is attached, when the offset is zero, or when a
    /// recenter is already in progress. Hosts call this once after attaching
    /// content so the user can pan in every direction from the start; later
    /// recenters arrive through the deferred scheduling path.
    pub fn recenter(&self) {
        if self.inner.in_recenter.get() || !self.has_content() {
            return;
        }

        let offset = self.recenter_offset();
        if offset.is_zero() {
            return;
        }

        let _guard = RecenterGuard::arm(&self.inner.in_recenter);
        {
            let mut geom = self.inner.geom.borrow_mut();
            // Both origins move together inside one borrow scope: no caller
            // can observe the translation as two separate moves, and the
            // logical visible rect is bit-identical before and after.
            geom.doc_origin -= offset;
            geom.clip.origin += offset;
        }
        idebug!(dx = offset.x, dy = offset.y, "recenter");

        // The origin mutation is itself a geometry change. The guard keeps
        // this dispatch from scheduling a recursive recenter; the content
        // refresh still runs.
        self.geometry_changed();
    }

    fn schedule_recenter(&self) {
        if self.inner.recenter_scheduled.get() || self.inner.in_recenter.get() {
            return;
        }
        self.inner.recenter_scheduled.set(true);
        itrace!("schedule_recenter");

        let weak: Weak<ClipInner> = Rc::downgrade(&self.inner);
        self.inner.queue.post(Box::new(move || {
            // The clip may have been torn down before this turn runs.
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.recenter_scheduled.set(false);
            // Trust the trigger and recenter unconditionally; `recenter`
            // itself is a no-op if the offset has since become zero.
            InfiniteClip { inner }.recenter();
        }));
    }

    /// Captures the current geometry for later restoration.
    pub fn geometry_state(&self) -> GeometryState {
        let geom = self.inner.geom.borrow();
        GeometryState {
            doc_frame: geom.doc_frame,
            doc_origin: geom.doc_origin,
            clip: geom.clip,
        }
    }

    /// Restores previously captured geometry and re-dispatches the geometry
    /// event so the content reconciles against the restored visible rect.
    pub fn restore_geometry_state(&self, state: GeometryState) {
        {
            let mut geom = self.inner.geom.borrow_mut();
            geom.doc_frame = state.doc_frame;
            geom.doc_origin = state.doc_origin;
            geom.clip = state.clip;
        }
        self.geometry_changed();
    }

    fn has_content(&self) -> bool {
        self.inner
            .content
            .try_borrow()
            .map(|c| c.is_some())
            .unwrap_or(true)
    }
}

impl core::fmt::Debug for InfiniteClip {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let geom = self.inner.geom.borrow();
        f.debug_struct("InfiniteClip")
            .field("doc_frame", &geom.doc_frame)
            .field("doc_origin", &geom.doc_origin)
            .field("clip", &geom.clip)
            .field("threshold", &self.inner.options.threshold)
            .field("in_recenter", &self.inner.in_recenter.get())
            .field("recenter_scheduled", &self.inner.recenter_scheduled.get())
            .finish()
    }
}
