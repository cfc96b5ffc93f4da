use core::ops::{Add, AddAssign, Sub, SubAssign};

/// A position in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A translation between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl AddAssign<Vec2> for Point {
    fn add_assign(&mut self, v: Vec2) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;

    fn sub(self, v: Vec2) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl SubAssign<Vec2> for Point {
    fn sub_assign(&mut self, v: Vec2) {
        self.x -= v.x;
        self.y -= v.y;
    }
}

impl Sub<Point> for Point {
    type Output = Vec2;

    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle (origin + size).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn translate(&self, v: Vec2) -> Rect {
        Rect::from_origin_size(self.origin + v, self.size)
    }

    /// Shrinks the rectangle by `dx`/`dy` on each side (negative values grow it).
    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width - 2.0 * dx,
            self.size.height - 2.0 * dy,
        )
    }
}

/// The integer grid coordinate of a virtualized cell.
///
/// Keys are stable for the life of the surface: the cell covering a logical
/// point has the same key no matter how many recenters happened in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileKey {
    pub x: i64,
    pub y: i64,
}

impl TileKey {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A half-open 2-D index range: key `(x, y)` is inside iff
/// `x_min <= x < x_max` and `y_min <= y < y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRange {
    pub x_min: i64,
    pub x_max: i64, // exclusive
    pub y_min: i64,
    pub y_max: i64, // exclusive
}

impl TileRange {
    pub const EMPTY: Self = Self {
        x_min: 0,
        x_max: 0,
        y_min: 0,
        y_max: 0,
    };

    /// Computes the index range of tiles overlapping `visible`.
    ///
    /// `min` indices are inclusive (`floor`), `max` indices exclusive (`ceil`):
    /// a rect of `(0, 0, 500, 500)` over 250×250 tiles covers `[0, 2) × [0, 2)`.
    /// An empty rect yields an empty range. `tile_size` must be positive.
    pub fn from_rect(visible: Rect, tile_size: Size) -> Self {
        debug_assert!(
            tile_size.width > 0.0 && tile_size.height > 0.0,
            "tile_size must be positive (got {tile_size:?})"
        );
        if visible.is_empty() {
            return Self::EMPTY;
        }
        Self {
            x_min: (visible.min_x() / tile_size.width).floor() as i64,
            x_max: (visible.max_x() / tile_size.width).ceil() as i64,
            y_min: (visible.min_y() / tile_size.height).floor() as i64,
            y_max: (visible.max_y() / tile_size.height).ceil() as i64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }

    /// Number of keys inside the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let w = (self.x_max - self.x_min) as usize;
        let h = (self.y_max - self.y_min) as usize;
        w.saturating_mul(h)
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.x_min <= key.x && key.x < self.x_max && self.y_min <= key.y && key.y < self.y_max
    }

    /// Iterates all keys in the range, row-major.
    pub fn keys(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            next: if self.is_empty() {
                None
            } else {
                Some(TileKey::new(self.x_min, self.y_min))
            },
        }
    }
}

/// Row-major iterator over the keys of a [`TileRange`].
#[derive(Clone, Debug)]
pub struct TileRangeIter {
    range: TileRange,
    next: Option<TileKey>,
}

impl Iterator for TileRangeIter {
    type Item = TileKey;

    fn next(&mut self) -> Option<TileKey> {
        let cur = self.next?;
        let mut nxt = TileKey::new(cur.x + 1, cur.y);
        if nxt.x >= self.range.x_max {
            nxt = TileKey::new(self.range.x_min, cur.y + 1);
        }
        self.next = (nxt.y < self.range.y_max).then_some(nxt);
        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(cur) => {
                let row_w = (self.range.x_max - self.range.x_min) as usize;
                let rows_left = (self.range.y_max - 1 - cur.y) as usize;
                let in_row = (self.range.x_max - cur.x) as usize;
                let n = rows_left.saturating_mul(row_w).saturating_add(in_row);
                (n, Some(n))
            }
        }
    }
}
