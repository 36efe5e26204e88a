//! Pure coordinate math for the board.
//!
//! Nothing in here reads or writes state: every function takes explicit inputs
//! and returns a value. The gesture state machine and the hit-tester are the
//! only callers, and both go through these helpers so that views never need
//! their own copy of the math.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::MIN_ITEM_SIZE;

/// A point in board-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side `side` centred on `center`.
    #[must_use]
    pub fn centered(center: Point, side: f64) -> Self {
        let half = side * 0.5;
        Self::new(center.x - half, center.y - half, side, side)
    }

    /// Geometric centre.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive containment test ignoring rotation.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Round `value` to the nearest multiple of `grid_size` when `enabled`.
///
/// Halves round towards positive infinity, so `-7.5` on a 15 grid snaps to
/// `0` rather than `-15`. A non-positive or non-finite grid size disables
/// snapping.
#[must_use]
pub fn snap(value: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled || !grid_size.is_finite() || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size + 0.5).floor() * grid_size
}

/// Angle of the vector from `center` to `p`, in degrees.
///
/// 0° points along +x and angles grow clockwise in screen space (y down).
#[must_use]
pub fn angle_from_center(p: Point, center: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// New size after dragging the resize handle `delta_x` units to the right,
/// keeping the starting aspect ratio and the [`MIN_ITEM_SIZE`] floor.
///
/// Width is driven by the pointer; height follows the aspect ratio. When the
/// height would drop below the floor it is pinned there and the width is
/// recomputed from it instead.
#[must_use]
pub fn resize_keeping_aspect(start: Size, delta_x: f64) -> Size {
    let aspect = start.width / start.height;
    let width = (start.width + delta_x).max(MIN_ITEM_SIZE);
    let height = width / aspect;
    if height < MIN_ITEM_SIZE {
        return Size::new(MIN_ITEM_SIZE * aspect, MIN_ITEM_SIZE);
    }
    Size::new(width, height)
}

/// Clamp `value` into `[0, max]`, collapsing to `0` when `max` is negative.
///
/// Unlike [`f64::clamp`] this never panics on an inverted range, which happens
/// whenever an item is larger than the board.
#[must_use]
pub fn clamp_to_extent(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

/// Rotate `p` around `center` by `degrees` (clockwise in screen space).
#[must_use]
pub fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Whether `p` lies inside `rect` after the rectangle is rotated by
/// `rotation_deg` around its centre.
#[must_use]
pub fn contains_rotated(rect: Rect, rotation_deg: f64, p: Point) -> bool {
    let local = rotate_about(p, rect.center(), -rotation_deg);
    rect.contains(local)
}
