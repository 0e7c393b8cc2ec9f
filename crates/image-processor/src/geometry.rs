//! Rectangle and point primitives in pixel coordinates.
//!
//! Rectangles are half-open on the right and bottom edges, matching row/column
//! slicing of the pixel buffer: a `Rect` covers columns `left..right` and rows
//! `top..bottom`.

use serde::{Deserialize, Serialize};

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
///
/// `left <= right` and `top <= bottom` are assumed but not enforced; a
/// rectangle built from a badly ordered quad keeps its inverted edges and is
/// rejected later as a degenerate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Width and height of a rectangle. Components may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dim {
    pub width: i32,
    pub height: i32,
}

/// Drawing colour in blue/green/red order, used for debug overlays only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    pub const GREEN: Color = Color { b: 0, g: 255, r: 0 };

    pub const fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GREEN
    }
}

impl Dim {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when both components are strictly positive.
    pub const fn is_positive(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `(right - left, bottom - top)` without validation.
    pub const fn dim(&self) -> Dim {
        Dim {
            width: self.right - self.left,
            height: self.bottom - self.top,
        }
    }

    /// Build a rectangle from a bounding quad.
    ///
    /// The first and third points are taken as the top-left and bottom-right
    /// corners. Point order is not checked.
    pub const fn from_quad(quad: &[Point; 4]) -> Self {
        Self {
            left: quad[0].x,
            top: quad[0].y,
            right: quad[2].x,
            bottom: quad[2].y,
        }
    }

    /// The rectangle covering a whole `width` x `height` image.
    pub fn of_image(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: saturating_i32(width),
            bottom: saturating_i32(height),
        }
    }

    /// Left half, split at the truncated horizontal midpoint.
    pub const fn left_half(&self) -> Self {
        Self::new(self.left, self.top, self.mid_x(), self.bottom)
    }

    /// Right half, split at the truncated horizontal midpoint.
    pub const fn right_half(&self) -> Self {
        Self::new(self.mid_x(), self.top, self.right, self.bottom)
    }

    /// Top half, split at the truncated vertical midpoint.
    pub const fn top_half(&self) -> Self {
        Self::new(self.left, self.top, self.right, self.mid_y())
    }

    /// Bottom half, split at the truncated vertical midpoint.
    pub const fn bottom_half(&self) -> Self {
        Self::new(self.left, self.mid_y(), self.right, self.bottom)
    }

    /// Whether this rectangle is well ordered and lies inside `bounds`.
    pub const fn is_within(&self, bounds: &Rect) -> bool {
        self.left <= self.right
            && self.top <= self.bottom
            && self.left >= bounds.left
            && self.top >= bounds.top
            && self.right <= bounds.right
            && self.bottom <= bounds.bottom
    }

    /// Corner points in top-left, top-right, bottom-right, bottom-left order.
    pub const fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    // Midpoints truncate toward zero, like integer division of the sum.
    const fn mid_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    const fn mid_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }
}

fn saturating_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
