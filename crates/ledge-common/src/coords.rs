//! Vector, rectangle and bounding-box types shared by the map, physics
//! and renderer.

use serde::{Deserialize, Serialize};

pub use glam::{IVec2, Vec2};

/// Integer rectangle in pixels, top-left origin.
///
/// Used for map object bounds, sprite-sheet source cells and tile cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Corners in clockwise order starting at the top-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let (l, t) = (self.x as f32, self.y as f32);
        let (r, b) = (self.right() as f32, self.bottom() as f32);
        [
            Vec2::new(l, t),
            Vec2::new(r, t),
            Vec2::new(r, b),
            Vec2::new(l, b),
        ]
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Axis-aligned bounding box in world pixels, top-left origin.
///
/// Derived on demand from an owner's position; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an AABB at `origin` with the given size.
    #[must_use]
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half of the width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        self.size() / 2.0
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin() + self.half_extents()
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Checks if this AABB overlaps another. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

impl From<Rect> for Aabb {
    fn from(rect: Rect) -> Self {
        Self::new(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        )
    }
}

/// Rounds both components to the nearest integer, ties to even.
///
/// Positions are pixel-snapped this way after every integration step.
#[must_use]
pub fn snap_to_pixel(v: Vec2) -> Vec2 {
    Vec2::new(v.x.round_ties_even(), v.y.round_ties_even())
}
