//! 2D camera that keeps a target centred in the viewport.
//!
//! The camera position is the world coordinate of the viewport's top-left
//! corner. The view transform is a pure translation by the negated position,
//! so world pixels map 1:1 to screen pixels.

use glam::{Mat4, Vec2, Vec3};
use ledge_common::Aabb;

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 768;

/// 2D camera following a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World position of the viewport's top-left corner.
    position: Vec2,
    /// Last point the camera was asked to centre on.
    target: Vec2,
    /// Viewport size in pixels (width, height).
    viewport_size: (u32, u32),
    transform: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl Camera {
    /// Creates a camera centred on the world origin.
    #[must_use]
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            viewport_size: (viewport_width, viewport_height),
            transform: Mat4::IDENTITY,
        };
        camera.update(Vec2::ZERO, viewport_width, viewport_height);
        camera
    }

    /// Centres the view on `target` for a viewport of the given size.
    pub fn update(&mut self, target: Vec2, viewport_width: u32, viewport_height: u32) {
        self.target = target;
        self.viewport_size = (viewport_width, viewport_height);
        self.position = target - self.half_viewport();
        self.transform = Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));
    }

    /// Applies a new viewport size, keeping the last target centred.
    pub fn resize(&mut self, viewport_width: u32, viewport_height: u32) {
        self.update(self.target, viewport_width, viewport_height);
    }

    /// World position of the viewport's top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Point the view is centred on.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport_size
    }

    /// World-to-screen transform for the sprite batch.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Convert world coordinates to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.transform.transform_point3(world.extend(0.0)).truncate()
    }

    /// Convert screen coordinates to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// Region of the world covered by the viewport.
    #[must_use]
    pub fn visible_bounds(&self) -> Aabb {
        Aabb::from_origin(self.position, self.half_viewport() * 2.0)
    }

    /// Check if a world rectangle intersects the visible area.
    #[must_use]
    pub fn is_rect_visible(&self, rect: &Aabb) -> bool {
        self.visible_bounds().overlaps(rect)
    }

    fn half_viewport(&self) -> Vec2 {
        Vec2::new(
            self.viewport_size.0 as f32 / 2.0,
            self.viewport_size.1 as f32 / 2.0,
        )
    }
}
