//! Sprite batch interface and a recording implementation.
//!
//! Everything the game draws goes through [`SpriteBatch`]: a begin call with
//! the camera transform, any number of textured quads, then an end call.

use glam::{Mat4, Vec2};
use ledge_common::Rect;
use serde::{Deserialize, Serialize};

use crate::texture::TextureHandle;

/// RGBA tint multiplied into the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// No tint.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Collision outline colour.
    pub const RED: Self = Self::rgba(255, 0, 0, 255);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Horizontal or vertical mirroring of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flip {
    /// Drawn as stored
    #[default]
    None,
    /// Mirrored left-to-right
    Horizontal,
    /// Mirrored top-to-bottom
    Vertical,
}

/// One textured quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteDraw {
    /// Texture to sample
    pub texture: TextureHandle,
    /// World position of the sprite origin
    pub position: Vec2,
    /// Region of the texture to draw; the whole texture when `None`
    pub source: Option<Rect>,
    /// Colour multiplier
    pub tint: Color,
    /// Rotation around `origin` in radians
    pub rotation: f32,
    /// Pivot in source pixels
    pub origin: Vec2,
    /// Per-axis scale
    pub scale: Vec2,
    /// Mirroring
    pub flip: Flip,
    /// Layer depth, 0 is front
    pub depth: f32,
}

impl SpriteDraw {
    /// Untransformed, untinted draw of `source` at `position`.
    #[must_use]
    pub fn new(texture: TextureHandle, position: Vec2, source: Option<Rect>) -> Self {
        Self {
            texture,
            position,
            source,
            tint: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            flip: Flip::None,
            depth: 0.0,
        }
    }

    /// Same draw with a tint.
    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Same draw rotated by `rotation` radians.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Same draw scaled per axis.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Same draw mirrored.
    #[must_use]
    pub fn with_flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }
}

/// Destination for sprite draws.
pub trait SpriteBatch {
    /// Starts a batch drawn with the given world-to-screen transform.
    fn begin(&mut self, transform: Mat4);

    /// Queues one sprite.
    fn draw(&mut self, sprite: SpriteDraw);

    /// Ends the batch.
    fn end(&mut self);
}

/// A finished batch captured by [`RecordingBatch`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordedFrame {
    /// Transform passed to `begin`
    pub transform: Mat4,
    /// Draws in submission order
    pub draws: Vec<SpriteDraw>,
}

/// Sprite batch that keeps every draw in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingBatch {
    frames: Vec<RecordedFrame>,
    current: Option<RecordedFrame>,
}

impl RecordingBatch {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed batches.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Most recently completed batch.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Total draws across completed batches.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.draws.len()).sum()
    }

    /// Drops all recorded batches.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.current = None;
    }
}

impl SpriteBatch for RecordingBatch {
    fn begin(&mut self, transform: Mat4) {
        self.current = Some(RecordedFrame {
            transform,
            draws: Vec::new(),
        });
    }

    fn draw(&mut self, sprite: SpriteDraw) {
        // Draws outside begin/end are dropped.
        if let Some(frame) = self.current.as_mut() {
            frame.draws.push(sprite);
        }
    }

    fn end(&mut self) {
        if let Some(frame) = self.current.take() {
            self.frames.push(frame);
        }
    }
}
