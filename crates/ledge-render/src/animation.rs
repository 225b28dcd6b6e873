//! Sprite-sheet animation clips and playback.
//!
//! A clip is a strip of equally sized frames laid out left to right, top
//! to bottom in one texture. The animator plays one clip at a time and
//! steps at most one frame per [`Animator::advance`] call.

use ahash::AHashMap;
use glam::Vec2;
use ledge_common::Rect;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sprite::{Flip, SpriteBatch, SpriteDraw};
use crate::texture::{TextureHandle, TextureTable};

/// Default seconds per frame.
pub const DEFAULT_FRAME_TIME: f32 = 0.1;

/// Frame geometry of one animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Number of frames
    pub frame_count: u32,
    /// Sheet the frames are cut from
    pub texture: TextureHandle,
}

/// Plays named clips.
#[derive(Debug, Clone)]
pub struct Animator {
    frame_time: f32,
    clips: AHashMap<String, AnimationClip>,
    active: Option<String>,
    frame: u32,
    elapsed: f32,
    flip: Flip,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_TIME)
    }
}

impl Animator {
    /// Creates an animator with no clips.
    #[must_use]
    pub fn new(frame_time: f32) -> Self {
        Self {
            frame_time,
            clips: AHashMap::new(),
            active: None,
            frame: 0,
            elapsed: 0.0,
            flip: Flip::None,
        }
    }

    /// Adds a clip. A name that is already registered keeps its first clip.
    ///
    /// Returns whether the clip was added.
    pub fn register(
        &mut self,
        name: &str,
        frame_width: u32,
        frame_height: u32,
        frame_count: u32,
        texture: TextureHandle,
    ) -> bool {
        if self.clips.contains_key(name) {
            debug!("Animation '{}' already registered", name);
            return false;
        }

        self.clips.insert(
            name.to_string(),
            AnimationClip {
                name: name.to_string(),
                frame_width,
                frame_height,
                frame_count,
                texture,
            },
        );
        info!(
            "Registered animation '{}' ({} frames of {}x{})",
            name, frame_count, frame_width, frame_height
        );
        true
    }

    /// Makes `name` the playing clip and restarts it.
    ///
    /// Does nothing when the clip is already playing or not registered.
    pub fn set_active(&mut self, name: &str) {
        if self.active.as_deref() == Some(name) || !self.clips.contains_key(name) {
            return;
        }

        debug!("Switching animation to '{}'", name);
        self.active = Some(name.to_string());
        self.frame = 0;
        self.elapsed = 0.0;
    }

    /// Accumulates time and steps one frame once `frame_time` has passed.
    pub fn advance(&mut self, dt: f32) {
        let Some(clip) = self.active_clip() else {
            return;
        };
        let frame_count = clip.frame_count.max(1);

        self.elapsed += dt;
        if self.elapsed >= self.frame_time {
            self.elapsed = 0.0;
            self.frame = (self.frame + 1) % frame_count;
        }
    }

    /// Name of the playing clip.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Playing clip.
    #[must_use]
    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.active.as_ref().and_then(|name| self.clips.get(name))
    }

    /// Registered clip by name.
    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    /// Index of the current frame.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Seconds per frame.
    #[must_use]
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Mirroring applied when drawing.
    #[must_use]
    pub fn flip(&self) -> Flip {
        self.flip
    }

    /// Sets the mirroring applied when drawing.
    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    /// Region of the sheet holding the current frame.
    ///
    /// `None` when no clip is playing, its texture is unknown, or the sheet
    /// is narrower than one frame.
    #[must_use]
    pub fn current_source_rect(&self, textures: &TextureTable) -> Option<Rect> {
        let clip = self.active_clip()?;
        let sheet = textures.get(clip.texture)?;
        if clip.frame_width == 0 {
            return None;
        }

        let columns = sheet.width / clip.frame_width;
        if columns == 0 {
            return None;
        }

        let column = self.frame % columns;
        let row = self.frame / columns;
        Some(Rect::new(
            (column * clip.frame_width) as i32,
            (row * clip.frame_height) as i32,
            clip.frame_width as i32,
            clip.frame_height as i32,
        ))
    }

    /// Draws the current frame at `position`.
    pub fn draw<B: SpriteBatch + ?Sized>(
        &self,
        batch: &mut B,
        textures: &TextureTable,
        position: Vec2,
    ) {
        let (Some(clip), Some(source)) = (self.active_clip(), self.current_source_rect(textures))
        else {
            return;
        };

        batch.draw(SpriteDraw::new(clip.texture, position, Some(source)).with_flip(self.flip));
    }
}
