//! # Ledge Render
//!
//! Backend-agnostic 2D rendering for the Ledge platformer.
//!
//! This crate turns game state into sprite draws:
//! - Texture table mapping names to handles and sizes
//! - Camera that keeps the player centred
//! - Sprite batch trait plus an in-memory recorder
//! - Sprite-sheet animation playback
//! - Tile layer drawing and debug collision outlines
//!
//! ## Architecture
//!
//! Nothing here talks to a GPU. A frame is a `begin` call with the camera
//! transform, a list of [`SpriteDraw`]s, and an `end` call. Whatever
//! implements [`SpriteBatch`] decides how those become pixels.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod animation;
pub mod camera;
pub mod map_render;
pub mod sprite;
pub mod texture;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animation::*;
    pub use crate::camera::*;
    pub use crate::map_render::*;
    pub use crate::sprite::*;
    pub use crate::texture::*;
}

pub use prelude::*;
