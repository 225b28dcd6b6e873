//! # Ledge Engine
//!
//! Game loop and runtime plumbing for the Ledge platformer.
//!
//! This crate ties together all subsystems:
//! - World: map loading and collision shapes
//! - Gameplay: input, player controller, collision resolution
//! - Render: camera, animation, sprite batch
//!
//! The binary runs headless: input comes from a replay script and every
//! frame is rendered into a recording sprite batch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod game;
pub mod replay;
pub mod timing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::app::*;
    pub use crate::config::*;
    pub use crate::game::*;
    pub use crate::replay::*;
    pub use crate::timing::*;
}

pub use prelude::*;
