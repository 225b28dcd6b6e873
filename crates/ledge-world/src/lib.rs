//! # Ledge World
//!
//! Map data for Ledge.
//!
//! This crate handles:
//! - The Tiled JSON document model
//! - Tile grid construction from tile layers
//! - Static collision shapes from object layers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod tiled;
pub mod tilemap;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::tiled::*;
    pub use crate::tilemap::*;
}

pub use prelude::*;
