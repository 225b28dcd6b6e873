//! # Ledge Common
//!
//! Common types shared by every Ledge crate:
//! - Vector and rectangle types
//! - Pixel snapping
//! - The load-time error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
