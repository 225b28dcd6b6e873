//! Error types for Ledge.
//!
//! Loading is the only fallible phase: the simulation step itself is total.

use thiserror::Error;

/// Top-level error type for Ledge operations.
#[derive(Debug, Error)]
pub enum LedgeError {
    /// Map document errors
    #[error("Map format error: {0}")]
    MapFormat(#[from] MapFormatError),

    /// Texture and animation asset errors
    #[error("Resource load error: {0}")]
    Resource(#[from] ResourceLoadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed or unrecognized map documents.
///
/// Always fatal: a map is either accepted whole or not at all.
#[derive(Debug, Error)]
pub enum MapFormatError {
    /// The payload is not valid JSON or misses a required field
    #[error("Invalid map document: {0}")]
    Json(#[from] serde_json::Error),

    /// Layer type other than `tilelayer` or `objectgroup`
    #[error("Unknown layer type `{kind}` in layer `{layer}`")]
    UnknownLayerType {
        /// Layer name
        layer: String,
        /// Offending `type` value
        kind: String,
    },

    /// Tile layer data does not cover the map exactly
    #[error("Tile layer `{layer}` has {actual} tiles, expected {expected}")]
    TileDataLength {
        /// Layer name
        layer: String,
        /// width * height of the map
        expected: usize,
        /// Length of the `data` array
        actual: usize,
    },

    /// Zero or negative map or tile dimensions
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Chunked infinite maps are not a recognized layout
    #[error("Infinite maps are not supported")]
    InfiniteUnsupported,
}

/// Missing or unreadable texture/animation assets.
#[derive(Debug, Error)]
pub enum ResourceLoadError {
    /// File not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// File exists but could not be decoded
    #[error("Failed to decode `{name}`: {reason}")]
    Decode {
        /// Resource name
        name: String,
        /// Decoder message
        reason: String,
    },

    /// Lookup of a name that was never registered
    #[error("Unknown resource: {0}")]
    Unknown(String),
}

/// Result type alias for Ledge operations.
pub type LedgeResult<T> = Result<T, LedgeError>;
