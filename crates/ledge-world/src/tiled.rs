//! Serde model of the Tiled JSON map format (the subset the game reads).
//!
//! Field names follow the Tiled documents on disk. Required fields have no
//! serde default so a missing one fails the whole load.

use serde::{Deserialize, Serialize};

/// Layer `type` value for tile layers.
pub const TILE_LAYER: &str = "tilelayer";

/// Layer `type` value for object layers.
pub const OBJECT_LAYER: &str = "objectgroup";

/// Top-level map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledMap {
    /// Map height in tiles
    pub height: i32,
    /// Map width in tiles
    pub width: i32,
    /// Tile height in pixels
    #[serde(rename = "tileheight")]
    pub tile_height: i32,
    /// Tile width in pixels
    #[serde(rename = "tilewidth")]
    pub tile_width: i32,
    /// Whether the map uses chunked infinite layers
    pub infinite: bool,
    /// Layers in draw order
    pub layers: Vec<TiledLayer>,
    /// Tileset references (only `firstgid` is used)
    #[serde(default)]
    pub tilesets: Vec<TiledTilesetRef>,
}

/// One layer of either kind.
///
/// The kind is kept as a string so unknown kinds can be reported by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledLayer {
    /// Layer id
    #[serde(default)]
    pub id: i32,
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// `tilelayer` or `objectgroup`
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the layer is shown in the editor
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Tile ids, row-major (tile layers only)
    #[serde(default)]
    pub data: Vec<i32>,
    /// Objects (object layers only)
    #[serde(default)]
    pub objects: Vec<TiledObject>,
}

fn default_visible() -> bool {
    true
}

/// A map object: a rectangle with an optional polygon outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledObject {
    /// Object id
    #[serde(default)]
    pub id: i32,
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Polygon vertices relative to (`x`, `y`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<TiledPoint>>,
}

/// Polygon vertex offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiledPoint {
    /// X offset in pixels
    pub x: i32,
    /// Y offset in pixels
    pub y: i32,
}

/// Reference to a tileset used by the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiledTilesetRef {
    /// First global tile id owned by the tileset
    #[serde(rename = "firstgid")]
    pub first_gid: i32,
    /// External tileset file, if any
    #[serde(default)]
    pub source: Option<String>,
}
