//! Tile grid and static collision shapes loaded from a map document.

use std::fs;
use std::path::Path;

use ledge_common::{Aabb, IVec2, LedgeResult, MapFormatError, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::tiled::{TiledLayer, TiledMap, OBJECT_LAYER, TILE_LAYER};

/// Global id of the first tile in the tileset when the map names none.
pub const DEFAULT_FIRST_GID: i32 = 6;

/// Immutable 2D grid of tile ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_width: i32,
    tile_height: i32,
    first_gid: i32,
    /// Row-major tile ids; empty until a tile layer is stored
    tiles: Vec<i32>,
}

impl TileGrid {
    /// Creates an empty grid (every id is 0).
    #[must_use]
    pub fn new(width: usize, height: usize, tile_width: i32, tile_height: i32) -> Self {
        Self {
            tiles: vec![0; width * height],
            ..Self::unfilled(width, height, tile_width, tile_height)
        }
    }

    /// Grid with no tile storage yet. Reads as all zeros.
    fn unfilled(width: usize, height: usize, tile_width: i32, tile_height: i32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            first_gid: DEFAULT_FIRST_GID,
            tiles: Vec::new(),
        }
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Tile width in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Tile height in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Global id of tileset index 0.
    #[must_use]
    pub const fn first_gid(&self) -> i32 {
        self.first_gid
    }

    /// Raw tile id at a cell, `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles.get(y * self.width + x).copied().unwrap_or(0))
    }

    /// Index into the tileset image for a cell.
    ///
    /// Ids below the tileset's first id are empty cells.
    #[must_use]
    pub fn tileset_index(&self, x: usize, y: usize) -> Option<u32> {
        let index = self.get(x, y)? - self.first_gid;
        u32::try_from(index).ok()
    }

    /// World-space top-left corner of a cell.
    #[must_use]
    pub fn cell_origin(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            x as f32 * self.tile_width as f32,
            y as f32 * self.tile_height as f32,
        )
    }

    /// Iterates non-empty cells as `(x, y, tileset_index)`.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.tileset_index(x, y).map(|i| (x, y, i)))
        })
    }

    fn fill_from(&mut self, data: &[i32]) {
        self.tiles = data.to_vec();
    }
}

/// Static collision shape from an object layer.
///
/// Only `bounds` takes part in collision; the polygon is for debug drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionShape {
    /// Rectangle bounds in world pixels
    pub bounds: Rect,
    /// Polygon vertices relative to the bounds origin
    pub polygon: Option<Vec<IVec2>>,
}

impl CollisionShape {
    /// Creates a plain rectangle shape.
    #[must_use]
    pub const fn rect(bounds: Rect) -> Self {
        Self {
            bounds,
            polygon: None,
        }
    }

    /// Bounding box used by collision resolution.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from(self.bounds)
    }

    /// Closed outline in world coordinates for debug drawing.
    ///
    /// Polygon offsets are made absolute here; shapes without a polygon
    /// use the rectangle corners.
    #[must_use]
    pub fn outline(&self) -> Vec<Vec2> {
        match &self.polygon {
            Some(points) if !points.is_empty() => {
                let origin = self.bounds.origin();
                points.iter().map(|p| (origin + *p).as_vec2()).collect()
            },
            _ => self.bounds.corners().to_vec(),
        }
    }
}

/// Summary of a layer, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    /// Layer id
    pub id: i32,
    /// Layer name
    pub name: String,
    /// Layer type string
    pub kind: String,
    /// Editor visibility flag
    pub visible: bool,
}

/// A loaded map: tile grid plus static collision shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    grid: TileGrid,
    shapes: Vec<CollisionShape>,
    layers: Vec<LayerInfo>,
}

impl TileMap {
    /// Builds a map from parts.
    #[must_use]
    pub fn new(grid: TileGrid, shapes: Vec<CollisionShape>) -> Self {
        Self {
            grid,
            shapes,
            layers: Vec::new(),
        }
    }

    /// Loads a map from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgeResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let map = Self::parse(&json)?;

        info!(
            "Loaded map {} ({}x{} tiles, {} collision shapes)",
            path.display(),
            map.grid.width(),
            map.grid.height(),
            map.shapes.len()
        );
        Ok(map)
    }

    /// Parses a map from a JSON document.
    ///
    /// Either the whole document is accepted or an error is returned.
    pub fn parse(json: &str) -> Result<Self, MapFormatError> {
        let doc: TiledMap = serde_json::from_str(json)?;
        Self::from_document(&doc)
    }

    /// Converts a deserialized document into a map.
    pub fn from_document(doc: &TiledMap) -> Result<Self, MapFormatError> {
        if doc.infinite {
            return Err(MapFormatError::InfiniteUnsupported);
        }
        if doc.width <= 0 || doc.height <= 0 {
            return Err(MapFormatError::InvalidDimensions(format!(
                "map is {}x{} tiles",
                doc.width, doc.height
            )));
        }
        if doc.tile_width <= 0 || doc.tile_height <= 0 {
            return Err(MapFormatError::InvalidDimensions(format!(
                "tiles are {}x{} pixels",
                doc.tile_width, doc.tile_height
            )));
        }

        let too_large = || {
            MapFormatError::InvalidDimensions(format!(
                "{}x{} tiles of {}x{} pixels is too large",
                doc.width, doc.height, doc.tile_width, doc.tile_height
            ))
        };
        // Pixel extents must fit in i32 for `pixel_size`.
        doc.width.checked_mul(doc.tile_width).ok_or_else(too_large)?;
        doc.height.checked_mul(doc.tile_height).ok_or_else(too_large)?;

        let width = doc.width as usize;
        let height = doc.height as usize;
        let cells = width.checked_mul(height).ok_or_else(too_large)?;

        // Storage is only allocated from a tile layer whose length matched.
        let mut grid = TileGrid::unfilled(width, height, doc.tile_width, doc.tile_height);
        if let Some(tileset) = doc.tilesets.first() {
            grid.first_gid = tileset.first_gid;
        }

        let mut shapes = Vec::new();
        let mut layers = Vec::with_capacity(doc.layers.len());

        for layer in &doc.layers {
            match layer.kind.as_str() {
                TILE_LAYER => {
                    if layer.data.len() != cells {
                        return Err(MapFormatError::TileDataLength {
                            layer: layer.name.clone(),
                            expected: cells,
                            actual: layer.data.len(),
                        });
                    }
                    // Later tile layers replace earlier ones.
                    grid.fill_from(&layer.data);
                },
                OBJECT_LAYER => {
                    shapes.extend(layer.objects.iter().map(|obj| CollisionShape {
                        bounds: Rect::new(obj.x, obj.y, obj.width, obj.height),
                        polygon: obj
                            .polygon
                            .as_ref()
                            .map(|points| points.iter().map(|p| IVec2::new(p.x, p.y)).collect()),
                    }));
                },
                other => {
                    return Err(MapFormatError::UnknownLayerType {
                        layer: layer.name.clone(),
                        kind: other.to_string(),
                    });
                },
            }
            debug!("Parsed layer `{}` ({})", layer.name, layer.kind);
            layers.push(layer_info(layer));
        }

        Ok(Self {
            grid,
            shapes,
            layers,
        })
    }

    /// The tile grid.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Collision shapes in document order.
    #[must_use]
    pub fn shapes(&self) -> &[CollisionShape] {
        &self.shapes
    }

    /// Collision boxes in document order.
    pub fn obstacles(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.shapes.iter().map(CollisionShape::aabb)
    }

    /// Layer summaries in document order.
    #[must_use]
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// Map size in pixels.
    ///
    /// Saturates for grids built by hand with out-of-range extents.
    #[must_use]
    pub fn pixel_size(&self) -> (i32, i32) {
        let extent = |cells: usize, tile: i32| {
            i32::try_from(cells).map_or(i32::MAX, |cells| cells.saturating_mul(tile))
        };
        (
            extent(self.grid.width(), self.grid.tile_width()),
            extent(self.grid.height(), self.grid.tile_height()),
        )
    }
}

fn layer_info(layer: &TiledLayer) -> LayerInfo {
    LayerInfo {
        id: layer.id,
        name: layer.name.clone(),
        kind: layer.kind.clone(),
        visible: layer.visible,
    }
}
