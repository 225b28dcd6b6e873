//! Tile layer drawing and debug collision outlines.

use glam::Vec2;
use ledge_common::Rect;
use ledge_world::{CollisionShape, TileGrid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sprite::{Color, SpriteBatch, SpriteDraw};
use crate::texture::{TextureHandle, TextureTable};

/// Per-frame render switches owned by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderContext {
    /// Draw collision shape outlines over the map
    pub debug_collisions: bool,
}

impl RenderContext {
    /// Creates a context with the given debug state.
    #[must_use]
    pub const fn new(debug_collisions: bool) -> Self {
        Self { debug_collisions }
    }

    /// Flips the collision outline switch.
    pub fn toggle_debug_collisions(&mut self) {
        self.debug_collisions = !self.debug_collisions;
        debug!("Collision outlines {}", if self.debug_collisions { "on" } else { "off" });
    }
}

/// Source rectangle of a tileset index in a sheet with a 1 px gutter
/// between tiles.
///
/// Returns `None` when the sheet is narrower than one tile.
#[must_use]
pub fn tileset_source_rect(
    index: u32,
    tile_width: i32,
    tile_height: i32,
    texture_width: u32,
) -> Option<Rect> {
    if tile_width <= 0 {
        return None;
    }
    let columns = (texture_width as i32 + 1) / tile_width;
    if columns <= 0 {
        return None;
    }

    let index = index as i32;
    let column = index % columns;
    let row = index / columns;
    Some(Rect::new(
        column * (tile_width + 1),
        row * (tile_height + 1),
        tile_width,
        tile_height,
    ))
}

/// Draws every non-empty cell of the grid. Returns the number of tiles drawn.
pub fn draw_tiles<B: SpriteBatch + ?Sized>(
    batch: &mut B,
    grid: &TileGrid,
    textures: &TextureTable,
    tileset: TextureHandle,
) -> usize {
    let Some(sheet) = textures.get(tileset) else {
        return 0;
    };

    let mut drawn = 0;
    for (x, y, index) in grid.iter_tiles() {
        let Some(source) =
            tileset_source_rect(index, grid.tile_width(), grid.tile_height(), sheet.width)
        else {
            continue;
        };
        batch.draw(SpriteDraw::new(tileset, grid.cell_origin(x, y), Some(source)));
        drawn += 1;
    }
    drawn
}

/// Draws a 1 px line from `from` to `to` by rotating and stretching a
/// single-pixel texture.
pub fn draw_line<B: SpriteBatch + ?Sized>(
    batch: &mut B,
    pixel: TextureHandle,
    from: Vec2,
    to: Vec2,
    color: Color,
) {
    let edge = to - from;
    let angle = edge.y.atan2(edge.x);
    batch.draw(
        SpriteDraw::new(pixel, from, None)
            .with_tint(color)
            .with_rotation(angle)
            .with_scale(Vec2::new(edge.length(), 1.0)),
    );
}

/// Draws the outline of every collision shape when the debug switch is on.
///
/// Polygons are drawn edge by edge, closing back to the first vertex.
/// Plain rectangles get four 1 px edges. Returns the number of draws.
pub fn draw_collision_outlines<B: SpriteBatch + ?Sized>(
    batch: &mut B,
    shapes: &[CollisionShape],
    pixel: TextureHandle,
    context: &RenderContext,
) -> usize {
    if !context.debug_collisions {
        return 0;
    }

    let mut drawn = 0;
    for shape in shapes {
        match &shape.polygon {
            Some(points) if !points.is_empty() => {
                let outline = shape.outline();
                for (i, from) in outline.iter().enumerate() {
                    let to = outline[(i + 1) % outline.len()];
                    draw_line(batch, pixel, *from, to, Color::RED);
                    drawn += 1;
                }
            },
            _ => {
                drawn += draw_rect_edges(batch, pixel, shape.bounds, Color::RED);
            },
        }
    }
    drawn
}

fn draw_rect_edges<B: SpriteBatch + ?Sized>(
    batch: &mut B,
    pixel: TextureHandle,
    rect: Rect,
    color: Color,
) -> usize {
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h) = (rect.width as f32, rect.height as f32);
    // Right and bottom edges sit on the last pixel inside the rect.
    let edges = [
        (Vec2::new(x, y), Vec2::new(w, 1.0)),
        (Vec2::new(x, y), Vec2::new(1.0, h)),
        (Vec2::new(x + w - 1.0, y), Vec2::new(1.0, h)),
        (Vec2::new(x, y + h - 1.0), Vec2::new(w, 1.0)),
    ];

    for (position, scale) in edges {
        batch.draw(
            SpriteDraw::new(pixel, position, None)
                .with_tint(color)
                .with_scale(scale),
        );
    }
    edges.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::RecordingBatch;
    use glam::Mat4;
    use ledge_common::IVec2;
    use ledge_world::TileMap;

    const MAP: &str = r#"{
        "height": 2, "width": 3, "tileheight": 32, "tilewidth": 32, "infinite": false,
        "layers": [
            { "id": 1, "name": "ground", "type": "tilelayer", "data": [0, 6, 7, 0, 0, 14] }
        ]
    }"#;

    fn record<F: FnOnce(&mut RecordingBatch)>(f: F) -> RecordingBatch {
        let mut batch = RecordingBatch::new();
        batch.begin(Mat4::IDENTITY);
        f(&mut batch);
        batch.end();
        batch
    }

    #[test]
    fn test_tileset_source_rect_with_gutter() {
        // 101 px wide sheet of 32 px tiles: (101 + 1) / 32 = 3 columns.
        assert_eq!(tileset_source_rect(0, 32, 32, 101), Some(Rect::new(0, 0, 32, 32)));
        assert_eq!(tileset_source_rect(2, 32, 32, 101), Some(Rect::new(66, 0, 32, 32)));
        assert_eq!(tileset_source_rect(4, 32, 32, 101), Some(Rect::new(33, 33, 32, 32)));
    }

    #[test]
    fn test_tileset_source_rect_narrow_sheet() {
        assert_eq!(tileset_source_rect(0, 32, 32, 10), None);
        assert_eq!(tileset_source_rect(0, 0, 32, 100), None);
    }

    #[test]
    fn test_draw_tiles_skips_empty_cells() {
        let map = TileMap::parse(MAP).expect("valid map");
        let mut textures = TextureTable::new();
        let tileset = textures.insert("tiles", 101, 101);

        let mut drawn = 0;
        let batch = record(|b| drawn = draw_tiles(b, map.grid(), &textures, tileset));
        assert_eq!(drawn, 3);

        let draws = &batch.frames()[0].draws;
        assert_eq!(draws[0].position, Vec2::new(32.0, 0.0));
        assert_eq!(draws[0].source, Some(Rect::new(0, 0, 32, 32)));
        assert_eq!(draws[1].position, Vec2::new(64.0, 0.0));
        assert_eq!(draws[1].source, Some(Rect::new(33, 0, 32, 32)));
        // id 14 -> index 8 -> column 2, row 2
        assert_eq!(draws[2].position, Vec2::new(64.0, 32.0));
        assert_eq!(draws[2].source, Some(Rect::new(66, 66, 32, 32)));
    }

    #[test]
    fn test_draw_tiles_unknown_texture() {
        let map = TileMap::parse(MAP).expect("valid map");
        let textures = TextureTable::new();
        let batch = record(|b| {
            draw_tiles(b, map.grid(), &textures, TextureHandle::new(3));
        });
        assert_eq!(batch.draw_count(), 0);
    }

    #[test]
    fn test_outlines_hidden_without_debug() {
        let shapes = vec![CollisionShape::rect(Rect::new(0, 140, 400, 32))];
        let batch = record(|b| {
            draw_collision_outlines(b, &shapes, TextureHandle::new(0), &RenderContext::default());
        });
        assert_eq!(batch.draw_count(), 0);
    }

    #[test]
    fn test_rect_outline_has_four_edges() {
        let shapes = vec![CollisionShape::rect(Rect::new(10, 20, 30, 40))];
        let context = RenderContext::new(true);
        let batch = record(|b| {
            draw_collision_outlines(b, &shapes, TextureHandle::new(0), &context);
        });

        let draws = &batch.frames()[0].draws;
        assert_eq!(draws.len(), 4);
        assert!(draws.iter().all(|d| d.tint == Color::RED));
        assert_eq!(draws[0].scale, Vec2::new(30.0, 1.0));
        assert_eq!(draws[2].position, Vec2::new(39.0, 20.0));
        assert_eq!(draws[3].position, Vec2::new(10.0, 59.0));
        // Every edge stays inside the rectangle.
        assert!(draws
            .iter()
            .all(|d| d.position.x + d.scale.x <= 40.0 && d.position.y + d.scale.y <= 60.0));
    }

    #[test]
    fn test_polygon_outline_closes_loop() {
        let shape = CollisionShape {
            bounds: Rect::new(100, 100, 0, 0),
            polygon: Some(vec![IVec2::new(0, 0), IVec2::new(30, 0), IVec2::new(0, 40)]),
        };
        let context = RenderContext::new(true);
        let batch = record(|b| {
            draw_collision_outlines(b, &[shape], TextureHandle::new(0), &context);
        });

        let draws = &batch.frames()[0].draws;
        assert_eq!(draws.len(), 3);

        assert_eq!(draws[0].position, Vec2::new(100.0, 100.0));
        assert!((draws[0].scale.x - 30.0).abs() < 1e-4);
        assert!(draws[0].rotation.abs() < 1e-6);

        // Hypotenuse back from (130, 100) to (100, 140): length 50.
        assert_eq!(draws[1].position, Vec2::new(130.0, 100.0));
        assert!((draws[1].scale.x - 50.0).abs() < 1e-4);

        // Closing edge goes straight up.
        assert_eq!(draws[2].position, Vec2::new(100.0, 140.0));
        assert!((draws[2].rotation + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_debug() {
        let mut context = RenderContext::default();
        context.toggle_debug_collisions();
        assert!(context.debug_collisions);
        context.toggle_debug_collisions();
        assert!(!context.debug_collisions);
    }
}
