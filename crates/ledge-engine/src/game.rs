//! Game state: one map, one player, and everything needed to draw them.
//!
//! A frame is [`Game::tick`] followed by [`Game::render`]. The tick reads
//! input, moves the player against the map, picks the animation clip and
//! recentres the camera. The render step only reads state.

use ledge_common::Vec2;
use ledge_gameplay::{Facing, Input, Player, Resolution};
use ledge_render::{
    draw_collision_outlines, draw_tiles, Animator, Camera, Flip, RenderContext, SpriteBatch,
    TextureHandle, TextureTable,
};
use ledge_world::TileMap;
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Texture name of the tileset.
pub const TILESET_TEXTURE: &str = "tileset";

/// Texture name of the 1x1 white pixel used for outlines.
pub const PIXEL_TEXTURE: &str = "pixel";

/// Running game.
#[derive(Debug)]
pub struct Game {
    map: TileMap,
    player: Player,
    animator: Animator,
    textures: TextureTable,
    camera: Camera,
    context: RenderContext,
    tileset: TextureHandle,
    pixel: TextureHandle,
}

impl Game {
    /// Builds the game from a loaded map and texture table.
    ///
    /// Textures the config names but the table lacks are registered with
    /// their fallback sizes.
    #[must_use]
    pub fn new(map: TileMap, mut textures: TextureTable, config: &EngineConfig) -> Self {
        let (tileset_width, tileset_height) = config.tileset_size;
        let tileset = textures.insert(TILESET_TEXTURE, tileset_width, tileset_height);
        let pixel = textures.insert(PIXEL_TEXTURE, 1, 1);

        let mut animator = Animator::new(config.animation_frame_time);
        for clip in &config.animations {
            let (width, height) = clip.fallback_size();
            let sheet = textures.insert(&clip.name, width, height);
            animator.register(
                &clip.name,
                clip.frame_width,
                clip.frame_height,
                clip.frame_count,
                sheet,
            );
        }

        let tileset_size = textures
            .get(tileset)
            .map_or(config.tileset_size, |t| (t.width, t.height));
        let spawn = config
            .spawn
            .map_or_else(|| spawn_point(tileset_size), |(x, y)| Vec2::new(x, y));
        let player = Player::new(spawn, config.player.clone());
        animator.set_active(player.motion_state().clip_name());

        let mut camera = Camera::new(config.window_width, config.window_height);
        camera.update(spawn, config.window_width, config.window_height);

        info!(
            "Game ready: {} collision shapes, spawn at ({}, {})",
            map.shapes().len(),
            spawn.x,
            spawn.y
        );

        Self {
            map,
            player,
            animator,
            textures,
            camera,
            context: RenderContext::new(config.debug_collisions),
            tileset,
            pixel,
        }
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, input: &Input, dt: f32) -> Resolution {
        if input.toggle_debug_pressed {
            self.context.toggle_debug_collisions();
        }

        let resolution = self.player.update(input, self.map.obstacles(), dt);

        let clip = self.player.motion_state().clip_name();
        if self.animator.active() != Some(clip) {
            debug!("Player state {:?}", self.player.motion_state());
        }
        self.animator.set_active(clip);
        self.animator.set_flip(match self.player.facing() {
            Facing::Left => Flip::Horizontal,
            Facing::Right => Flip::None,
        });
        self.animator.advance(dt);

        let (width, height) = self.camera.viewport();
        self.camera.update(self.player.position(), width, height);

        resolution
    }

    /// Draws the map, debug outlines and player into one batch.
    pub fn render<B: SpriteBatch + ?Sized>(&self, batch: &mut B) {
        batch.begin(self.camera.transform());
        draw_tiles(batch, self.map.grid(), &self.textures, self.tileset);
        draw_collision_outlines(batch, self.map.shapes(), self.pixel, &self.context);
        self.animator
            .draw(batch, &self.textures, self.player.position());
        batch.end();
    }

    /// Applies a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The loaded map.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The animator.
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Current render switches.
    #[must_use]
    pub fn render_context(&self) -> &RenderContext {
        &self.context
    }
}

/// Default spawn: horizontally centred on the tileset width, at the
/// tileset height.
#[must_use]
pub fn spawn_point((tileset_width, tileset_height): (u32, u32)) -> Vec2 {
    Vec2::new((tileset_width / 2) as f32, tileset_height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_gameplay::{InputManager, KeyCode, MotionState};
    use ledge_render::RecordingBatch;

    const MAP: &str = r#"{
        "height": 4, "width": 4, "tileheight": 32, "tilewidth": 32, "infinite": false,
        "layers": [
            { "id": 1, "name": "ground", "type": "tilelayer",
              "data": [0,0,0,0, 0,0,0,0, 0,0,0,0, 6,6,6,6] },
            { "id": 2, "name": "collision", "type": "objectgroup", "objects": [
                { "id": 1, "x": 0, "y": 140, "width": 400, "height": 32 },
                { "id": 2, "x": 300, "y": 60, "width": 20, "height": 20,
                  "polygon": [{ "x": 0, "y": 0 }, { "x": 20, "y": 0 }, { "x": 0, "y": 20 }] }
            ]}
        ]
    }"#;

    fn game() -> Game {
        let config = EngineConfig {
            spawn: Some((100.0, 100.0)),
            ..EngineConfig::default()
        };
        let map = TileMap::parse(MAP).expect("valid map");
        Game::new(map, TextureTable::new(), &config)
    }

    fn run(game: &mut Game, manager: &mut InputManager, keys: &[KeyCode], frames: usize) {
        for _ in 0..frames {
            manager.poll(keys);
            game.tick(&manager.process(), 1.0 / 60.0);
            manager.end_frame();
        }
    }

    #[test]
    fn test_spawn_point_from_tileset() {
        assert_eq!(spawn_point((203, 101)), Vec2::new(101.0, 101.0));

        let map = TileMap::parse(MAP).expect("valid map");
        let game = Game::new(map, TextureTable::new(), &EngineConfig::default());
        assert_eq!(game.player().position(), Vec2::new(101.0, 203.0));
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut game = game();
        let mut manager = InputManager::new();
        run(&mut game, &mut manager, &[], 5);

        assert_eq!(game.player().position(), Vec2::new(100.0, 100.0));
        assert!(game.player().is_on_ground());
        assert_eq!(game.animator().active(), Some("idle"));
    }

    #[test]
    fn test_running_left_flips_sprite() {
        let mut game = game();
        let mut manager = InputManager::new();
        run(&mut game, &mut manager, &[KeyCode::A], 5);

        assert_eq!(game.player().motion_state(), MotionState::Running);
        assert_eq!(game.animator().active(), Some("run"));
        assert_eq!(game.animator().flip(), Flip::Horizontal);

        run(&mut game, &mut manager, &[KeyCode::Right], 1);
        assert_eq!(game.animator().flip(), Flip::None);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut game = game();
        let mut manager = InputManager::new();
        run(&mut game, &mut manager, &[KeyCode::Right], 10);

        let position = game.player().position();
        assert_eq!(game.camera().target(), position);
        assert_eq!(
            game.camera().position(),
            position - Vec2::new(512.0, 384.0)
        );
    }

    #[test]
    fn test_resize_keeps_player_centred() {
        let mut game = game();
        game.resize(800, 600);

        assert_eq!(game.camera().viewport(), (800, 600));
        assert_eq!(game.camera().position(), Vec2::new(-300.0, -200.0));
    }

    #[test]
    fn test_debug_toggle_on_key_press() {
        let mut game = game();
        let mut manager = InputManager::new();

        run(&mut game, &mut manager, &[KeyCode::F1], 3);
        assert!(game.render_context().debug_collisions);

        run(&mut game, &mut manager, &[], 1);
        run(&mut game, &mut manager, &[KeyCode::F1], 1);
        assert!(!game.render_context().debug_collisions);
    }

    #[test]
    fn test_render_draw_order() {
        let mut game = game();
        let mut manager = InputManager::new();

        let mut batch = RecordingBatch::new();
        game.render(&mut batch);
        let frame = batch.last_frame().expect("frame recorded");
        // Four tiles then the player.
        assert_eq!(frame.draws.len(), 5);
        assert_eq!(frame.transform, game.camera().transform());

        run(&mut game, &mut manager, &[KeyCode::F1], 1);
        batch.clear();
        game.render(&mut batch);
        let frame = batch.last_frame().expect("frame recorded");
        // Four tiles, four rect edges, three polygon edges, the player.
        assert_eq!(frame.draws.len(), 12);
        assert_eq!(frame.draws[11].position, game.player().position());
    }
}
