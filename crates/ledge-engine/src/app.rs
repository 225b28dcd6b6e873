//! Application lifecycle management.
//!
//! Headless main loop: loads content, feeds scripted input through the
//! game one frame at a time, and renders every frame into a recording
//! sprite batch.

use anyhow::{Context, Result};
use ledge_common::{ResourceLoadError, Vec2};
use ledge_gameplay::InputManager;
use ledge_render::{RecordingBatch, TextureTable};
use ledge_world::TileMap;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::game::{Game, TILESET_TEXTURE};
use crate::replay::Replay;
use crate::timing::FrameTiming;

/// What a run did, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u64,
    /// Simulated seconds
    pub elapsed: f64,
    /// Sprites submitted across all frames
    pub draws: usize,
    /// Player position after the last frame
    pub final_position: Vec2,
    /// Whether the player ended on the ground
    pub on_ground: bool,
}

/// Loads every texture the config names that exists on disk.
///
/// Missing files are skipped; the game registers them with fallback sizes.
pub fn load_textures(config: &EngineConfig) -> TextureTable {
    let mut textures = TextureTable::new();

    let sources = std::iter::once((TILESET_TEXTURE, config.tileset_path.as_path())).chain(
        config
            .animations
            .iter()
            .map(|clip| (clip.name.as_str(), clip.texture.as_path())),
    );

    for (name, path) in sources {
        match textures.load(name, path) {
            Ok(_) => {},
            Err(ResourceLoadError::NotFound(missing)) => {
                debug!("Texture '{}' not found at {}, using fallback size", name, missing);
            },
            Err(e) => warn!("Texture '{}' unusable: {}", name, e),
        }
    }

    textures
}

/// Builds the game from config and plays `replay` through it.
pub fn run_replay(config: &EngineConfig, replay: &Replay) -> Result<RunSummary> {
    let map = TileMap::load(&config.map_path)
        .with_context(|| format!("loading map {}", config.map_path.display()))?;
    let mut game = Game::new(map, load_textures(config), config);

    let mut input = InputManager::new();
    let mut timing = FrameTiming::new(config.max_frame_delta);
    let mut batch = RecordingBatch::new();
    let mut draws = 0;

    for (raw_dt, keys) in replay.ticks() {
        let dt = timing.delta_time(raw_dt);

        input.poll(keys);
        game.tick(&input.process(), dt);
        input.end_frame();

        game.render(&mut batch);
        draws += batch.draw_count();
        batch.clear();
    }

    let summary = RunSummary {
        frames: timing.frame_count(),
        elapsed: timing.elapsed(),
        draws,
        final_position: game.player().position(),
        on_ground: game.player().is_on_ground(),
    };

    info!(
        "Ran {} frames ({:.2}s simulated, {:.1} fps average), {} sprites drawn",
        summary.frames,
        summary.elapsed,
        timing.current_fps(),
        summary.draws
    );
    info!(
        "Player finished at ({}, {}), on ground: {}",
        summary.final_position.x, summary.final_position.y, summary.on_ground
    );

    Ok(summary)
}

/// Run the application with the given config.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let replay = match &config.replay_path {
        Some(path) => Replay::load(path)
            .with_context(|| format!("loading replay {}", path.display()))?,
        None => {
            info!("No replay given, simulating {} idle frames", config.idle_frames);
            Replay::idle(config.idle_frames, config.idle_delta())
        },
    };

    run_replay(config, &replay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const MAP: &str = r#"{
        "height": 2, "width": 2, "tileheight": 32, "tilewidth": 32, "infinite": false,
        "layers": [
            { "id": 1, "name": "ground", "type": "tilelayer", "data": [0, 0, 6, 7] },
            { "id": 2, "name": "collision", "type": "objectgroup", "objects": [
                { "id": 1, "x": 0, "y": 140, "width": 400, "height": 32 }
            ]}
        ]
    }"#;

    fn config_in(dir: &Path) -> EngineConfig {
        let map_path = dir.join("map.tmj");
        fs::write(&map_path, MAP).expect("write map");
        EngineConfig {
            map_path,
            tileset_path: dir.join("missing.png"),
            spawn: Some((100.0, 60.0)),
            idle_frames: 60,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_idle_run_lands_player() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(dir.path());

        let summary = run(&config).expect("run succeeds");
        assert_eq!(summary.frames, 60);
        assert!((summary.elapsed - 1.0).abs() < 1e-3);
        assert_eq!(summary.final_position, Vec2::new(100.0, 100.0));
        assert!(summary.on_ground);
        // Two tiles and the player each frame.
        assert_eq!(summary.draws, 60 * 3);
    }

    #[test]
    fn test_replay_moves_player() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = dir.path().join("script.json");
        fs::write(
            &script,
            r#"[{ "dt": 0.016, "repeat": 30 }, { "dt": 0.016, "keys": ["Right"], "repeat": 20 }]"#,
        )
        .expect("write script");

        let config = EngineConfig {
            replay_path: Some(script),
            ..config_in(dir.path())
        };

        let summary = run(&config).expect("run succeeds");
        assert_eq!(summary.frames, 50);
        assert!(summary.final_position.x > 100.0);
        assert_eq!(summary.final_position.y, 100.0);
    }

    #[test]
    fn test_missing_map_is_error() {
        let config = EngineConfig {
            map_path: "/nonexistent/map.tmj".into(),
            ..EngineConfig::default()
        };
        let err = run(&config).expect_err("missing map");
        assert!(err.to_string().contains("loading map"));
    }

    #[test]
    fn test_load_textures_skips_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(dir.path());
        let textures = load_textures(&config);
        assert!(textures.is_empty());
    }

    #[test]
    fn test_load_textures_reads_existing_sheet() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sheet = dir.path().join("tiles.png");
        image::RgbaImage::new(65, 32).save(&sheet).expect("write png");

        let config = EngineConfig {
            tileset_path: sheet,
            ..config_in(dir.path())
        };
        let textures = load_textures(&config);
        let handle = textures.handle(TILESET_TEXTURE).expect("tileset loaded");
        assert_eq!(textures.get(handle).map(|t| t.width), Some(65));
    }
}
