//! Engine configuration.
//!
//! Window size, content paths, sprite sheet geometry and player tuning.
//! Configuration can be loaded from and saved to a TOML file.

use ledge_gameplay::PlayerPhysics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "ledge.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "LEDGE_CONFIG";

/// Errors from reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML for this config
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written as TOML
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// One animation clip cut from a sprite sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Clip name
    pub name: String,
    /// Sprite sheet path
    pub texture: PathBuf,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Number of frames
    pub frame_count: u32,
}

impl AnimationConfig {
    fn player(name: &str, frame_count: u32) -> Self {
        Self {
            name: name.to_string(),
            texture: PathBuf::from(format!("Content/player/{name}.png")),
            frame_width: 120,
            frame_height: 80,
            frame_count,
        }
    }

    /// Sheet size used when the texture file is missing: all frames in
    /// one row.
    #[must_use]
    pub fn fallback_size(&self) -> (u32, u32) {
        (self.frame_width * self.frame_count, self.frame_height)
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Window Settings ===
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Tick rate used when no replay drives the frame delta
    pub target_fps: u32,
    /// Largest frame delta passed to the simulation (seconds)
    pub max_frame_delta: f32,

    // === Content ===
    /// Map document path
    pub map_path: PathBuf,
    /// Tileset image path
    pub tileset_path: PathBuf,
    /// Tileset size used when the image is missing (width, height)
    pub tileset_size: (u32, u32),
    /// Seconds per animation frame
    pub animation_frame_time: f32,
    /// Spawn override; defaults to the tileset-derived point
    pub spawn: Option<(f32, f32)>,

    // === Debug Settings ===
    /// Draw collision outlines from the start (toggled with F1)
    pub debug_collisions: bool,
    /// Input script to play back
    pub replay_path: Option<PathBuf>,
    /// Frames to simulate when no replay is given
    pub idle_frames: u32,

    // === Tables ===
    /// Movement tuning and collision box
    pub player: PlayerPhysics,
    /// Player animation clips
    pub animations: Vec<AnimationConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Window
            window_width: 1024,
            window_height: 768,
            target_fps: 60,
            max_frame_delta: 0.25,

            // Content
            map_path: PathBuf::from("Content/map.tmj"),
            tileset_path: PathBuf::from("Content/tiles/blocks/tiles_grass.png"),
            tileset_size: (203, 203),
            animation_frame_time: 0.1,
            spawn: None,

            // Debug
            debug_collisions: false,
            replay_path: None,
            idle_frames: 120,

            // Tables
            player: PlayerPhysics::default(),
            animations: vec![
                AnimationConfig::player("idle", 10),
                AnimationConfig::player("run", 10),
                AnimationConfig::player("jump", 3),
                AnimationConfig::player("fall", 3),
            ],
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Reads and parses a config file without falling back.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Config file location: `LEDGE_CONFIG` if set, else the platform
    /// config directory, else the working directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join("ledge").join(CONFIG_FILE),
        )
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Window size
        self.window_width = self.window_width.clamp(320, 7680);
        self.window_height = self.window_height.clamp(240, 4320);
        self.target_fps = self.target_fps.clamp(1, 240);
        self.max_frame_delta = self.max_frame_delta.clamp(0.001, 1.0);

        // Animation
        self.animation_frame_time = self.animation_frame_time.clamp(0.001, 10.0);
        for clip in &mut self.animations {
            clip.frame_width = clip.frame_width.max(1);
            clip.frame_height = clip.frame_height.max(1);
            clip.frame_count = clip.frame_count.max(1);
        }

        // Player
        self.player.collision_width = self.player.collision_width.max(1.0);
        self.player.collision_height = self.player.collision_height.max(1.0);
        self.player.max_jump_time = self.player.max_jump_time.max(0.001);
    }

    /// Fixed frame delta used when no replay is driving the loop.
    #[must_use]
    pub fn idle_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}
