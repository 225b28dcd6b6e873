//! Scripted input playback.
//!
//! A replay is a JSON array of frames. Each frame names the keys held down,
//! the frame delta, and how many consecutive frames it covers:
//!
//! ```json
//! [
//!   { "dt": 0.016, "keys": ["Right"], "repeat": 30 },
//!   { "dt": 0.016, "keys": ["Right", "Space"] }
//! ]
//! ```

use std::fs;
use std::path::Path;

use ledge_gameplay::{InputError, KeyCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Error types for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Script file could not be read
    #[error("Replay I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Script is not valid JSON for a frame list
    #[error("Replay parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A frame names a key the game does not poll
    #[error("Replay frame {frame}: {source}")]
    Key {
        /// Index of the offending frame
        frame: usize,
        /// Underlying key error
        source: InputError,
    },

    /// A frame has a negative or non-finite delta
    #[error("Replay frame {frame}: invalid dt {dt}")]
    InvalidDelta {
        /// Index of the offending frame
        frame: usize,
        /// The delta as written
        dt: f32,
    },
}

fn one() -> u32 {
    1
}

/// A frame as written in the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawFrame {
    dt: f32,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default = "one")]
    repeat: u32,
}

/// A single frame of input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFrame {
    /// Delta time in seconds
    pub dt: f32,
    /// Keys held down
    pub keys: Vec<KeyCode>,
    /// Consecutive frames with this input
    pub repeat: u32,
}

/// A parsed input script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replay {
    frames: Vec<InputFrame>,
}

impl Replay {
    /// Builds a replay from frames.
    #[must_use]
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self { frames }
    }

    /// A replay of `count` frames with no keys held.
    #[must_use]
    pub fn idle(count: u32, dt: f32) -> Self {
        Self::new(vec![InputFrame {
            dt,
            keys: Vec::new(),
            repeat: count,
        }])
    }

    /// Reads and parses a script file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let replay = Self::parse(&fs::read_to_string(path)?)?;
        info!(
            "Loaded replay from {} ({} frames)",
            path.display(),
            replay.frame_count()
        );
        Ok(replay)
    }

    /// Parses a script.
    pub fn parse(json: &str) -> Result<Self, ReplayError> {
        let raw: Vec<RawFrame> = serde_json::from_str(json)?;
        let frames = raw
            .into_iter()
            .enumerate()
            .map(|(index, frame)| {
                if !frame.dt.is_finite() || frame.dt < 0.0 {
                    return Err(ReplayError::InvalidDelta {
                        frame: index,
                        dt: frame.dt,
                    });
                }
                let keys = frame
                    .keys
                    .iter()
                    .map(|name| name.parse::<KeyCode>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| ReplayError::Key {
                        frame: index,
                        source,
                    })?;
                Ok(InputFrame {
                    dt: frame.dt,
                    keys,
                    repeat: frame.repeat,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }

    /// Frames as written, before expanding repeats.
    #[must_use]
    pub fn frames(&self) -> &[InputFrame] {
        &self.frames
    }

    /// Total frames after expanding repeats.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.repeat)).sum()
    }

    /// Total script duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|f| f.dt * f.repeat as f32).sum()
    }

    /// Iterates `(dt, keys)` once per simulated frame.
    pub fn ticks(&self) -> impl Iterator<Item = (f32, &[KeyCode])> + '_ {
        self.frames.iter().flat_map(|frame| {
            (0..frame.repeat).map(move |_| (frame.dt, frame.keys.as_slice()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"[
        { "dt": 0.016, "keys": ["Right"], "repeat": 3 },
        { "dt": 0.02, "keys": ["right", "SPACE"] },
        { "dt": 0.016 }
    ]"#;

    #[test]
    fn test_parse_script() {
        let replay = Replay::parse(SCRIPT).expect("valid script");

        assert_eq!(replay.frames().len(), 3);
        assert_eq!(replay.frame_count(), 5);
        assert_eq!(replay.frames()[1].keys, vec![KeyCode::Right, KeyCode::Space]);
        assert_eq!(replay.frames()[2].repeat, 1);
        assert!(replay.frames()[2].keys.is_empty());
    }

    #[test]
    fn test_ticks_expand_repeats() {
        let replay = Replay::parse(SCRIPT).expect("valid script");
        let ticks: Vec<_> = replay.ticks().collect();

        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[2], (0.016, &[KeyCode::Right][..]));
        assert_eq!(ticks[3].0, 0.02);
        assert!((replay.duration() - 0.084).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_key() {
        let err = Replay::parse(r#"[{ "dt": 0.016, "keys": ["Escape"] }]"#)
            .expect_err("unknown key");
        assert!(matches!(err, ReplayError::Key { frame: 0, .. }));
        assert_eq!(err.to_string(), "Replay frame 0: unknown key: Escape");
    }

    #[test]
    fn test_negative_delta() {
        let err = Replay::parse(r#"[{ "dt": 0.01 }, { "dt": -1.0 }]"#).expect_err("bad dt");
        assert!(matches!(err, ReplayError::InvalidDelta { frame: 1, .. }));
    }

    #[test]
    fn test_missing_dt_is_json_error() {
        let err = Replay::parse(r#"[{ "keys": [] }]"#).expect_err("dt required");
        assert!(matches!(err, ReplayError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("script.json");
        fs::write(&path, SCRIPT).expect("write script");

        let replay = Replay::load(&path).expect("load script");
        assert_eq!(replay.frame_count(), 5);
    }

    #[test]
    fn test_idle_replay() {
        let replay = Replay::idle(10, 0.5);
        assert_eq!(replay.frame_count(), 10);
        assert!(replay.ticks().all(|(dt, keys)| dt == 0.5 && keys.is_empty()));
    }
}
