//! Frame timing.
//!
//! The simulation runs on a variable timestep. Each frame delta is clamped
//! before it reaches the game so one long stall cannot tunnel the player
//! through the map.

use std::collections::VecDeque;

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Maximum delta time passed on to the simulation
    max_dt: f32,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
    /// Simulated seconds so far
    elapsed: f64,
    /// Frames recorded so far
    frame_count: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl FrameTiming {
    /// Create a new frame timing manager.
    #[must_use]
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt: max_dt.max(0.001),
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Clamps a raw frame delta and records it.
    ///
    /// Negative and NaN deltas become zero.
    pub fn delta_time(&mut self, raw_dt: f32) -> f32 {
        let dt = if raw_dt.is_nan() {
            0.0
        } else {
            raw_dt.clamp(0.0, self.max_dt)
        };

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
        self.elapsed += f64::from(dt);
        self.frame_count += 1;

        dt
    }

    /// Get the current FPS (averaged over recent frames).
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        self.average_frame_time() * 1000.0
    }

    /// Simulated seconds since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Frames recorded since the timer started.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }
}
