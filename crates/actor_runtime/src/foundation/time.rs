//! Time management utilities
//!
//! The runtime core never reads the clock itself; the run loop owns a
//! [`FrameTimer`] and hands the clamped delta to the registry.

use std::time::{Duration, Instant};

/// Largest step handed to the simulation by default, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.05;

/// Shortest frame the timer lets through by default (roughly 60 Hz)
pub const DEFAULT_MIN_FRAME_TIME: f32 = 0.016;

/// Clamp a raw frame delta to `[0, max_delta]`
pub fn clamp_delta(raw: f32, max_delta: f32) -> f32 {
    raw.clamp(0.0, max_delta)
}

/// Frame timer producing clamped delta times
pub struct FrameTimer {
    last_frame: Instant,
    min_frame_time: Duration,
    max_delta: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FRAME_TIME, DEFAULT_MAX_DELTA)
    }
}

impl FrameTimer {
    /// Create a new timer
    ///
    /// `min_frame_time` is the floor a frame is padded to, `max_delta` the cap
    /// applied to the reported delta. Both are in seconds.
    pub fn new(min_frame_time: f32, max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            min_frame_time: Duration::from_secs_f32(min_frame_time.max(0.0)),
            max_delta,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Wait out the minimum frame time, then return the clamped delta since the previous call
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.min_frame_time {
            std::thread::sleep(self.min_frame_time - elapsed);
        }

        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(raw)
    }

    /// Account for a frame of `raw` seconds without touching the clock
    pub fn record(&mut self, raw: f32) -> f32 {
        self.delta_time = clamp_delta(raw, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the clamped delta of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time (sum of clamped deltas)
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delta_caps_long_frames() {
        assert_eq!(clamp_delta(0.2, DEFAULT_MAX_DELTA), DEFAULT_MAX_DELTA);
        assert_eq!(clamp_delta(0.01, DEFAULT_MAX_DELTA), 0.01);
        assert_eq!(clamp_delta(-1.0, DEFAULT_MAX_DELTA), 0.0);
    }

    #[test]
    fn test_record_accumulates_clamped_time() {
        let mut timer = FrameTimer::new(0.0, 0.05);
        assert_eq!(timer.record(0.5), 0.05);
        assert_eq!(timer.record(0.025), 0.025);
        assert_eq!(timer.frame_count(), 2);
        assert!((timer.total_time() - 0.075).abs() < 1e-6);
        assert_eq!(timer.delta_time(), 0.025);
    }

    #[test]
    fn test_tick_respects_minimum_frame_time() {
        let mut timer = FrameTimer::new(0.005, 1.0);
        let delta = timer.tick();
        assert!(delta >= 0.004, "delta {delta} shorter than the frame floor");
    }
}
