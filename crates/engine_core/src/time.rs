//! Frame clock for the game loop.

use std::time::{Duration, Instant};

/// Largest step handed to gameplay by default (a stalled window must not teleport the car).
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Tracks frame timing and hands out clamped delta times.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Raw duration of the last frame.
    delta: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound applied by [`Time::delta_seconds`].
    max_delta: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new frame clock.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Create a clock that clamps deltas to `max_delta` seconds.
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            max_delta: max_delta.max(0.001),
            ..Self::new()
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Delta time in seconds, clamped to the configured maximum.
    pub fn delta_seconds(&self) -> f32 {
        clamp_delta(self.delta.as_secs_f32(), self.max_delta)
    }

    /// Current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Clamp a raw frame delta into `[0, max_delta]`.
pub fn clamp_delta(raw: f32, max_delta: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, max_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_delta_caps_long_frames() {
        assert_eq!(clamp_delta(2.5, 0.1), 0.1);
        assert_eq!(clamp_delta(0.016, 0.1), 0.016);
    }

    #[test]
    fn clamp_delta_rejects_negative_and_nan() {
        assert_eq!(clamp_delta(-1.0, 0.1), 0.0);
        assert_eq!(clamp_delta(f32::NAN, 0.1), 0.0);
    }

    #[test]
    fn fresh_clock_has_zero_delta() {
        let t = Time::with_max_delta(0.05);
        assert_eq!(t.delta_seconds(), 0.0);
        assert_eq!(t.frame_count(), 0);
    }
}
