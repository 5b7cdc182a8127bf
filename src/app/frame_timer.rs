//! Frame pacing and frame statistics.
//!
//! [`FrameLimiter`] turns the time a frame took into the sleep needed to stay
//! under the frame cap. [`FrameStats`] counts frames and refreshes a measured
//! frames-per-second value once per second of ticks.

use tracing::debug;

/// Milliseconds between frames-per-second refreshes.
const FPS_WINDOW_MS: u32 = 1000;

/// Caps the frame rate by sleeping away what is left of each frame budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimiter {
    budget_ms: u32,
}

impl FrameLimiter {
    /// Creates a limiter with a budget of `budget_ms` per frame.
    pub fn new(budget_ms: u32) -> Self {
        Self { budget_ms }
    }

    /// The per-frame budget in milliseconds.
    pub fn budget_ms(&self) -> u32 {
        self.budget_ms
    }

    /// How long to sleep after a frame that took `frame_ticks` milliseconds.
    ///
    /// Returns `None` once the frame used up its whole budget.
    pub fn remaining(&self, frame_ticks: u32) -> Option<u32> {
        (frame_ticks < self.budget_ms).then(|| self.budget_ms - frame_ticks)
    }
}

/// Running frame counters.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    total_frames: u64,
    frames_in_window: u32,
    window_start: Option<u32>,
    fps: u32,
}

impl FrameStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a frame that ended at tick `now`.
    pub fn record_frame(&mut self, now: u32) {
        self.total_frames += 1;
        self.frames_in_window += 1;

        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return;
        };

        let elapsed = now.wrapping_sub(start);
        if elapsed >= FPS_WINDOW_MS {
            self.fps = (u64::from(self.frames_in_window) * 1000 / u64::from(elapsed)) as u32;
            self.frames_in_window = 0;
            self.window_start = Some(now);
            debug!(fps = self.fps, total_frames = self.total_frames, "Frame rate");
        }
    }

    /// Frames per second measured over the last completed window, 0 before the first one.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the sleep for frames under budget.
    #[test]
    fn test_fast_frame_sleeps_for_remainder() {
        let limiter = FrameLimiter::new(16);
        assert_eq!(limiter.remaining(5), Some(11));
        assert_eq!(limiter.remaining(0), Some(16));
        assert_eq!(limiter.remaining(15), Some(1));
    }

    /// Tests that frames at or over budget do not sleep.
    #[test]
    fn test_slow_frame_does_not_sleep() {
        let limiter = FrameLimiter::new(16);
        assert_eq!(limiter.remaining(16), None);
        assert_eq!(limiter.remaining(40), None);
    }

    /// Tests that a zero budget never sleeps.
    #[test]
    fn test_zero_budget_never_sleeps() {
        assert_eq!(FrameLimiter::new(0).remaining(0), None);
    }

    /// Tests that FPS is measured once per second of ticks.
    #[test]
    fn test_fps_refreshes_once_per_second() {
        let mut stats = FrameStats::new();
        for frame in 0..60 {
            stats.record_frame(frame * 16);
        }
        // 59 * 16 = 944 ticks, window not complete yet
        assert_eq!(stats.fps(), 0);

        stats.record_frame(1000);
        // 61 frames counted since the window opened at tick 0
        assert_eq!(stats.fps(), 61);
        assert_eq!(stats.total_frames(), 61);
    }

    /// Tests FPS measurement across tick counter wraparound.
    #[test]
    fn test_fps_survives_tick_wraparound() {
        let mut stats = FrameStats::new();
        stats.record_frame(u32::MAX - 499);
        stats.record_frame(500);
        assert_eq!(stats.fps(), 2);
    }
}
