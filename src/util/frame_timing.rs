//! Frame pacing for hosts that drive the controller from their own loop.

use web_time::{Duration, Instant};

/// Frame clock producing the `dt` fed to
/// [`CameraControls::update`](crate::controls::CameraControls::update).
pub struct FrameClock {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Upper bound on a single reported delta, so a stalled tab does not
    /// teleport the camera on its next frame.
    max_delta: f64,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f64,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f64,
}

impl FrameClock {
    /// Create a new clock with the given FPS target (0 = unlimited).
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            max_delta: 0.1,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last tick to run a frame.
    pub fn should_tick(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Time left until the next frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.min_frame_duration
            .saturating_sub(self.last_frame.elapsed())
    }

    /// Close the current frame and return its duration in seconds, capped at
    /// the clock's maximum delta.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f64();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(self.max_delta)
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_clock_always_ticks() {
        let clock = FrameClock::new(0);
        assert!(clock.should_tick());
        assert_eq!(clock.until_next_frame(), Duration::ZERO);
    }

    #[test]
    fn tick_is_capped() {
        let mut clock = FrameClock::new(60);
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert!(dt <= 0.1);
    }
}
