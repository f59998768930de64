const STEP_EPSILON: f32 = 1e-3;

/// Fixed-rate frame clock.
///
/// Every smoothing rate in the engine is expressed per frame at 60 Hz, so the
/// host's variable `requestAnimationFrame` deltas are converted into a whole
/// number of engine frames here.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Duration of one engine frame in seconds.
    frame_dt: f32,
    /// Leftover time not yet consumed by a whole frame.
    accumulator: f32,
    /// Upper bound on catch-up frames per host tick.
    max_steps: u32,
    /// Engine frames run since construction.
    frames: u64,
}

impl FrameClock {
    pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(frame_dt: f32) -> Self {
        Self {
            frame_dt,
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
            frames: 0,
        }
    }

    /// Add host frame time. Returns the number of engine frames to run.
    ///
    /// Non-finite or negative deltas (tab wake-ups, clock skew) count as zero.
    pub fn accumulate(&mut self, host_dt: f32) -> u32 {
        if host_dt.is_finite() && host_dt > 0.0 {
            self.accumulator += host_dt;
        }
        // Cap so a long stall doesn't replay seconds of animation.
        self.accumulator = self.accumulator.min(self.frame_dt * self.max_steps as f32);
        // Tolerance so a host delta of exactly one frame is never rounded down.
        let steps = (self.accumulator / self.frame_dt + STEP_EPSILON) as u32;
        self.accumulator = (self.accumulator - steps as f32 * self.frame_dt).max(0.0);
        self.frames += steps as u64;
        steps
    }

    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRAME_DT)
    }
}
