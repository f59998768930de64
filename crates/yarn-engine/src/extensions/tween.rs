// extensions/tween.rs
//
// Timed scalar tweens for the transition timeline.
//
// Usage:
//   let straighten = Tween::new(0.5, Easing::BackOut);
//   let overlay = Tween::new(1.2, Easing::QuartInOut).with_delay(0.2);
//   overlay.value_at(elapsed)   // eased progress in [0, 1] (BackOut overshoots)

use super::easing::Easing;

/// A fixed-duration eased progress curve, positioned on a timeline by `delay`.
///
/// Tweens hold no clock; the owner keeps one `elapsed` per timeline and asks
/// every tween on it for its progress, so tweens sharing a start stay in sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Seconds from timeline start before the tween begins.
    pub delay: f32,
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub const fn new(duration: f32, easing: Easing) -> Self {
        Self {
            delay: 0.0,
            duration,
            easing,
        }
    }

    pub const fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Raw progress [0, 1] at timeline time `elapsed`.
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return if elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress at timeline time `elapsed`.
    pub fn value_at(&self, elapsed: f32) -> f32 {
        self.easing.apply(self.progress(elapsed))
    }

    /// Timeline time at which the tween has finished.
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration.max(0.0)
    }

    pub fn is_complete(&self, elapsed: f32) -> bool {
        elapsed >= self.end_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_progress() {
        let t = Tween::new(1.0, Easing::Linear);
        assert_eq!(t.value_at(0.0), 0.0);
        assert!((t.value_at(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(t.value_at(2.0), 1.0);
        assert!(t.is_complete(1.0));
    }

    #[test]
    fn delay_shifts_start() {
        let t = Tween::new(1.2, Easing::Linear).with_delay(0.2);
        assert_eq!(t.value_at(0.1), 0.0);
        assert!((t.value_at(0.8) - 0.5).abs() < 1e-5);
        assert!((t.end_time() - 1.4).abs() < 1e-6);
        assert!(!t.is_complete(1.3));
    }

    #[test]
    fn zero_duration_is_a_step() {
        let t = Tween::new(0.0, Easing::Linear).with_delay(0.3);
        assert_eq!(t.progress(0.2), 0.0);
        assert_eq!(t.progress(0.3), 1.0);
    }
}
