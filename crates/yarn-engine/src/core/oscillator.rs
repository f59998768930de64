//! Per-object sinusoidal oscillator. Anchors and glyphs each own their own
//! phase/speed/amplitude so nothing shares global wobble state.

use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

/// Uniform random interval `[min, min + span)`, as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRange {
    pub min: f32,
    pub span: f32,
}

impl RandomRange {
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    pub fn sample(&self, rng: &mut Rng) -> f32 {
        rng.range(self.min, self.span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oscillator {
    /// Current phase in radians.
    pub phase: f32,
    /// Phase advance per frame.
    pub speed: f32,
    pub amplitude: f32,
}

impl Oscillator {
    pub const fn new(phase: f32, speed: f32, amplitude: f32) -> Self {
        Self { phase, speed, amplitude }
    }

    /// Oscillator that never moves (pinned endpoints).
    pub const fn still() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Random phase with speed and amplitude drawn from the given ranges.
    pub fn random(rng: &mut Rng, speed: RandomRange, amplitude: RandomRange) -> Self {
        let phase = rng.phase();
        let speed = speed.sample(rng);
        let amplitude = amplitude.sample(rng);
        Self { phase, speed, amplitude }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.speed;
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        self.phase.sin() * self.amplitude
    }

    #[inline]
    pub fn cos(&self) -> f32 {
        self.phase.cos() * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_oscillator_outputs_zero() {
        let mut osc = Oscillator::still();
        for _ in 0..100 {
            osc.advance();
            assert_eq!(osc.sin(), 0.0);
            assert_eq!(osc.cos(), 0.0);
        }
    }

    #[test]
    fn output_bounded_by_amplitude() {
        let mut osc = Oscillator::new(0.3, 0.05, 12.0);
        for _ in 0..500 {
            osc.advance();
            assert!(osc.sin().abs() <= 12.0 + 1e-4);
            assert!(osc.cos().abs() <= 12.0 + 1e-4);
        }
    }

    #[test]
    fn random_respects_ranges() {
        let mut rng = Rng::new(3);
        for _ in 0..200 {
            let osc = Oscillator::random(
                &mut rng,
                RandomRange::new(0.002, 0.004),
                RandomRange::new(8.0, 10.0),
            );
            assert!(osc.speed >= 0.002 && osc.speed < 0.006);
            assert!(osc.amplitude >= 8.0 && osc.amplitude < 18.0);
        }
    }
}
