//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic and fast; every strand draws its jitter from one of these
//! so a given seed always rebuilds the same menu.

use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [min, min + span).
    pub fn range(&mut self, min: f32, span: f32) -> f32 {
        min + self.next_f32() * span
    }

    /// Uniform float in [-half, half).
    pub fn centered(&mut self, half: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * half
    }

    /// Uniform phase in [0, 2π).
    pub fn phase(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// Derive an independent generator (one per strand).
    pub fn fork(&mut self) -> Rng {
        Rng::new(self.next_u64() ^ 0x9E37_79B9_7F4A_7C15)
    }
}
