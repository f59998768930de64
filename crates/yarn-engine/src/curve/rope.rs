//! Hanging rope strategy: a Verlet particle chain hung from a fixed head.
//!
//! Each frame integrates every free particle under gravity and friction, then
//! relaxes the distance constraints a fixed number of passes. More passes means
//! a stiffer rope; too few and a long chain visibly stretches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bezier::SegmentChain;
use super::{CurveMotion, CurveStrategy};
use crate::core::rng::Rng;

/// Physics parameters. Forces are in pixels per frame².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeConfig {
    pub gravity: f32,
    pub friction: f32,
    /// Particle count, head included.
    pub segments: usize,
    /// Constraint relaxation passes per frame.
    pub iterations: usize,
    /// Pointer must land within this many pixels of a particle to grab it.
    pub grab_radius: f32,
    /// Device tilt (gamma, degrees) to horizontal gravity.
    pub tilt_scale: f32,
    /// Perturbation strength applied when the strand's label is hovered.
    pub hover_force: f32,
    /// Particles before this index are left alone by perturbations.
    pub force_start: usize,
}

impl RopeConfig {
    pub fn desktop() -> Self {
        Self::default()
    }

    pub fn mobile() -> Self {
        Self {
            gravity: 0.9,
            segments: 280,
            ..Self::default()
        }
    }
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            friction: 0.995,
            segments: 400,
            iterations: 6,
            grab_radius: 30.0,
            tilt_scale: 0.015,
            hover_force: 10.0,
            force_start: 6,
        }
    }
}

/// A point mass on the rope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub previous: Vec2,
    /// Fixed particles ignore integration and constraint corrections.
    pub fixed: bool,
}

impl Particle {
    pub fn new(position: Vec2, fixed: bool) -> Self {
        Self {
            position,
            previous: position,
            fixed,
        }
    }

    /// Verlet step: velocity is implied by the last displacement.
    #[inline]
    fn integrate(&mut self, gravity: Vec2, friction: f32) {
        if self.fixed {
            return;
        }
        let velocity = (self.position - self.previous) * friction;
        self.previous = self.position;
        self.position += velocity + gravity;
    }
}

/// Verlet rope curve strategy.
#[derive(Debug, Clone)]
pub struct RopeSimulation {
    particles: Vec<Particle>,
    rest_length: f32,
    /// Horizontal component comes from device tilt.
    gravity: Vec2,
    config: RopeConfig,
    grabbed: Option<usize>,
    chain: SegmentChain,
    points: Vec<Vec2>,
    rng: Rng,
}

impl RopeSimulation {
    /// Hang `config.segments` particles straight down from `(anchor_x, 0)`,
    /// spanning `height` pixels.
    pub fn new(anchor_x: f32, height: f32, config: RopeConfig, rng: Rng) -> Self {
        let n = config.segments;
        let rest_length = if n > 1 { height / (n - 1) as f32 } else { 0.0 };
        let particles = (0..n)
            .map(|i| Particle::new(Vec2::new(anchor_x, i as f32 * rest_length), i == 0))
            .collect();
        let mut rope = Self {
            particles,
            rest_length,
            gravity: Vec2::new(0.0, config.gravity),
            chain: SegmentChain::with_capacity(n.saturating_sub(1)),
            points: Vec::with_capacity(n),
            grabbed: None,
            config,
            rng,
        };
        rope.rebuild_chain();
        rope
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    pub fn grabbed(&self) -> Option<usize> {
        self.grabbed
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// One frame: integrate, then relax `iterations` times.
    pub fn step(&mut self) {
        let (gravity, friction) = (self.gravity, self.config.friction);
        for p in &mut self.particles {
            p.integrate(gravity, friction);
        }
        for _ in 0..self.config.iterations {
            self.relax();
        }
        self.rebuild_chain();
    }

    /// One relaxation pass over every adjacent pair.
    ///
    /// Each free end takes half the correction; a fixed end takes none, so a
    /// pair with one fixed end only closes half its error per pass.
    pub fn relax(&mut self) {
        let rest = self.rest_length;
        for i in 0..self.particles.len().saturating_sub(1) {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let a = &mut head[i];
            let b = &mut tail[0];
            let delta = b.position - a.position;
            let dist = delta.length();
            if dist < f32::EPSILON {
                continue;
            }
            let half = delta * ((dist - rest) / dist * 0.5);
            if !a.fixed {
                a.position += half;
            }
            if !b.fixed {
                b.position -= half;
            }
        }
    }

    /// Kick the tail sideways. The kick grows linearly along the chain so the
    /// part near the head stays calm.
    pub fn apply_force(&mut self, strength: f32) {
        let n = self.particles.len() as f32;
        for i in self.config.force_start..self.particles.len() {
            if self.particles[i].fixed {
                continue;
            }
            let kick = (self.rng.next_f32() - 0.5) * strength * (i as f32 / n);
            self.particles[i].position.x += kick;
        }
    }

    /// Pin the nearest particle within `grab_radius` of `point` to the
    /// pointer. The head can't be grabbed.
    pub fn grab(&mut self, point: Vec2) -> Option<usize> {
        let radius = self.config.grab_radius;
        let nearest = self
            .particles
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, p)| (i, p.position.distance(point)))
            .filter(|&(_, d)| d < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)?;
        self.release();
        let p = &mut self.particles[nearest];
        p.fixed = true;
        p.position = point;
        p.previous = point;
        self.grabbed = Some(nearest);
        Some(nearest)
    }

    /// Move the grabbed particle. It carries no momentum of its own.
    pub fn drag(&mut self, point: Vec2) {
        if let Some(i) = self.grabbed {
            let p = &mut self.particles[i];
            p.position = point;
            p.previous = point;
        }
    }

    /// Let go of the grabbed particle; it resumes from rest where it was left.
    pub fn release(&mut self) {
        if let Some(i) = self.grabbed.take() {
            self.particles[i].fixed = false;
        }
    }

    /// Lean the rope with device tilt (`gamma` in degrees, -90..90).
    pub fn set_tilt(&mut self, gamma: f32) {
        self.gravity.x = if gamma.is_finite() {
            gamma * self.config.tilt_scale
        } else {
            0.0
        };
    }

    fn rebuild_chain(&mut self) {
        self.points.clear();
        self.points.extend(self.particles.iter().map(|p| p.position));
        self.chain.rebuild(&self.points);
    }
}

impl CurveStrategy for RopeSimulation {
    /// The rope is physical; it keeps simulating whatever the strand's state.
    fn update(&mut self, _motion: CurveMotion) {
        self.step();
    }

    fn chain(&self) -> &SegmentChain {
        &self.chain
    }
}
