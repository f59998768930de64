// curve/mod.rs
//
// Curve strategies a strand can be built on.
// Both expose the same capability: advance one frame, answer point/tangent
// queries by normalized ratio, and hand out the cubic chain for drawing.

pub mod bezier;
pub mod field;
pub mod rope;

use glam::Vec2;

pub use bezier::{CubicSegment, SegmentChain};
pub use field::{Anchor, CurveField, CurveTuning};
pub use rope::{Particle, RopeConfig, RopeSimulation};

/// A point on a curve plus the direction of travel there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: Vec2,
    /// Tangent angle in radians (`atan2(dy, dx)`).
    pub angle: f32,
}

impl CurveSample {
    /// Fallback for degenerate or not-yet-built curves.
    pub const ORIGIN: Self = Self {
        position: Vec2::ZERO,
        angle: 0.0,
    };

    /// Unit normal (tangent rotated +90°).
    #[inline]
    pub fn normal(&self) -> Vec2 {
        Vec2::new(-self.angle.sin(), self.angle.cos())
    }
}

/// How the strand wants its curve to move this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveMotion {
    /// Free idle motion.
    Wobble,
    /// Keep the current shape (hovered strands hold still).
    Hold,
    /// Ease from the captured pose toward a straight line; eased progress.
    Straighten(f32),
    /// Ease from the captured pose back to the resting wobble pose; eased progress.
    Release(f32),
}

/// Common interface of the spline-anchor and verlet-rope curves.
pub trait CurveStrategy {
    /// Advance one frame and rebuild the segment chain.
    fn update(&mut self, motion: CurveMotion);

    /// Snapshot the current shape as the origin of a pose tween.
    fn capture_pose(&mut self) {}

    /// The cubic chain built by the last `update`.
    fn chain(&self) -> &SegmentChain;

    /// Point and tangent at a normalized ratio.
    fn sample_at(&self, ratio: f32) -> CurveSample {
        self.chain().sample_at(ratio)
    }
}

/// The curve strategy chosen for a strand at construction time.
#[derive(Debug, Clone)]
pub enum StrandCurve {
    Field(CurveField),
    Rope(RopeSimulation),
}

impl StrandCurve {
    pub fn as_rope(&self) -> Option<&RopeSimulation> {
        match self {
            StrandCurve::Rope(rope) => Some(rope),
            StrandCurve::Field(_) => None,
        }
    }

    pub fn as_rope_mut(&mut self) -> Option<&mut RopeSimulation> {
        match self {
            StrandCurve::Rope(rope) => Some(rope),
            StrandCurve::Field(_) => None,
        }
    }
}

impl CurveStrategy for StrandCurve {
    fn update(&mut self, motion: CurveMotion) {
        match self {
            StrandCurve::Field(f) => f.update(motion),
            StrandCurve::Rope(r) => r.update(motion),
        }
    }

    fn capture_pose(&mut self) {
        match self {
            StrandCurve::Field(f) => f.capture_pose(),
            StrandCurve::Rope(r) => r.capture_pose(),
        }
    }

    fn chain(&self) -> &SegmentChain {
        match self {
            StrandCurve::Field(f) => f.chain(),
            StrandCurve::Rope(r) => r.chain(),
        }
    }
}
