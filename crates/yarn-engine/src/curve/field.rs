//! Anchor-wobble curve: a handful of anchors spread across the viewport, each
//! drifting on its own pair of oscillators, joined by a Catmull-Rom chain.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bezier::SegmentChain;
use super::{CurveMotion, CurveStrategy};
use crate::core::oscillator::{Oscillator, RandomRange};
use crate::core::rng::Rng;

/// Shape parameters for anchor-based strands. All speeds are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveTuning {
    /// Anchors per strand, endpoints included.
    pub anchor_count: usize,
    /// Interior anchors sit up to this many pixels above/below the baseline.
    pub base_jitter: f32,
    pub speed_x: RandomRange,
    pub speed_y: RandomRange,
    pub amplitude_x: RandomRange,
    pub amplitude_y: RandomRange,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            anchor_count: 7,
            base_jitter: 110.0,
            speed_x: RandomRange::new(0.002, 0.004),
            speed_y: RandomRange::new(0.003, 0.005),
            amplitude_x: RandomRange::new(8.0, 10.0),
            amplitude_y: RandomRange::new(15.0, 22.0),
        }
    }
}

/// A control point of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Resting position the oscillators swing around.
    pub base: Vec2,
    /// Position used to build the curve this frame.
    pub current: Vec2,
    pub wobble_x: Oscillator,
    pub wobble_y: Oscillator,
    /// Origin of the running pose tween.
    pose_from: Vec2,
}

impl Anchor {
    /// An anchor that never moves (strand endpoints).
    pub fn pinned(base: Vec2) -> Self {
        Self {
            base,
            current: base,
            wobble_x: Oscillator::still(),
            wobble_y: Oscillator::still(),
            pose_from: base,
        }
    }

    pub fn wobbling(base: Vec2, rng: &mut Rng, tuning: &CurveTuning) -> Self {
        let wobble_x = Oscillator::random(rng, tuning.speed_x, tuning.amplitude_x);
        let wobble_y = Oscillator::random(rng, tuning.speed_y, tuning.amplitude_y);
        let mut anchor = Self {
            base,
            current: base,
            wobble_x,
            wobble_y,
            pose_from: base,
        };
        anchor.current = anchor.rest_pose();
        anchor.pose_from = anchor.current;
        anchor
    }

    /// Where the oscillators put the anchor at their current phase.
    #[inline]
    pub fn rest_pose(&self) -> Vec2 {
        self.base + Vec2::new(self.wobble_x.cos(), self.wobble_y.sin())
    }

    pub fn is_pinned(&self) -> bool {
        self.wobble_x.amplitude == 0.0 && self.wobble_y.amplitude == 0.0
    }

    fn advance(&mut self) {
        self.wobble_x.advance();
        self.wobble_y.advance();
        self.current = self.rest_pose();
    }
}

/// Spline-anchor curve strategy.
#[derive(Debug, Clone)]
pub struct CurveField {
    anchors: Vec<Anchor>,
    chain: SegmentChain,
    /// Scratch buffer of anchor positions fed to the chain builder.
    points: Vec<Vec2>,
    baseline_y: f32,
}

impl CurveField {
    /// Spread `tuning.anchor_count` anchors from x=0 to x=`width` around
    /// `baseline_y`. Endpoints are pinned exactly on the baseline.
    pub fn new(width: f32, baseline_y: f32, tuning: &CurveTuning, rng: &mut Rng) -> Self {
        let n = tuning.anchor_count;
        let mut anchors = Vec::with_capacity(n);
        for i in 0..n {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let edge = i == 0 || i + 1 == n;
            if edge {
                anchors.push(Anchor::pinned(Vec2::new(t * width, baseline_y)));
            } else {
                let jitter = rng.centered(tuning.base_jitter);
                let base = Vec2::new(t * width, baseline_y + jitter);
                anchors.push(Anchor::wobbling(base, rng, tuning));
            }
        }
        Self::from_anchors(anchors, baseline_y)
    }

    fn from_anchors(anchors: Vec<Anchor>, baseline_y: f32) -> Self {
        let mut field = Self {
            points: Vec::with_capacity(anchors.len()),
            chain: SegmentChain::with_capacity(anchors.len().saturating_sub(1)),
            anchors,
            baseline_y,
        };
        field.rebuild_chain();
        field
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Target of the straighten tween for one anchor.
    #[inline]
    fn straight_pose(&self, anchor: &Anchor) -> Vec2 {
        Vec2::new(anchor.base.x, self.baseline_y)
    }

    fn rebuild_chain(&mut self) {
        self.points.clear();
        self.points.extend(self.anchors.iter().map(|a| a.current));
        self.chain.rebuild(&self.points);
    }
}

impl CurveStrategy for CurveField {
    fn update(&mut self, motion: CurveMotion) {
        match motion {
            CurveMotion::Wobble => {
                for anchor in &mut self.anchors {
                    anchor.advance();
                }
            }
            CurveMotion::Hold => {}
            CurveMotion::Straighten(progress) => {
                for i in 0..self.anchors.len() {
                    let target = self.straight_pose(&self.anchors[i]);
                    let a = &mut self.anchors[i];
                    a.current = a.pose_from.lerp(target, progress);
                }
            }
            CurveMotion::Release(progress) => {
                for a in &mut self.anchors {
                    a.current = a.pose_from.lerp(a.rest_pose(), progress);
                }
            }
        }
        self.rebuild_chain();
    }

    fn capture_pose(&mut self) {
        for a in &mut self.anchors {
            a.pose_from = a.current;
        }
    }

    fn chain(&self) -> &SegmentChain {
        &self.chain
    }
}
