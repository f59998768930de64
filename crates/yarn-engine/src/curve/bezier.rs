//! Cubic Bezier segments and the Catmull-Rom chain built from them.
//!
//! Both curve strategies end up here: anchors (or rope particles) are turned
//! into a C¹ chain of cubics, and every point/tangent query and every path
//! the renderer draws comes from that chain.

use std::fmt::Write as _;

use glam::Vec2;

use super::CurveSample;

/// One cubic Bezier span: `start → end` shaped by two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub end: Vec2,
}

impl CubicSegment {
    pub const fn new(start: Vec2, ctrl1: Vec2, ctrl2: Vec2, end: Vec2) -> Self {
        Self { start, ctrl1, ctrl2, end }
    }

    /// Uniform Catmull-Rom span from `p1` to `p2` expressed as a Bezier.
    #[inline]
    pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self {
            start: p1,
            ctrl1: p1 + (p2 - p0) / 6.0,
            ctrl2: p2 - (p3 - p1) / 6.0,
            end: p2,
        }
    }

    /// Position at `t ∈ [0, 1]`.
    #[inline]
    pub fn point(&self, t: f32) -> Vec2 {
        let m = 1.0 - t;
        let m2 = m * m;
        let t2 = t * t;
        self.start * (m2 * m)
            + self.ctrl1 * (3.0 * m2 * t)
            + self.ctrl2 * (3.0 * m * t2)
            + self.end * (t2 * t)
    }

    /// First derivative at `t ∈ [0, 1]`.
    #[inline]
    pub fn tangent(&self, t: f32) -> Vec2 {
        let m = 1.0 - t;
        (self.ctrl1 - self.start) * (3.0 * m * m)
            + (self.ctrl2 - self.ctrl1) * (6.0 * m * t)
            + (self.end - self.ctrl2) * (3.0 * t * t)
    }
}

/// Ordered chain of cubic segments with ratio-based sampling.
#[derive(Debug, Clone, Default)]
pub struct SegmentChain {
    segments: Vec<CubicSegment>,
}

impl SegmentChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild the chain through `points`, reusing the allocation.
    ///
    /// The neighbour of a boundary point is the point itself, so the chain
    /// starts exactly at the first point and ends exactly at the last.
    pub fn rebuild(&mut self, points: &[Vec2]) {
        self.segments.clear();
        let n = points.len();
        if n < 2 {
            return;
        }
        for i in 0..n - 1 {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(n - 1)];
            self.segments.push(CubicSegment::catmull_rom(p0, p1, p2, p3));
        }
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Point and tangent angle at a normalized ratio along the chain.
    ///
    /// The ratio is mapped uniformly onto segment index and local `t`, not
    /// onto arc length, so fast-wobbling spans get sparser samples. An empty
    /// chain yields the origin with angle 0.
    pub fn sample_at(&self, ratio: f32) -> CurveSample {
        let n = self.segments.len();
        if n == 0 || !ratio.is_finite() {
            return CurveSample::ORIGIN;
        }
        let raw = ratio * n as f32;
        let idx = (raw.floor().max(0.0) as usize).min(n - 1);
        let t = (raw - idx as f32).clamp(0.0, 1.0);
        let seg = &self.segments[idx];
        let tangent = seg.tangent(t);
        CurveSample {
            position: seg.point(t),
            angle: tangent.y.atan2(tangent.x),
        }
    }

    /// SVG path data: `M` followed by one `C` per segment. Empty chain → "".
    pub fn to_svg_path(&self) -> String {
        let Some(first) = self.segments.first() else {
            return String::new();
        };
        let mut d = String::with_capacity(16 + self.segments.len() * 48);
        let _ = write!(d, "M {} {}", first.start.x, first.start.y);
        for s in &self.segments {
            let _ = write!(
                d,
                " C {} {},{} {},{} {}",
                s.ctrl1.x, s.ctrl1.y, s.ctrl2.x, s.ctrl2.y, s.end.x, s.end.y
            );
        }
        d
    }

    /// Flatten into a polyline with `per_segment` steps per span.
    pub fn flatten(&self, per_segment: usize) -> Vec<Vec2> {
        let steps = per_segment.max(1);
        let mut out = Vec::with_capacity(self.segments.len() * steps + 1);
        for (i, seg) in self.segments.iter().enumerate() {
            if i == 0 {
                out.push(seg.start);
            }
            for k in 1..=steps {
                out.push(seg.point(k as f32 / steps as f32));
            }
        }
        out
    }

    /// Shortest distance from `p` to the flattened chain.
    pub fn distance_to(&self, p: Vec2, per_segment: usize) -> f32 {
        let line = self.flatten(per_segment);
        match line.len() {
            0 => f32::INFINITY,
            1 => line[0].distance(p),
            _ => line
                .windows(2)
                .map(|w| point_segment_distance(p, w[0], w[1]))
                .fold(f32::INFINITY, f32::min),
        }
    }
}

fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavy_points() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 100.0),
            Vec2::new(150.0, 40.0),
            Vec2::new(300.0, 180.0),
            Vec2::new(450.0, 60.0),
            Vec2::new(600.0, 140.0),
            Vec2::new(750.0, 90.0),
            Vec2::new(900.0, 100.0),
        ]
    }

    #[test]
    fn straight_catmull_rom_stays_on_line() {
        let seg = CubicSegment::catmull_rom(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(30.0, 0.0),
        );
        for k in 0..=10 {
            let p = seg.point(k as f32 / 10.0);
            assert!(p.y.abs() < 1e-5);
            assert!(p.x >= 10.0 - 1e-4 && p.x <= 20.0 + 1e-4);
        }
    }

    #[test]
    fn chain_passes_through_every_point() {
        let pts = wavy_points();
        let mut chain = SegmentChain::new();
        chain.rebuild(&pts);
        assert_eq!(chain.len(), pts.len() - 1);
        let n = chain.len() as f32;
        for (i, p) in pts.iter().enumerate() {
            let s = chain.sample_at(i as f32 / n);
            assert!(s.position.distance(*p) < 1e-3, "point {} off: {:?}", i, s.position);
        }
    }

    #[test]
    fn boundaries_continuous_from_both_sides() {
        let mut chain = SegmentChain::new();
        chain.rebuild(&wavy_points());
        let n = chain.len();
        for i in 0..n - 1 {
            assert_eq!(chain.segments()[i].end, chain.segments()[i + 1].start);
            let boundary = (i + 1) as f32 / n as f32;
            let before = chain.sample_at(boundary - 1e-5).position;
            let after = chain.sample_at(boundary + 1e-5).position;
            assert!(before.distance(after) < 0.5, "gap at boundary {}", i);
        }
    }

    #[test]
    fn tangents_match_across_boundaries() {
        let mut chain = SegmentChain::new();
        chain.rebuild(&wavy_points());
        let segs = chain.segments();
        for w in segs.windows(2) {
            let out = w[0].tangent(1.0);
            let inn = w[1].tangent(0.0);
            assert!(out.distance(inn) < 1e-2, "C1 broken: {:?} vs {:?}", out, inn);
        }
    }

    #[test]
    fn degenerate_chain_returns_origin() {
        let mut chain = SegmentChain::new();
        assert_eq!(chain.sample_at(0.5), CurveSample::ORIGIN);
        chain.rebuild(&[Vec2::new(5.0, 5.0)]);
        assert!(chain.is_empty());
        assert_eq!(chain.sample_at(0.3), CurveSample::ORIGIN);
        assert_eq!(chain.to_svg_path(), "");
    }

    #[test]
    fn sample_clamps_out_of_range_ratios() {
        let pts = wavy_points();
        let mut chain = SegmentChain::new();
        chain.rebuild(&pts);
        assert!(chain.sample_at(-0.5).position.distance(pts[0]) < 1e-3);
        assert!(chain.sample_at(1.5).position.distance(pts[6]) < 1e-3);
    }

    #[test]
    fn horizontal_chain_has_zero_angle() {
        let pts: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32 * 100.0, 50.0)).collect();
        let mut chain = SegmentChain::new();
        chain.rebuild(&pts);
        let s = chain.sample_at(0.37);
        assert!(s.angle.abs() < 1e-4);
        assert!((s.position.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn svg_path_has_one_curve_per_segment() {
        let mut chain = SegmentChain::new();
        chain.rebuild(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0), Vec2::new(20.0, 0.0)]);
        let d = chain.to_svg_path();
        assert!(d.starts_with("M 0 0"));
        assert_eq!(d.matches(" C ").count(), 2);
        assert!(d.ends_with("20 0"));
    }

    #[test]
    fn distance_to_line() {
        let mut chain = SegmentChain::new();
        chain.rebuild(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(200.0, 0.0)]);
        assert!((chain.distance_to(Vec2::new(50.0, 30.0), 8) - 30.0).abs() < 1e-3);
        assert!(SegmentChain::new().distance_to(Vec2::ZERO, 8).is_infinite());
    }
}
