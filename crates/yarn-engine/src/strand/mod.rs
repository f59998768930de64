//! A strand is one menu entry: a curve, the letters riding on it, and the
//! interaction state that couples the two.

pub mod letters;
pub mod state;

use glam::Vec2;

pub use letters::{GlyphInstance, HoverAnchor, LetterDistributor, LetterTuning};
pub use state::{
    FrameDirective, StateTuning, StrandState, StrandStateMachine, TransitionPhase, TransitionToken,
};

use crate::api::config::{CurveKind, MenuConfig, StrandConfig};
use crate::api::types::{StrandId, Viewport};
use crate::core::rng::Rng;
use crate::curve::{
    CurveField, CurveSample, CurveStrategy, RopeSimulation, SegmentChain, StrandCurve,
};
use crate::renderer::glyph::{GlyphBuffer, GlyphRecord};
use crate::renderer::stroke::{stroke_passes, StrandStroke, StrokeColor, StrokePass, StrokeStyle};

/// Flattening budget for hit tests, spread over the chain's segments.
const HIT_TEST_SAMPLES: usize = 96;

#[derive(Debug, Clone)]
pub struct Strand {
    id: StrandId,
    label: String,
    target: String,
    color: StrokeColor,
    style: StrokeStyle,
    base_stroke_width: f32,
    hit_padding: f32,
    curve: StrandCurve,
    state: StrandStateMachine,
    letters: LetterDistributor,
    hover_mode: HoverAnchor,
    /// Curve ratio the gathered words centre on.
    hover_anchor: f32,
}

impl Strand {
    /// Build from validated configuration.
    pub fn build(
        id: StrandId,
        config: &StrandConfig,
        menu: &MenuConfig,
        viewport: &Viewport,
        rng: &mut Rng,
    ) -> Self {
        let curve = match config.curve {
            CurveKind::Field => StrandCurve::Field(CurveField::new(
                viewport.width(),
                config.baseline * viewport.height(),
                &menu.curve,
                rng,
            )),
            CurveKind::Rope => StrandCurve::Rope(RopeSimulation::new(
                viewport.width() * config.rope_anchor,
                viewport.height(),
                menu.rope.clone(),
                rng.fork(),
            )),
        };
        let letters = LetterDistributor::new(&config.label, menu.letters.clone(), rng);
        let style = config.texture.map_or(StrokeStyle::Layered, StrokeStyle::Textured);

        Self {
            id,
            label: config.label.to_uppercase(),
            target: config.target.clone(),
            color: config.parsed_color(),
            style,
            base_stroke_width: config.stroke_width,
            hit_padding: menu.hit_padding,
            curve,
            state: StrandStateMachine::new(config.stroke_width, menu.state.clone()),
            letters,
            hover_mode: menu.letters.hover_anchor,
            hover_anchor: 0.5,
        }
    }

    pub fn id(&self) -> StrandId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn color(&self) -> StrokeColor {
        self.color
    }

    pub fn curve(&self) -> &StrandCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut StrandCurve {
        &mut self.curve
    }

    pub fn state(&self) -> &StrandStateMachine {
        &self.state
    }

    pub fn letters(&self) -> &LetterDistributor {
        &self.letters
    }

    pub fn glyphs(&self) -> &[GlyphInstance] {
        self.letters.glyphs()
    }

    pub fn chain(&self) -> &SegmentChain {
        self.curve.chain()
    }

    pub fn sample_at(&self, ratio: f32) -> CurveSample {
        self.curve.sample_at(ratio)
    }

    pub fn hover_anchor(&self) -> f32 {
        self.hover_anchor
    }

    pub fn base_stroke_width(&self) -> f32 {
        self.base_stroke_width
    }

    pub fn rendered_stroke_width(&self) -> f32 {
        self.state.rendered_stroke_width()
    }

    /// `x_fraction` is the pointer's horizontal position over the viewport.
    pub fn pointer_enter(&mut self, x_fraction: f32) -> bool {
        if !self.state.pointer_enter() {
            return false;
        }
        self.hover_anchor = x_fraction;
        if let Some(rope) = self.curve.as_rope_mut() {
            let strength = rope.config().hover_force;
            rope.apply_force(strength);
        }
        true
    }

    pub fn pointer_move(&mut self, x_fraction: f32) {
        if self.state.is_hovered() && self.hover_mode == HoverAnchor::TrackPointer {
            self.hover_anchor = x_fraction;
        }
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.state.pointer_leave()
    }

    /// Start the open transition. The caller holds the menu's token.
    pub fn activate(&mut self) -> bool {
        if !self.state.activate() {
            return false;
        }
        self.curve.capture_pose();
        true
    }

    pub fn close(&mut self) -> bool {
        self.state.close()
    }

    /// One frame: the timeline picks the curve motion, the curve moves, then
    /// the letters follow. Returns true when a transition fully released.
    pub fn tick(&mut self, dt: f32) -> bool {
        let directive = self.state.tick(dt);
        if directive.capture_pose {
            self.curve.capture_pose();
        }
        self.curve.update(directive.motion);
        self.letters.update(
            self.curve.chain(),
            self.state.gather_blend(),
            self.hover_anchor,
            self.base_stroke_width,
        );
        directive.released
    }

    /// Width of the invisible band that catches the pointer.
    pub fn hit_width(&self) -> f32 {
        self.base_stroke_width + self.hit_padding
    }

    /// Distance from `point` to the curve if it lies inside the hit band.
    pub fn hit_test(&self, point: Vec2) -> Option<f32> {
        let chain = self.curve.chain();
        if chain.is_empty() {
            return None;
        }
        let per_segment = (HIT_TEST_SAMPLES / chain.len()).max(2);
        let distance = chain.distance_to(point, per_segment);
        (distance <= self.hit_width() * 0.5).then_some(distance)
    }

    pub fn svg_path(&self) -> String {
        self.curve.chain().to_svg_path()
    }

    pub fn stroke_passes(&self) -> Vec<StrokePass> {
        stroke_passes(self.style, self.color, self.rendered_stroke_width())
    }

    pub fn stroke(&self) -> StrandStroke<'_> {
        StrandStroke {
            chain: self.curve.chain(),
            passes: self.stroke_passes(),
            hit_width: self.hit_width(),
        }
    }

    /// Append one record per glyph.
    pub fn write_glyphs(&self, buffer: &mut GlyphBuffer, scale: f32) {
        for glyph in self.letters.glyphs() {
            buffer.push(GlyphRecord::from_glyph(glyph, self.id.0, scale));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn build(index: usize, menu: &MenuConfig) -> Strand {
        let mut rng = Rng::new(menu.seed);
        Strand::build(
            StrandId(index as u32),
            &menu.strands[index],
            menu,
            &Viewport::default(),
            &mut rng,
        )
    }

    #[test]
    fn builds_from_default_menu() {
        let menu = MenuConfig::default();
        let s = build(2, &menu);
        assert_eq!(s.label(), "SHOP");
        assert_eq!(s.target(), "shop");
        assert_eq!(s.glyphs().len(), 28);
        assert_eq!(s.hit_width(), 92.0);
        assert!(matches!(s.curve(), StrandCurve::Field(_)));
        let start = s.sample_at(0.0).position;
        assert!((start - Vec2::new(0.0, 800.0 * 0.68)).length() < 1e-3);
        assert!(s.svg_path().starts_with("M 0 "));
    }

    #[test]
    fn hover_gathers_letters_near_pointer() {
        let menu = MenuConfig::default();
        let mut s = build(2, &menu);
        assert!(s.pointer_enter(0.5));
        for _ in 0..100 {
            s.tick(DT);
        }
        assert!(s.state().gather_blend() > 0.99);
        assert!(s.letters().mean_offset().abs() < 0.01, "offset {}", s.letters().mean_offset());
        let mean = s.glyphs().iter().map(|g| g.ratio).sum::<f32>() / s.glyphs().len() as f32;
        assert!((mean - 0.5).abs() < 0.06, "words centred at {}", mean);
        assert!(s.glyphs().iter().all(|g| g.opacity > 0.99));
    }

    #[test]
    fn tracking_pointer_moves_anchor() {
        let menu = MenuConfig::default();
        let mut s = build(0, &menu);
        s.pointer_move(0.9);
        assert_eq!(s.hover_anchor(), 0.5, "not hovered yet");
        s.pointer_enter(0.2);
        s.pointer_move(0.7);
        assert_eq!(s.hover_anchor(), 0.7);

        let fixed = menu.clone().with_letters(LetterTuning {
            hover_anchor: HoverAnchor::FixedAtEntry,
            ..LetterTuning::default()
        });
        let mut s = build(0, &fixed);
        s.pointer_enter(0.2);
        s.pointer_move(0.7);
        assert_eq!(s.hover_anchor(), 0.2);
    }

    #[test]
    fn transition_straightens_then_resumes_wobble() {
        let menu = MenuConfig::default();
        let mut s = build(1, &menu);
        let baseline = 800.0 * 0.42;
        for _ in 0..20 {
            s.tick(DT);
        }
        assert!(s.activate());
        for _ in 0..120 {
            s.tick(DT);
        }
        for k in 0..=10 {
            let y = s.sample_at(k as f32 / 10.0).position.y;
            assert!((y - baseline).abs() < 1e-2, "not straight at {}: {}", k, y);
        }
        assert!((s.rendered_stroke_width() - 60.0 * 0.25).abs() < 0.1);

        assert!(s.close());
        let mut released = false;
        let mut last_mid = s.sample_at(0.5).position;
        for _ in 0..200 {
            released |= s.tick(DT);
            let mid = s.sample_at(0.5).position;
            assert!(mid.distance(last_mid) < 20.0, "curve jumped");
            last_mid = mid;
        }
        assert!(released);
        assert_eq!(s.state().state(), StrandState::Idle);
        assert!((s.rendered_stroke_width() - 60.0).abs() < 1.0);
    }

    #[test]
    fn hit_band_is_padded_stroke() {
        let menu = MenuConfig::default();
        let mut s = build(2, &menu);
        s.activate();
        for _ in 0..60 {
            s.tick(DT);
        }
        // Straightened along the baseline, so distances are exact.
        let p = s.sample_at(0.5).position;
        let n = s.sample_at(0.5).normal();
        assert!(s.hit_test(p).is_some());
        assert!(s.hit_test(p + n * 40.0).is_some());
        assert!(s.hit_test(p + n * 60.0).is_none());
    }

    #[test]
    fn stroke_uses_rendered_width() {
        let menu = MenuConfig::default();
        let mut s = build(0, &menu);
        s.pointer_enter(0.5);
        for _ in 0..200 {
            s.tick(DT);
        }
        let passes = s.stroke_passes();
        assert_eq!(passes.len(), 5);
        assert!((passes[4].width - s.rendered_stroke_width() * 0.4).abs() < 1e-4);
        assert!(s.rendered_stroke_width() > 50.0);
        assert_eq!(s.stroke().hit_width, 100.0);
    }

    #[test]
    fn textured_strand_draws_one_pass() {
        let mut menu = MenuConfig::default();
        menu.strands[0] = menu.strands[0].clone().with_texture(9);
        let s = build(0, &menu);
        let passes = s.stroke_passes();
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].texture, Some(9));
    }

    #[test]
    fn rope_strand_keeps_simulating_and_jiggles_on_hover() {
        let menu = MenuConfig::empty()
            .with_strand(StrandConfig::new("Rope", "#b11226", 2.0, 0.0).with_curve(CurveKind::Rope))
            .with_rope(crate::curve::RopeConfig {
                segments: 40,
                ..crate::curve::RopeConfig::default()
            });
        let mut s = build(0, &menu);
        let head = s.sample_at(0.0).position;
        assert_eq!(head, Vec2::new(640.0, 0.0));
        for _ in 0..30 {
            s.tick(DT);
        }
        let tail_before = s.curve().as_rope().map(|r| r.particles()[39].position);
        s.pointer_enter(0.5);
        let tail_after = s.curve().as_rope().map(|r| r.particles()[39].position);
        assert_ne!(tail_before, tail_after, "hover should kick the tail");
        s.tick(DT);
        assert_eq!(s.sample_at(0.0).position, head);
        assert!(s.state().is_hovered());
    }

    #[test]
    fn glyph_records_tagged_with_strand() {
        let menu = MenuConfig::default();
        let mut s = build(3, &menu);
        s.tick(DT);
        let mut buf = GlyphBuffer::new();
        s.write_glyphs(&mut buf, 16.0);
        assert_eq!(buf.len(), 30);
        assert!(buf.records.iter().all(|r| r.strand == 3.0 && r.scale == 16.0));
        assert_eq!(buf.records[0].codepoint, 'N' as u32 as f32);
    }
}
