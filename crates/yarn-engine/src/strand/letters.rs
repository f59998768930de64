//! Glyph layout along a strand.
//!
//! Every glyph has two targets: an idle one (a random spot on the curve plus
//! slow sinusoidal drift) and a gathered one (packed into repeated copies of
//! the label around the hover point). The strand's gather blend mixes the two
//! and each glyph eases toward the mix.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::oscillator::{Oscillator, RandomRange};
use crate::core::rng::Rng;
use crate::curve::bezier::SegmentChain;
use crate::extensions::easing::{approach, shortest_angle_delta_deg};

/// Where the gathered words centre while a strand is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverAnchor {
    /// Follow the pointer's horizontal position while hovered.
    #[default]
    TrackPointer,
    /// Keep the position the pointer entered at.
    FixedAtEntry,
}

/// Letter layout parameters. Rates and speeds are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterTuning {
    /// Approximate glyph count per strand; rounded up to whole words.
    pub target_glyphs: usize,
    pub char_spacing: f32,
    pub word_gap: f32,
    pub ratio_speed: RandomRange,
    pub ratio_amplitude: RandomRange,
    pub offset_speed: RandomRange,
    pub offset_amplitude: RandomRange,
    /// Scale applied to the offset drift.
    pub offset_drift_scale: f32,
    /// Idle offsets are drawn from `[-spread, spread)`.
    pub offset_spread: f32,
    /// Follow rate while mostly scattered.
    pub idle_rate: f32,
    /// Follow rate once the blend passes one half.
    pub gathered_rate: f32,
    pub rotation_rate: f32,
    /// Base ratio advance per frame; zero keeps idle glyphs in place.
    pub idle_flow: f32,
    pub hover_anchor: HoverAnchor,
}

impl Default for LetterTuning {
    fn default() -> Self {
        Self {
            target_glyphs: 28,
            char_spacing: 0.020,
            word_gap: 0.04,
            ratio_speed: RandomRange::new(0.0006, 0.0018),
            ratio_amplitude: RandomRange::new(0.006, 0.012),
            offset_speed: RandomRange::new(0.0008, 0.002),
            offset_amplitude: RandomRange::new(0.04, 0.08),
            offset_drift_scale: 0.3,
            offset_spread: 0.35,
            idle_rate: 0.05,
            gathered_rate: 0.14,
            rotation_rate: 0.12,
            idle_flow: 0.0002,
            hover_anchor: HoverAnchor::TrackPointer,
        }
    }
}

/// Glyphs drifting past these ratios jump back by `WRAP_SPAN`.
pub const WRAP_HIGH: f32 = 1.1;
pub const WRAP_LOW: f32 = -0.1;
pub const WRAP_SPAN: f32 = 1.2;
/// Glyphs stay visible this far past either end of the curve.
pub const VISIBLE_MARGIN: f32 = 0.02;

/// One letter riding on a strand.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphInstance {
    pub character: char,
    /// Which copy of the label this glyph belongs to.
    pub repetition: usize,
    pub index_in_word: usize,
    pub base_ratio: f32,
    pub base_offset: f32,
    pub ratio_drift: Oscillator,
    pub offset_drift: Oscillator,
    /// Rendered position along the curve. May leave [0, 1].
    pub ratio: f32,
    /// Rendered offset from the curve in half stroke widths.
    pub offset: f32,
    pub rotation_deg: f32,
    pub position: Vec2,
    pub opacity: f32,
    pub visible: bool,
}

impl GlyphInstance {
    fn idle_target(&self, drift_scale: f32) -> (f32, f32) {
        (
            self.base_ratio + self.ratio_drift.sin(),
            self.base_offset + self.offset_drift.sin() * drift_scale,
        )
    }

    fn wrap(&mut self, shift_rendered: bool) {
        let shift = if self.base_ratio > WRAP_HIGH {
            -WRAP_SPAN
        } else if self.base_ratio < WRAP_LOW {
            WRAP_SPAN
        } else {
            return;
        };
        self.base_ratio += shift;
        if shift_rendered {
            self.ratio += shift;
        }
    }
}

/// Fixed pool of glyphs for one strand.
#[derive(Debug, Clone)]
pub struct LetterDistributor {
    glyphs: Vec<GlyphInstance>,
    word_len: usize,
    repetitions: usize,
    tuning: LetterTuning,
}

impl LetterDistributor {
    /// Lay out `ceil(target / len)` copies of `label`, upper-cased.
    pub fn new(label: &str, tuning: LetterTuning, rng: &mut Rng) -> Self {
        let word: Vec<char> = label.to_uppercase().chars().collect();
        let word_len = word.len();
        let repetitions = if word_len == 0 {
            0
        } else {
            tuning.target_glyphs.div_ceil(word_len)
        };

        let mut glyphs = Vec::with_capacity(word_len * repetitions);
        for repetition in 0..repetitions {
            for (index_in_word, &character) in word.iter().enumerate() {
                let base_ratio = rng.next_f32();
                let base_offset = rng.centered(tuning.offset_spread);
                let ratio_drift =
                    Oscillator::random(rng, tuning.ratio_speed, tuning.ratio_amplitude);
                let offset_drift =
                    Oscillator::random(rng, tuning.offset_speed, tuning.offset_amplitude);
                glyphs.push(GlyphInstance {
                    character,
                    repetition,
                    index_in_word,
                    base_ratio,
                    base_offset,
                    ratio_drift,
                    offset_drift,
                    ratio: base_ratio,
                    offset: base_offset,
                    rotation_deg: 0.0,
                    position: Vec2::ZERO,
                    opacity: 0.5,
                    visible: true,
                });
            }
        }

        Self {
            glyphs,
            word_len,
            repetitions,
            tuning,
        }
    }

    pub fn glyphs(&self) -> &[GlyphInstance] {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut [GlyphInstance] {
        &mut self.glyphs
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn tuning(&self) -> &LetterTuning {
        &self.tuning
    }

    /// Gathered ratio for a glyph with the words centred on `anchor`.
    pub fn hover_ratio(&self, glyph: &GlyphInstance, anchor: f32) -> f32 {
        let t = &self.tuning;
        let word_span = self.word_len as f32 * t.char_spacing + t.word_gap;
        let center = self.repetitions as f32 / 2.0;
        anchor
            + (glyph.repetition as f32 - center) * word_span
            + glyph.index_in_word as f32 * t.char_spacing
    }

    /// Advance one frame and place every glyph on `chain`.
    ///
    /// `blend` is the strand's gather blend, `anchor` the hover ratio, and
    /// `stroke_width` the strand's base stroke width. With no segments the
    /// glyphs keep their last position.
    pub fn update(&mut self, chain: &SegmentChain, blend: f32, anchor: f32, stroke_width: f32) {
        let blend = blend.clamp(0.0, 1.0);
        let rate = if blend > 0.5 {
            self.tuning.gathered_rate
        } else {
            self.tuning.idle_rate
        };
        let (flow, drift_scale, rotation_rate) = (
            self.tuning.idle_flow,
            self.tuning.offset_drift_scale,
            self.tuning.rotation_rate,
        );

        for i in 0..self.glyphs.len() {
            let hover_r = self.hover_ratio(&self.glyphs[i], anchor);
            let g = &mut self.glyphs[i];

            g.ratio_drift.advance();
            g.offset_drift.advance();
            g.base_ratio += flow;
            g.wrap(blend <= 0.5);

            let (idle_r, idle_p) = g.idle_target(drift_scale);
            let goal_r = idle_r * (1.0 - blend) + hover_r * blend;
            let goal_p = idle_p * (1.0 - blend);
            g.ratio = approach(g.ratio, goal_r, rate);
            g.offset = approach(g.offset, goal_p, rate);

            g.opacity = 0.5 + 0.5 * blend;
            g.visible = (-VISIBLE_MARGIN..=1.0 + VISIBLE_MARGIN).contains(&g.ratio);

            if chain.is_empty() {
                continue;
            }
            let sample = chain.sample_at(g.ratio.clamp(0.0, 1.0));
            g.position = sample.position + sample.normal() * (g.offset * stroke_width * 0.5);
            let target_deg = sample.angle.to_degrees();
            g.rotation_deg += shortest_angle_delta_deg(g.rotation_deg, target_deg) * rotation_rate;
        }
    }

    /// Mean rendered perpendicular offset.
    pub fn mean_offset(&self) -> f32 {
        if self.glyphs.is_empty() {
            return 0.0;
        }
        self.glyphs.iter().map(|g| g.offset).sum::<f32>() / self.glyphs.len() as f32
    }
}
