//! Stroke passes for drawing a strand.
//!
//! A plain strand is drawn as five stacked strokes of decreasing width and
//! increasing opacity, which reads as a soft, fuzzy yarn. A textured strand
//! is a single full-opacity pass the host fills with its texture.

use crate::curve::bezier::SegmentChain;

/// RGBA colour, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl StrokeColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#rrggbb` or `#rgb`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb8(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One layer of the layered style: width relative to the rendered stroke
/// width, and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeLayer {
    pub width_scale: f32,
    pub alpha: f32,
}

/// Widest and faintest first.
pub const YARN_LAYERS: [StrokeLayer; 5] = [
    StrokeLayer { width_scale: 1.35, alpha: 0.08 },
    StrokeLayer { width_scale: 1.15, alpha: 0.18 },
    StrokeLayer { width_scale: 0.95, alpha: 0.38 },
    StrokeLayer { width_scale: 0.7, alpha: 0.65 },
    StrokeLayer { width_scale: 0.4, alpha: 1.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeStyle {
    #[default]
    Layered,
    /// Host-side texture id.
    Textured(u32),
}

/// A single stroke to draw along the strand's cubic chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePass {
    pub width: f32,
    pub color: StrokeColor,
    pub texture: Option<u32>,
}

/// Passes for a strand with `color`, drawn `width` wide, in draw order.
pub fn stroke_passes(style: StrokeStyle, color: StrokeColor, width: f32) -> Vec<StrokePass> {
    match style {
        StrokeStyle::Layered => YARN_LAYERS
            .iter()
            .map(|layer| StrokePass {
                width: width * layer.width_scale,
                color: color.with_alpha(color.a * layer.alpha),
                texture: None,
            })
            .collect(),
        StrokeStyle::Textured(id) => vec![StrokePass {
            width,
            color,
            texture: Some(id),
        }],
    }
}

/// Everything the host needs to draw one strand this frame.
#[derive(Debug, Clone)]
pub struct StrandStroke<'a> {
    pub chain: &'a SegmentChain,
    pub passes: Vec<StrokePass>,
    /// Width of the invisible pointer hit band.
    pub hit_width: f32,
}
