use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::field::CurveTuning;
use crate::curve::rope::RopeConfig;
use crate::renderer::stroke::StrokeColor;
use crate::strand::letters::LetterTuning;
use crate::strand::state::StateTuning;

/// Reasons a menu cannot be built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("strand {index}: label is empty")]
    EmptyLabel { index: usize },

    #[error("strand {index}: stroke width {width} must be finite and positive")]
    InvalidStrokeWidth { index: usize, width: f32 },

    #[error("strand {index}: baseline {baseline} is not finite")]
    InvalidBaseline { index: usize, baseline: f32 },

    #[error("strand {index}: cannot parse color {color:?}")]
    InvalidColor { index: usize, color: String },

    #[error("invalid viewport {width}x{height} at {device_pixel_ratio}x")]
    InvalidViewport {
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    },

    #[error("invalid menu JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which curve engine a strand runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Wobbling anchors across the viewport.
    #[default]
    Field,
    /// Verlet rope hanging from the top edge.
    Rope,
}

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    pub label: String,
    /// `#rrggbb` or `#rgb`.
    pub color: String,
    /// Base stroke width in CSS pixels.
    pub stroke_width: f32,
    /// Resting height as a fraction of the viewport height.
    pub baseline: f32,
    /// Opaque click target handed back in `MenuEvent::Activated`.
    pub target: String,
    /// Host texture id; layered strokes when absent.
    pub texture: Option<u32>,
    pub curve: CurveKind,
    /// Rope head position as a fraction of the viewport width.
    pub rope_anchor: f32,
}

impl StrandConfig {
    pub fn new(label: impl Into<String>, color: impl Into<String>, stroke_width: f32, baseline: f32) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            stroke_width,
            baseline,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_texture(mut self, texture: u32) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_curve(mut self, curve: CurveKind) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_rope_anchor(mut self, fraction: f32) -> Self {
        self.rope_anchor = fraction;
        self
    }

    fn validate(&self, index: usize) -> Result<StrokeColor, ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel { index });
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ConfigError::InvalidStrokeWidth {
                index,
                width: self.stroke_width,
            });
        }
        if !self.baseline.is_finite() {
            return Err(ConfigError::InvalidBaseline {
                index,
                baseline: self.baseline,
            });
        }
        StrokeColor::from_hex(&self.color).ok_or_else(|| ConfigError::InvalidColor {
            index,
            color: self.color.clone(),
        })
    }

    /// Parsed accent colour. Only meaningful after `MenuConfig::validate`.
    pub(crate) fn parsed_color(&self) -> StrokeColor {
        StrokeColor::from_hex(&self.color).unwrap_or_default()
    }
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            color: "#ffffff".into(),
            stroke_width: 40.0,
            baseline: 0.5,
            target: String::new(),
            texture: None,
            curve: CurveKind::Field,
            rope_anchor: 0.5,
        }
    }
}

/// Complete menu description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub strands: Vec<StrandConfig>,
    pub curve: CurveTuning,
    pub letters: LetterTuning,
    pub state: StateTuning,
    pub rope: RopeConfig,
    /// Extra width of the pointer hit band over the base stroke width.
    pub hit_padding: f32,
    /// Font size reported in glyph records.
    pub glyph_size: f32,
    /// Seed for every random draw in the menu.
    pub seed: u64,
}

impl MenuConfig {
    /// A menu with no strands and default tuning.
    pub fn empty() -> Self {
        Self {
            strands: Vec::new(),
            ..Self::default()
        }
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, strand) in self.strands.iter().enumerate() {
            strand.validate(index)?;
        }
        Ok(())
    }

    pub fn with_strand(mut self, strand: StrandConfig) -> Self {
        self.strands.push(strand);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rope(mut self, rope: RopeConfig) -> Self {
        self.rope = rope;
        self
    }

    pub fn with_letters(mut self, letters: LetterTuning) -> Self {
        self.letters = letters;
        self
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            strands: vec![
                StrandConfig::new("About", "#ffb6c1", 50.0, 0.18).with_target("about"),
                StrandConfig::new("Archive", "#ff1414", 60.0, 0.42).with_target("archive"),
                StrandConfig::new("Shop", "#ffd700", 42.0, 0.68).with_target("shop"),
                StrandConfig::new("Newsletter", "#d1e0e3", 48.0, 0.92).with_target("newsletter"),
            ],
            curve: CurveTuning::default(),
            letters: LetterTuning::default(),
            state: StateTuning::default(),
            rope: RopeConfig::default(),
            hit_padding: 50.0,
            glyph_size: 16.0,
            seed: 0x5EED_1234,
        }
    }
}
