pub mod glyph;
pub mod stroke;

// Re-export key types for convenient access
pub use glyph::{GlyphBuffer, GlyphRecord};
pub use stroke::{stroke_passes, StrandStroke, StrokeColor, StrokeLayer, StrokePass, StrokeStyle, YARN_LAYERS};
