use bytemuck::{Pod, Zeroable};

use crate::strand::letters::GlyphInstance;

/// Per-glyph placement record read by the host to position text nodes.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphRecord {
    /// X position in CSS pixels.
    pub x: f32,
    /// Y position in CSS pixels.
    pub y: f32,
    /// Rotation in degrees, about (x, y).
    pub rotation: f32,
    pub opacity: f32,
    /// 1.0 shown, 0.0 hidden.
    pub visible: f32,
    /// Index of the owning strand.
    pub strand: f32,
    /// Unicode scalar value of the character.
    pub codepoint: f32,
    /// Font size in CSS pixels.
    pub scale: f32,
}

impl GlyphRecord {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_glyph(glyph: &GlyphInstance, strand: u32, scale: f32) -> Self {
        Self {
            x: glyph.position.x,
            y: glyph.position.y,
            rotation: glyph.rotation_deg,
            opacity: glyph.opacity,
            visible: if glyph.visible { 1.0 } else { 0.0 },
            strand: strand as f32,
            codepoint: glyph.character as u32 as f32,
            scale,
        }
    }
}

/// Glyph records for every strand, rebuilt each frame.
pub struct GlyphBuffer {
    pub records: Vec<GlyphRecord>,
}

impl GlyphBuffer {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn push(&mut self, record: GlyphRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flat float view, `FLOATS` per record.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    /// Raw pointer to record data for reads from wasm memory.
    pub fn records_ptr(&self) -> *const f32 {
        self.records.as_ptr() as *const f32
    }
}

impl Default for GlyphBuffer {
    fn default() -> Self {
        Self::new()
    }
}
