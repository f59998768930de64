/// Shared frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Strands: max_strands × 4 floats]
/// [Glyphs: max_glyphs × 8 floats]
/// [Vectors: max_vector_vertices × 6 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use bytemuck::{Pod, Zeroable};

use crate::api::menu::Menu;
use crate::api::types::EventRecord;
use crate::renderer::glyph::GlyphRecord;
use crate::strand::{Strand, StrandState, TransitionPhase};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_VIEWPORT_WIDTH: usize = 3;
pub const HEADER_VIEWPORT_HEIGHT: usize = 4;
pub const HEADER_BACKING_SCALE: usize = 5;
pub const HEADER_MAX_STRANDS: usize = 6;
pub const HEADER_STRAND_COUNT: usize = 7;
pub const HEADER_MAX_GLYPHS: usize = 8;
pub const HEADER_GLYPH_COUNT: usize = 9;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 10;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 11;
pub const HEADER_MAX_EVENTS: usize = 12;
pub const HEADER_EVENT_COUNT: usize = 13;
pub const HEADER_OVERLAY_PROGRESS: usize = 14;
pub const HEADER_CONTENT_PROGRESS: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per strand record (wire format, never changes).
pub const STRAND_FLOATS: usize = 4;

/// Floats per glyph record: x, y, rotation, opacity, visible, strand, codepoint, scale.
pub const GLYPH_FLOATS: usize = GlyphRecord::FLOATS;

/// Floats per vector vertex: x, y, r, g, b, a.
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per menu event: kind, strand, a, b.
pub const EVENT_FLOATS: usize = EventRecord::FLOATS;

/// Per-strand state the host needs to drive its own DOM/SVG layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StrandRecord {
    pub stroke_width: f32,
    pub hit_width: f32,
    pub gather_blend: f32,
    /// See [`StrandRecord::state_code`].
    pub state: f32,
}

impl StrandRecord {
    pub fn from_strand(strand: &Strand) -> Self {
        Self {
            stroke_width: strand.rendered_stroke_width(),
            hit_width: strand.hit_width(),
            gather_blend: strand.state().gather_blend(),
            state: Self::state_code(strand.state().state()),
        }
    }

    /// 0 idle, 1 hovered, 2 opening, 3 open, 4 closing, 5 releasing.
    pub fn state_code(state: StrandState) -> f32 {
        match state {
            StrandState::Idle => 0.0,
            StrandState::Hovered => 1.0,
            StrandState::Transitioning(TransitionPhase::Opening { .. }) => 2.0,
            StrandState::Transitioning(TransitionPhase::Open) => 3.0,
            StrandState::Transitioning(TransitionPhase::Closing { .. }) => 4.0,
            StrandState::Transitioning(TransitionPhase::Releasing { .. }) => 5.0,
        }
    }
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_strands: usize,
    pub max_glyphs: usize,
    pub max_vector_vertices: usize,
    /// Maximum menu events per frame.
    pub max_events: usize,

    pub strand_data_floats: usize,
    pub glyph_data_floats: usize,
    pub vector_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where strand data begins.
    pub strand_data_offset: usize,
    pub glyph_data_offset: usize,
    pub vector_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub const DEFAULT_MAX_VECTOR_VERTICES: usize = 65536;
    pub const DEFAULT_MAX_EVENTS: usize = 16;

    /// Compute layout from raw capacity values.
    pub fn new(max_strands: usize, max_glyphs: usize, max_vector_vertices: usize, max_events: usize) -> Self {
        let strand_data_floats = max_strands * STRAND_FLOATS;
        let glyph_data_floats = max_glyphs * GLYPH_FLOATS;
        let vector_data_floats = max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let strand_data_offset = HEADER_FLOATS;
        let glyph_data_offset = strand_data_offset + strand_data_floats;
        let vector_data_offset = glyph_data_offset + glyph_data_floats;
        let event_data_offset = vector_data_offset + vector_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_strands,
            max_glyphs,
            max_vector_vertices,
            max_events,
            strand_data_floats,
            glyph_data_floats,
            vector_data_floats,
            event_data_floats,
            strand_data_offset,
            glyph_data_offset,
            vector_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Size the strand and glyph sections for a built menu. Glyph counts are
    /// fixed at build time, so the capacity is exact.
    pub fn for_menu(menu: &Menu) -> Self {
        let glyphs = menu.strands().iter().map(|s| s.glyphs().len()).sum();
        Self::new(
            menu.strands().len(),
            glyphs,
            Self::DEFAULT_MAX_VECTOR_VERTICES,
            Self::DEFAULT_MAX_EVENTS,
        )
    }

    /// Header for the current frame. Counts are clamped to capacity.
    pub fn header(&self, menu: &Menu, vector_vertex_count: usize) -> [f32; HEADER_FLOATS] {
        let viewport = menu.viewport();
        let mut h = [0.0; HEADER_FLOATS];
        h[HEADER_FRAME_COUNTER] = menu.frames() as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_VIEWPORT_WIDTH] = viewport.width();
        h[HEADER_VIEWPORT_HEIGHT] = viewport.height();
        h[HEADER_BACKING_SCALE] = viewport.backing_scale();
        h[HEADER_MAX_STRANDS] = self.max_strands as f32;
        h[HEADER_STRAND_COUNT] = menu.strands().len().min(self.max_strands) as f32;
        h[HEADER_MAX_GLYPHS] = self.max_glyphs as f32;
        h[HEADER_GLYPH_COUNT] = menu.glyphs().len().min(self.max_glyphs) as f32;
        h[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        h[HEADER_VECTOR_VERTEX_COUNT] = vector_vertex_count.min(self.max_vector_vertices) as f32;
        h[HEADER_MAX_EVENTS] = self.max_events as f32;
        h[HEADER_EVENT_COUNT] = menu.event_records().len().min(self.max_events) as f32;
        h[HEADER_OVERLAY_PROGRESS] = menu.overlay_progress();
        h[HEADER_CONTENT_PROGRESS] = menu.content_progress();
        h
    }
}
