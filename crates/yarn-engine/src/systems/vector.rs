//! Lyon-based stroke tessellation for strands.
//!
//! Turns a strand's cubic chain plus its stroke passes into a flat triangle
//! list the host can upload straight to a vertex buffer.
//!
//! # Usage
//!
//! ```ignore
//! let passes = strand.stroke_passes();
//! vectors.clear();
//! vectors.stroke_passes(strand.chain(), &passes);
//! upload(vectors.as_floats());
//! ```

use bytemuck::{Pod, Zeroable};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, LineCap, LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex,
    StrokeVertexConstructor, VertexBuffers,
};

use crate::curve::bezier::SegmentChain;
use crate::renderer::stroke::{StrokeColor, StrokePass};

/// Per-vertex data for stroke rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24
}

/// Vertex constructor for lyon stroke tessellation.
struct StrokeVertexCtor {
    color: StrokeColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

/// Lyon path through every segment of `chain`. `None` when the chain is empty.
pub fn chain_path(chain: &SegmentChain) -> Option<Path> {
    let first = chain.segments().first()?;
    let mut builder = Path::builder();
    builder.begin(point(first.start.x, first.start.y));
    for s in chain.segments() {
        builder.cubic_bezier_to(
            point(s.ctrl1.x, s.ctrl1.y),
            point(s.ctrl2.x, s.ctrl2.y),
            point(s.end.x, s.end.y),
        );
    }
    builder.end(false);
    Some(builder.build())
}

/// Holds the lyon tessellator and the output vertex buffer.
/// Cleared each frame and refilled per strand.
pub struct VectorState {
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
        }
    }

    /// Clear the vertex buffer. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    pub fn as_floats(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Flush indexed geometry to the flat buffer as triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Tessellate one round-capped stroke along `chain`.
    pub fn stroke_chain(&mut self, chain: &SegmentChain, width: f32, color: StrokeColor) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let Some(path) = chain_path(chain) else {
            return;
        };
        let options = StrokeOptions::tolerance(0.5)
            .with_line_width(width)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);
        let result = self.stroke_tess.tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }

    /// Tessellate every pass in draw order.
    pub fn stroke_passes(&mut self, chain: &SegmentChain, passes: &[StrokePass]) {
        for pass in passes {
            self.stroke_chain(chain, pass.width, pass.color);
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}
