use yarn_engine::bridge::protocol::HEADER_FLOATS;
use yarn_engine::{
    ConfigError, InputEvent, Menu, MenuConfig, ProtocolLayout, StrandId, StrandRecord, Viewport,
};
#[cfg(feature = "vectors")]
use yarn_engine::VectorState;

/// Wires a `Menu` to the flat buffers the browser reads each frame.
///
/// The wasm exports in `lib.rs` keep one of these in a `thread_local!`,
/// because wasm-bindgen cannot hand out borrows into Rust state.
pub struct MenuRunner {
    menu: Menu,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    strand_records: Vec<StrandRecord>,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    /// Tessellate strokes each frame. Off when the host draws SVG paths.
    tessellate: bool,
}

impl MenuRunner {
    pub fn new(config: MenuConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        let menu = Menu::new(config, viewport)?;
        let layout = ProtocolLayout::for_menu(&menu);
        let mut runner = Self {
            strand_records: Vec::with_capacity(layout.max_strands),
            header: [0.0; HEADER_FLOATS],
            menu,
            layout,
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            tessellate: false,
        };
        runner.publish();
        Ok(runner)
    }

    pub fn from_json(json: &str, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::new(MenuConfig::from_json(json)?, viewport)
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn set_tessellate(&mut self, on: bool) {
        self.tessellate = on;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.menu.push_input(event);
    }

    pub fn grant_motion(&mut self) {
        self.menu.grant_motion();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.menu.resize(viewport);
        self.layout = ProtocolLayout::for_menu(&self.menu);
        self.publish();
    }

    /// Run one host frame and refresh every output buffer.
    pub fn tick(&mut self, dt: f32) {
        self.menu.tick(dt);
        self.publish();
    }

    fn publish(&mut self) {
        self.strand_records.clear();
        self.strand_records
            .extend(self.menu.strands().iter().map(StrandRecord::from_strand));

        self.refresh_vectors();
        self.header = self.layout.header(&self.menu, self.vector_vertex_count() as usize);
    }

    #[cfg(feature = "vectors")]
    fn refresh_vectors(&mut self) {
        if self.tessellate {
            self.menu.tessellate(&mut self.vectors);
        } else {
            self.vectors.clear();
        }
    }

    #[cfg(not(feature = "vectors"))]
    fn refresh_vectors(&mut self) {}

    // ---- Pointer accessors for host memory reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn header(&self) -> &[f32] {
        &self.header
    }

    pub fn strands_ptr(&self) -> *const f32 {
        self.strand_records.as_ptr() as *const f32
    }

    pub fn strand_count(&self) -> u32 {
        self.strand_records.len() as u32
    }

    pub fn glyphs_ptr(&self) -> *const f32 {
        self.menu.glyphs().records_ptr()
    }

    pub fn glyph_count(&self) -> u32 {
        self.menu.glyphs().len() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.menu.event_records().as_ptr() as *const f32
    }

    pub fn event_count(&self) -> u32 {
        self.menu.event_records().len().min(self.layout.max_events) as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count().min(self.layout.max_vector_vertices) as u32
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertex_count(&self) -> u32 {
        0
    }

    // ---- Per-strand queries ----

    pub fn svg_path(&self, strand: u32) -> Option<String> {
        self.menu.strand(StrandId(strand)).map(|s| s.svg_path())
    }

    /// Click target of an `Activated` event's strand.
    pub fn target(&self, strand: u32) -> Option<String> {
        self.menu.strand(StrandId(strand)).map(|s| s.target().to_string())
    }

    pub fn label(&self, strand: u32) -> Option<String> {
        self.menu.strand(StrandId(strand)).map(|s| s.label().to_string())
    }

    pub fn color_hex(&self, strand: u32) -> Option<String> {
        self.menu.config().strands.get(strand as usize).map(|s| s.color.clone())
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
