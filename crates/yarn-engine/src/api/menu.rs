//! The menu controller: owns every strand, routes input, runs the frame loop,
//! and holds the one transition token.

use glam::Vec2;

use super::config::{ConfigError, MenuConfig};
use super::types::{EventRecord, MenuEvent, StrandId, Viewport};
use crate::core::rng::Rng;
use crate::core::time::FrameClock;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::glyph::GlyphBuffer;
use crate::strand::{Strand, TransitionToken};

pub struct Menu {
    config: MenuConfig,
    viewport: Viewport,
    strands: Vec<Strand>,
    /// Strand indices in paint order; the last one is on top.
    draw_order: Vec<usize>,
    token: TransitionToken,
    clock: FrameClock,
    input: InputQueue,
    /// Raised since the last `tick`, by input or direct calls.
    pending: Vec<MenuEvent>,
    events: Vec<MenuEvent>,
    event_records: Vec<EventRecord>,
    glyphs: GlyphBuffer,
    /// Strand under the pointer when the engine does hit-testing.
    hovered: Option<StrandId>,
    /// Rope strand and particle held by the pointer.
    grabbed: Option<(StrandId, usize)>,
    motion_granted: bool,
}

impl Menu {
    pub fn new(config: MenuConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let strands = build_strands(&config, &viewport);
        log::info!(
            "menu: built {} strands for {}x{} viewport",
            strands.len(),
            viewport.width(),
            viewport.height()
        );
        Ok(Self {
            draw_order: (0..strands.len()).collect(),
            strands,
            config,
            viewport,
            token: TransitionToken::new(),
            clock: FrameClock::default(),
            input: InputQueue::new(),
            pending: Vec::with_capacity(8),
            events: Vec::with_capacity(8),
            event_records: Vec::with_capacity(8),
            glyphs: GlyphBuffer::new(),
            hovered: None,
            grabbed: None,
            motion_granted: false,
        })
    }

    pub fn from_json(json: &str, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::new(MenuConfig::from_json(json)?, viewport)
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn strand(&self, id: StrandId) -> Option<&Strand> {
        self.strands.get(id.index())
    }

    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    pub fn token(&self) -> &TransitionToken {
        &self.token
    }

    pub fn hovered(&self) -> Option<StrandId> {
        self.hovered
    }

    pub fn grabbed(&self) -> Option<(StrandId, usize)> {
        self.grabbed
    }

    pub fn motion_granted(&self) -> bool {
        self.motion_granted
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Events published by the last `tick`: everything raised since the
    /// tick before it.
    pub fn events(&self) -> &[MenuEvent] {
        &self.events
    }

    pub fn event_records(&self) -> &[EventRecord] {
        &self.event_records
    }

    /// Glyph records for every strand, as of the last `tick`.
    pub fn glyphs(&self) -> &GlyphBuffer {
        &self.glyphs
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Overlay slide progress of the open page, 0 when none is open.
    pub fn overlay_progress(&self) -> f32 {
        self.token
            .holder()
            .and_then(|id| self.strand(id))
            .map_or(0.0, |s| s.state().overlay_progress())
    }

    pub fn content_progress(&self) -> f32 {
        self.token
            .holder()
            .and_then(|id| self.strand(id))
            .map_or(0.0, |s| s.state().content_progress())
    }

    /// Apply queued input, then run as many fixed frames as `dt` seconds
    /// cover. Returns the number of frames run.
    pub fn tick(&mut self, dt: f32) -> u32 {
        for event in self.input.drain() {
            self.handle(event);
        }

        let steps = self.clock.accumulate(dt);
        let frame_dt = self.clock.frame_dt();
        for _ in 0..steps {
            self.step(frame_dt);
        }

        self.glyphs.clear();
        for &i in &self.draw_order {
            self.strands[i].write_glyphs(&mut self.glyphs, self.config.glyph_size);
        }
        self.events.clear();
        self.events.append(&mut self.pending);
        self.event_records.clear();
        self.event_records.extend(self.events.iter().map(MenuEvent::record));
        steps
    }

    fn step(&mut self, frame_dt: f32) {
        for strand in &mut self.strands {
            if strand.tick(frame_dt) {
                let id = strand.id();
                self.token.release(id);
                self.pending.push(MenuEvent::Released { strand: id });
                log::debug!("menu: strand {} released", id.0);
            }
        }
    }

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerDown { x, y } => {
                self.grab(Vec2::new(x, y));
            }
            InputEvent::PointerUp { .. } => self.release_grab(),
            InputEvent::Click { x, y } => {
                if let Some(id) = self.strand_at(Vec2::new(x, y)) {
                    self.activate(id);
                }
            }
            InputEvent::StrandEnter { strand, x } => {
                self.enter(StrandId(strand), x);
            }
            InputEvent::StrandMove { strand, x } => {
                if let Some(s) = self.strand_mut(StrandId(strand)) {
                    s.pointer_move(x);
                }
            }
            InputEvent::StrandLeave { strand } => {
                self.leave(StrandId(strand));
            }
            InputEvent::StrandClick { strand } => {
                self.activate(StrandId(strand));
            }
            InputEvent::Close => {
                self.close();
            }
            InputEvent::KeyDown { key_code } => {
                if key_code == InputEvent::ESCAPE {
                    self.close();
                }
            }
            InputEvent::Tilt { gamma } => self.set_tilt(gamma),
        }
    }

    fn strand_mut(&mut self, id: StrandId) -> Option<&mut Strand> {
        let count = self.strands.len();
        let strand = self.strands.get_mut(id.index());
        if strand.is_none() {
            log::warn!("menu: no strand {} (have {})", id.0, count);
        }
        strand
    }

    /// Topmost strand whose hit band contains `point`.
    pub fn strand_at(&self, point: Vec2) -> Option<StrandId> {
        self.draw_order
            .iter()
            .rev()
            .map(|&i| &self.strands[i])
            .find(|s| s.hit_test(point).is_some())
            .map(Strand::id)
    }

    fn bring_to_front(&mut self, id: StrandId) {
        if let Some(pos) = self.draw_order.iter().position(|&i| i == id.index()) {
            let i = self.draw_order.remove(pos);
            self.draw_order.push(i);
        }
    }

    /// Hover a strand. Refused while any page is open.
    pub fn enter(&mut self, id: StrandId, x_fraction: f32) -> bool {
        if self.token.is_held() {
            log::debug!("menu: hover on {} ignored during transition", id.0);
            return false;
        }
        let entered = self
            .strand_mut(id)
            .is_some_and(|s| s.pointer_enter(x_fraction));
        if entered {
            self.bring_to_front(id);
        }
        entered
    }

    pub fn leave(&mut self, id: StrandId) -> bool {
        self.strand_mut(id).is_some_and(|s| s.pointer_leave())
    }

    /// Open the page of strand `id`.
    pub fn activate(&mut self, id: StrandId) -> bool {
        if id.index() >= self.strands.len() {
            log::warn!("menu: no strand {} to activate", id.0);
            return false;
        }
        if !self.token.try_acquire(id) {
            log::debug!("menu: click on {} ignored, {:?} is open", id.0, self.token.holder());
            return false;
        }
        let strand = &mut self.strands[id.index()];
        if !strand.activate() {
            self.token.release(id);
            return false;
        }
        let target = strand.target().to_string();
        log::info!("menu: activated {} -> {:?}", strand.label(), target);
        self.pending.push(MenuEvent::Activated { strand: id, target });
        true
    }

    /// Close the open page, if any.
    pub fn close(&mut self) -> bool {
        let Some(id) = self.token.holder() else {
            log::debug!("menu: close ignored, nothing open");
            return false;
        };
        let closing = self.strand_mut(id).is_some_and(|s| s.close());
        if closing {
            self.pending.push(MenuEvent::Closing { strand: id });
        } else {
            log::debug!("menu: strand {} is already closing", id.0);
        }
        closing
    }

    fn pointer_move(&mut self, point: Vec2) {
        if let Some((id, _)) = self.grabbed {
            if let Some(rope) = self.strands[id.index()].curve_mut().as_rope_mut() {
                rope.drag(point);
            }
            return;
        }

        let x = self.viewport.x_fraction(point.x);
        if let Some(id) = self.hovered {
            let strand = &mut self.strands[id.index()];
            if strand.hit_test(point).is_some() {
                strand.pointer_move(x);
                return;
            }
            strand.pointer_leave();
            self.hovered = None;
        }
        if let Some(id) = self.strand_at(point) {
            if self.enter(id, x) {
                self.hovered = Some(id);
            }
        }
    }

    /// Pick up the nearest rope particle under the pointer, topmost strand first.
    fn grab(&mut self, point: Vec2) -> bool {
        self.release_grab();
        for &i in self.draw_order.iter().rev() {
            let strand = &mut self.strands[i];
            let id = strand.id();
            if let Some(particle) = strand.curve_mut().as_rope_mut().and_then(|r| r.grab(point)) {
                log::debug!("menu: grabbed particle {} of strand {}", particle, id.0);
                self.grabbed = Some((id, particle));
                return true;
            }
        }
        false
    }

    fn release_grab(&mut self) {
        if let Some((id, _)) = self.grabbed.take() {
            if let Some(rope) = self.strands[id.index()].curve_mut().as_rope_mut() {
                rope.release();
            }
        }
    }

    /// Allow device tilt to steer the ropes. Hosts call this once the user
    /// has granted motion permission.
    pub fn grant_motion(&mut self) {
        self.motion_granted = true;
        log::info!("menu: motion input enabled");
    }

    pub fn set_tilt(&mut self, gamma: f32) {
        if !self.motion_granted {
            log::debug!("menu: tilt ignored, motion not granted");
            return;
        }
        for strand in &mut self.strands {
            if let Some(rope) = strand.curve_mut().as_rope_mut() {
                rope.set_tilt(gamma);
            }
        }
    }

    /// Rebuild every strand for a new viewport. An open page is dropped and
    /// reported as released.
    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(id) = self.token.holder() {
            self.token.release(id);
            self.pending.push(MenuEvent::Released { strand: id });
        }
        self.viewport = viewport;
        self.strands = build_strands(&self.config, &self.viewport);
        self.draw_order = (0..self.strands.len()).collect();
        self.hovered = None;
        self.grabbed = None;
        log::info!(
            "menu: rebuilt {} strands for {}x{} viewport",
            self.strands.len(),
            viewport.width(),
            viewport.height()
        );
    }

    /// Tessellate every strand's stroke passes in paint order.
    #[cfg(feature = "vectors")]
    pub fn tessellate(&self, vectors: &mut crate::systems::vector::VectorState) {
        vectors.clear();
        for &i in &self.draw_order {
            let strand = &self.strands[i];
            vectors.stroke_passes(strand.chain(), &strand.stroke_passes());
        }
    }
}

fn build_strands(config: &MenuConfig, viewport: &Viewport) -> Vec<Strand> {
    let mut rng = Rng::new(config.seed);
    config
        .strands
        .iter()
        .enumerate()
        .map(|(i, s)| Strand::build(StrandId(i as u32), s, config, viewport, &mut rng.fork()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{CurveKind, StrandConfig};
    use crate::curve::RopeConfig;
    use crate::strand::StrandState;

    const DT: f32 = 1.0 / 60.0;

    fn menu() -> Menu {
        Menu::new(MenuConfig::default(), Viewport::default()).expect("default menu")
    }

    fn run(menu: &mut Menu, frames: usize) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            menu.tick(DT);
            events.extend_from_slice(menu.events());
        }
        events
    }

    #[test]
    fn rejects_invalid_config() {
        let config = MenuConfig::empty().with_strand(StrandConfig::new("", "#fff", 10.0, 0.5));
        assert!(Menu::new(config, Viewport::default()).is_err());
        assert!(Menu::from_json("{ \"strands\": 3 }", Viewport::default()).is_err());
    }

    #[test]
    fn one_tick_per_host_frame() {
        let mut m = menu();
        assert_eq!(m.tick(DT), 1);
        assert_eq!(m.tick(0.0), 0);
        assert_eq!(m.tick(5.0), 10, "catch-up capped");
        assert_eq!(m.frames(), 11);
        assert_eq!(m.glyphs().len(), 30 + 28 + 28 + 30);
    }

    #[test]
    fn host_driven_transition_round_trip() {
        let mut m = menu();
        m.push_input(InputEvent::StrandEnter { strand: 1, x: 0.3 });
        m.push_input(InputEvent::StrandClick { strand: 1 });
        m.tick(DT);
        assert_eq!(
            m.events(),
            &[MenuEvent::Activated {
                strand: StrandId(1),
                target: "archive".into()
            }]
        );
        assert_eq!(m.event_records()[0].kind, MenuEvent::KIND_ACTIVATED);
        assert_eq!(m.token().holder(), Some(StrandId(1)));

        // Other strands are locked out while the page is open.
        m.push_input(InputEvent::StrandEnter { strand: 2, x: 0.5 });
        m.push_input(InputEvent::StrandClick { strand: 2 });
        m.tick(DT);
        assert!(m.events().is_empty());
        assert_eq!(m.strands()[2].state().state(), StrandState::Idle);

        run(&mut m, 120);
        assert_eq!(m.overlay_progress(), 1.0);

        m.push_input(InputEvent::KeyDown { key_code: InputEvent::ESCAPE });
        m.tick(DT);
        assert_eq!(m.events(), &[MenuEvent::Closing { strand: StrandId(1) }]);

        let events = run(&mut m, 200);
        assert_eq!(events, vec![MenuEvent::Released { strand: StrandId(1) }]);
        assert!(!m.token().is_held());
        assert_eq!(m.overlay_progress(), 0.0);

        // Input accepted again.
        assert!(m.enter(StrandId(2), 0.5));
    }

    #[test]
    fn close_with_nothing_open_is_ignored() {
        let mut m = menu();
        m.push_input(InputEvent::Close);
        m.tick(DT);
        assert!(m.events().is_empty());
        assert!(!m.close());
    }

    #[test]
    fn second_close_is_ignored() {
        let mut m = menu();
        assert!(m.activate(StrandId(0)));
        assert!(m.close());
        assert!(!m.close());
    }

    #[test]
    fn unknown_strand_is_ignored() {
        let mut m = menu();
        m.push_input(InputEvent::StrandEnter { strand: 9, x: 0.5 });
        m.push_input(InputEvent::StrandClick { strand: 9 });
        m.tick(DT);
        assert!(m.events().is_empty());
        assert!(!m.token().is_held());
    }

    #[test]
    fn hovered_strand_comes_to_front() {
        let mut m = menu();
        assert_eq!(m.draw_order(), &[0, 1, 2, 3]);
        assert!(m.enter(StrandId(0), 0.5));
        assert_eq!(m.draw_order(), &[1, 2, 3, 0]);
        assert!(m.leave(StrandId(0)));
        assert_eq!(m.draw_order(), &[1, 2, 3, 0]);
    }

    #[test]
    fn engine_hit_testing_hovers_and_clicks() {
        let mut m = menu();
        m.tick(DT);
        let top = *m.draw_order().last().expect("strands");
        let on_curve = m.strands()[top].sample_at(0.5).position;

        m.push_input(InputEvent::PointerMove { x: on_curve.x, y: on_curve.y });
        m.tick(DT);
        assert_eq!(m.hovered(), Some(StrandId(top as u32)));
        assert!(m.strands()[top].state().is_hovered());

        m.push_input(InputEvent::Click { x: on_curve.x, y: on_curve.y });
        m.tick(DT);
        assert!(matches!(m.events(), [MenuEvent::Activated { strand, .. }] if strand.index() == top));

        m.push_input(InputEvent::PointerMove { x: on_curve.x, y: -500.0 });
        m.tick(DT);
        assert!(m.strands()[top].state().is_transitioning());
        assert_eq!(m.hovered(), None);
    }

    #[test]
    fn pointer_leaving_band_unhovers() {
        let mut m = menu();
        m.tick(DT);
        let top = *m.draw_order().last().expect("strands");
        let p = m.strands()[top].sample_at(0.5).position;
        m.push_input(InputEvent::PointerMove { x: p.x, y: p.y });
        m.tick(DT);
        assert!(m.hovered().is_some());
        m.push_input(InputEvent::PointerMove { x: p.x, y: -500.0 });
        m.tick(DT);
        assert_eq!(m.hovered(), None);
        assert!(!m.strands()[top].state().is_hovered());
    }

    fn rope_menu() -> Menu {
        let config = MenuConfig::empty()
            .with_strand(StrandConfig::new("Thread", "#b11226", 2.0, 0.0).with_curve(CurveKind::Rope))
            .with_rope(RopeConfig {
                segments: 20,
                ..RopeConfig::default()
            });
        Menu::new(config, Viewport::new(800.0, 190.0, 1.0).expect("viewport")).expect("rope menu")
    }

    #[test]
    fn pluck_rope_and_let_go() {
        let mut m = rope_menu();
        run(&mut m, 120);

        m.push_input(InputEvent::PointerDown { x: 405.0, y: 112.0 });
        m.tick(DT);
        let (id, particle) = m.grabbed().expect("particle under pointer");
        assert_eq!(id, StrandId(0));
        assert!((9..=11).contains(&particle));

        let target = Vec2::new(460.0, 60.0);
        m.push_input(InputEvent::PointerMove { x: target.x, y: target.y });
        run(&mut m, 30);
        let rope = |m: &Menu| m.strands()[0].curve().as_rope().cloned().expect("rope strand");
        assert_eq!(rope(&m).particles()[particle].position, target);
        assert!(rope(&m).particles()[particle].fixed);

        m.push_input(InputEvent::PointerUp { x: target.x, y: target.y });
        m.tick(DT);
        assert_eq!(m.grabbed(), None);
        let p = rope(&m).particles()[particle];
        assert!(!p.fixed);
        assert!(p.position.distance(target) < 10.0, "resumed from the release point");

        run(&mut m, 300);
        let settled = rope(&m).particles()[particle].position;
        assert!(settled.y > target.y);
        assert!((settled.x - 400.0).abs() < 30.0);
    }

    #[test]
    fn tilt_needs_permission() {
        let mut m = rope_menu();
        m.push_input(InputEvent::Tilt { gamma: 40.0 });
        m.tick(DT);
        let gravity_x = |m: &Menu| m.strands()[0].curve().as_rope().map(|r| r.gravity().x);
        assert_eq!(gravity_x(&m), Some(0.0));

        m.grant_motion();
        m.push_input(InputEvent::Tilt { gamma: 40.0 });
        m.tick(DT);
        assert!((gravity_x(&m).unwrap_or(0.0) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn resize_rebuilds_strands() {
        let mut m = menu();
        assert!(m.activate(StrandId(3)));
        run(&mut m, 10);
        m.resize(Viewport::new(600.0, 900.0, 3.0).expect("viewport"));
        assert!(!m.token().is_held());
        assert_eq!(m.strands().len(), 4);
        assert_eq!(m.viewport().backing_size(), (1200, 1800));

        let end = m.strands()[0].sample_at(1.0).position;
        assert!((end - Vec2::new(600.0, 900.0 * 0.18)).length() < 1e-3);
        m.tick(DT);
        assert_eq!(m.events(), &[MenuEvent::Released { strand: StrandId(3) }]);
        assert_eq!(m.glyphs().len(), 116);
    }

    #[test]
    fn same_seed_same_menu() {
        let a = menu();
        let b = menu();
        for (x, y) in a.strands().iter().zip(b.strands()) {
            assert_eq!(x.svg_path(), y.svg_path());
        }
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn tessellates_all_strands() {
        let mut m = menu();
        m.tick(DT);
        let mut vectors = crate::systems::vector::VectorState::new();
        m.tessellate(&mut vectors);
        assert!(vectors.vertex_count() > 0);
    }
}
