//! Per-strand interaction state: hover, the page transition timeline, and the
//! two low-pass filters (gather blend, stroke width) that follow it.

use serde::{Deserialize, Serialize};

use crate::api::types::StrandId;
use crate::curve::CurveMotion;
use crate::extensions::easing::{approach, Easing};
use crate::extensions::tween::Tween;

/// Filter rates (per frame) and transition timings (seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTuning {
    pub gather_rate: f32,
    pub stroke_rate: f32,
    /// Extra stroke width at full gather, as a fraction of the base.
    pub swell: f32,
    /// Stroke width during a transition, as a fraction of the base.
    pub thin: f32,
    pub straighten: f32,
    pub overlay_delay: f32,
    pub overlay_in: f32,
    pub content_delay: f32,
    pub content_in: f32,
    pub content_out: f32,
    pub overlay_out_delay: f32,
    pub overlay_out: f32,
    pub release: f32,
}

impl Default for StateTuning {
    fn default() -> Self {
        Self {
            gather_rate: 0.09,
            stroke_rate: 0.1,
            swell: 0.12,
            thin: 0.25,
            straighten: 0.5,
            overlay_delay: 0.2,
            overlay_in: 1.2,
            content_delay: 0.8,
            content_in: 0.8,
            content_out: 0.4,
            overlay_out_delay: 0.2,
            overlay_out: 1.0,
            release: 0.6,
        }
    }
}

impl StateTuning {
    fn straighten_tween(&self) -> Tween {
        Tween::new(self.straighten, Easing::BackOut)
    }

    fn overlay_in_tween(&self) -> Tween {
        Tween::new(self.overlay_in, Easing::QuartInOut).with_delay(self.overlay_delay)
    }

    fn content_in_tween(&self) -> Tween {
        Tween::new(self.content_in, Easing::CubicOut).with_delay(self.content_delay)
    }

    fn content_out_tween(&self) -> Tween {
        Tween::new(self.content_out, Easing::QuadIn)
    }

    fn overlay_out_tween(&self) -> Tween {
        Tween::new(self.overlay_out, Easing::QuartInOut).with_delay(self.overlay_out_delay)
    }

    fn release_tween(&self) -> Tween {
        Tween::new(self.release, Easing::QuadOut)
    }

    fn opening_end(&self) -> f32 {
        self.straighten_tween()
            .end_time()
            .max(self.overlay_in_tween().end_time())
            .max(self.content_in_tween().end_time())
    }

    fn closing_end(&self) -> f32 {
        self.content_out_tween()
            .end_time()
            .max(self.overlay_out_tween().end_time())
    }
}

/// Where a transitioning strand is on its timeline. `elapsed` is seconds
/// since the phase began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    Opening { elapsed: f32 },
    Open,
    /// `overlay_from` and `content_from` are the reveal values when the
    /// close began, so an early close slides out from where the page was.
    Closing {
        elapsed: f32,
        overlay_from: f32,
        content_from: f32,
    },
    /// Overlay gone; the curve eases back to its wobble pose.
    Releasing { elapsed: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrandState {
    Idle,
    Hovered,
    Transitioning(TransitionPhase),
}

impl StrandState {
    pub fn is_transitioning(&self) -> bool {
        matches!(self, StrandState::Transitioning(_))
    }
}

/// What the strand must do with its curve this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDirective {
    pub motion: CurveMotion,
    /// Snapshot the curve pose before applying `motion`.
    pub capture_pose: bool,
    /// The release animation finished this frame; the strand is idle again.
    pub released: bool,
}

/// The single "one page open at a time" lock, owned by the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionToken {
    holder: Option<StrandId>,
}

impl TransitionToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the token. Fails if anyone (including `id`) already holds it.
    pub fn try_acquire(&mut self, id: StrandId) -> bool {
        if self.holder.is_some() {
            return false;
        }
        self.holder = Some(id);
        true
    }

    /// Give the token back. Only the holder can release it.
    pub fn release(&mut self, id: StrandId) -> bool {
        if self.holder == Some(id) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<StrandId> {
        self.holder
    }

    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct StrandStateMachine {
    state: StrandState,
    gather_blend: f32,
    base_stroke_width: f32,
    rendered_stroke_width: f32,
    tuning: StateTuning,
}

impl StrandStateMachine {
    pub fn new(base_stroke_width: f32, tuning: StateTuning) -> Self {
        Self {
            state: StrandState::Idle,
            gather_blend: 0.0,
            base_stroke_width,
            rendered_stroke_width: base_stroke_width,
            tuning,
        }
    }

    pub fn state(&self) -> StrandState {
        self.state
    }

    pub fn gather_blend(&self) -> f32 {
        self.gather_blend
    }

    pub fn base_stroke_width(&self) -> f32 {
        self.base_stroke_width
    }

    pub fn rendered_stroke_width(&self) -> f32 {
        self.rendered_stroke_width
    }

    pub fn tuning(&self) -> &StateTuning {
        &self.tuning
    }

    pub fn is_hovered(&self) -> bool {
        self.state == StrandState::Hovered
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// Idle -> Hovered. The menu refuses this while any strand holds the token.
    pub fn pointer_enter(&mut self) -> bool {
        if self.state != StrandState::Idle {
            return false;
        }
        self.state = StrandState::Hovered;
        true
    }

    /// Hovered -> Idle.
    pub fn pointer_leave(&mut self) -> bool {
        if self.state != StrandState::Hovered {
            return false;
        }
        self.state = StrandState::Idle;
        true
    }

    /// Idle|Hovered -> Opening. The caller must already hold the token and
    /// must capture the curve pose.
    pub fn activate(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.state = StrandState::Transitioning(TransitionPhase::Opening { elapsed: 0.0 });
        true
    }

    /// Opening|Open -> Closing.
    pub fn close(&mut self) -> bool {
        match self.state {
            StrandState::Transitioning(TransitionPhase::Opening { .. })
            | StrandState::Transitioning(TransitionPhase::Open) => {
                self.state = StrandState::Transitioning(TransitionPhase::Closing {
                    elapsed: 0.0,
                    overlay_from: self.overlay_progress(),
                    content_from: self.content_progress(),
                });
                true
            }
            _ => false,
        }
    }

    /// Advance the timeline by `dt` seconds and step both filters.
    pub fn tick(&mut self, dt: f32) -> FrameDirective {
        let mut directive = FrameDirective {
            motion: CurveMotion::Wobble,
            capture_pose: false,
            released: false,
        };

        self.state = match self.state {
            StrandState::Idle => StrandState::Idle,
            StrandState::Hovered => {
                directive.motion = CurveMotion::Hold;
                StrandState::Hovered
            }
            StrandState::Transitioning(phase) => {
                let next = self.advance_phase(phase, dt, &mut directive);
                match next {
                    Some(phase) => StrandState::Transitioning(phase),
                    None => {
                        directive.released = true;
                        StrandState::Idle
                    }
                }
            }
        };

        self.smooth();
        directive
    }

    /// `None` once the release animation has finished.
    fn advance_phase(
        &self,
        phase: TransitionPhase,
        dt: f32,
        directive: &mut FrameDirective,
    ) -> Option<TransitionPhase> {
        let t = &self.tuning;
        match phase {
            TransitionPhase::Opening { elapsed } => {
                let elapsed = elapsed + dt;
                directive.motion = CurveMotion::Straighten(t.straighten_tween().value_at(elapsed));
                if elapsed >= t.opening_end() {
                    Some(TransitionPhase::Open)
                } else {
                    Some(TransitionPhase::Opening { elapsed })
                }
            }
            TransitionPhase::Open => {
                directive.motion = CurveMotion::Hold;
                Some(TransitionPhase::Open)
            }
            TransitionPhase::Closing {
                elapsed,
                overlay_from,
                content_from,
            } => {
                let elapsed = elapsed + dt;
                directive.motion = CurveMotion::Hold;
                if elapsed >= t.closing_end() {
                    Some(TransitionPhase::Releasing { elapsed: 0.0 })
                } else {
                    Some(TransitionPhase::Closing {
                        elapsed,
                        overlay_from,
                        content_from,
                    })
                }
            }
            TransitionPhase::Releasing { elapsed } => {
                if elapsed == 0.0 {
                    directive.capture_pose = true;
                }
                let elapsed = elapsed + dt;
                let tween = t.release_tween();
                directive.motion = CurveMotion::Release(tween.value_at(elapsed));
                if tween.is_complete(elapsed) {
                    None
                } else {
                    Some(TransitionPhase::Releasing { elapsed })
                }
            }
        }
    }

    fn smooth(&mut self) {
        let t = &self.tuning;
        let goal = match self.state {
            StrandState::Idle => 0.0,
            StrandState::Hovered | StrandState::Transitioning(_) => 1.0,
        };
        self.gather_blend = approach(self.gather_blend, goal, t.gather_rate).clamp(0.0, 1.0);

        let thinned = matches!(
            self.state,
            StrandState::Transitioning(
                TransitionPhase::Opening { .. } | TransitionPhase::Open | TransitionPhase::Closing { .. }
            )
        );
        let target = if thinned {
            self.base_stroke_width * t.thin
        } else {
            self.base_stroke_width * (1.0 + self.gather_blend * t.swell)
        };
        self.rendered_stroke_width = approach(self.rendered_stroke_width, target, t.stroke_rate);
    }

    /// Overlay slide position for the host, 0 hidden to 1 covering.
    pub fn overlay_progress(&self) -> f32 {
        let t = &self.tuning;
        match self.state {
            StrandState::Transitioning(TransitionPhase::Opening { elapsed }) => {
                t.overlay_in_tween().value_at(elapsed)
            }
            StrandState::Transitioning(TransitionPhase::Open) => 1.0,
            StrandState::Transitioning(TransitionPhase::Closing {
                elapsed,
                overlay_from,
                ..
            }) => overlay_from * (1.0 - t.overlay_out_tween().value_at(elapsed)),
            _ => 0.0,
        }
    }

    /// Content panel reveal for the host, 0 hidden to 1 shown.
    pub fn content_progress(&self) -> f32 {
        let t = &self.tuning;
        match self.state {
            StrandState::Transitioning(TransitionPhase::Opening { elapsed }) => {
                t.content_in_tween().value_at(elapsed)
            }
            StrandState::Transitioning(TransitionPhase::Open) => 1.0,
            StrandState::Transitioning(TransitionPhase::Closing {
                elapsed,
                content_from,
                ..
            }) => content_from * (1.0 - t.content_out_tween().value_at(elapsed)),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn machine() -> StrandStateMachine {
        StrandStateMachine::new(50.0, StateTuning::default())
    }

    fn run_until_idle(m: &mut StrandStateMachine) -> usize {
        for frame in 1..=600 {
            if m.tick(DT).released {
                return frame;
            }
        }
        panic!("transition never finished: {:?}", m.state());
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut m = machine();
        assert!(m.pointer_enter());
        assert!(m.is_hovered());
        assert!(!m.pointer_enter(), "already hovered");
        assert!(m.pointer_leave());
        assert_eq!(m.state(), StrandState::Idle);
        assert!(!m.pointer_leave());
    }

    #[test]
    fn blend_rises_monotonically_while_hovered() {
        let mut m = machine();
        m.pointer_enter();
        let mut last = m.gather_blend();
        for _ in 0..60 {
            m.tick(DT);
            assert!(m.gather_blend() >= last);
            last = m.gather_blend();
        }
        assert!(last > 0.99, "blend after 60 frames: {}", last);
    }

    #[test]
    fn blend_falls_after_leave() {
        let mut m = machine();
        m.pointer_enter();
        for _ in 0..60 {
            m.tick(DT);
        }
        m.pointer_leave();
        let mut last = m.gather_blend();
        for _ in 0..60 {
            m.tick(DT);
            assert!(m.gather_blend() <= last);
            last = m.gather_blend();
        }
        assert!(last < 0.01);
    }

    #[test]
    fn stroke_swells_with_blend() {
        let mut m = machine();
        m.pointer_enter();
        for _ in 0..300 {
            m.tick(DT);
        }
        assert!((m.rendered_stroke_width() - 50.0 * 1.12).abs() < 0.01);
    }

    #[test]
    fn hovered_strand_holds_its_curve() {
        let mut m = machine();
        assert_eq!(m.tick(DT).motion, CurveMotion::Wobble);
        m.pointer_enter();
        assert_eq!(m.tick(DT).motion, CurveMotion::Hold);
    }

    #[test]
    fn transition_thins_then_restores_stroke() {
        let mut m = machine();
        m.pointer_enter();
        for _ in 0..30 {
            m.tick(DT);
        }
        assert!(m.activate());
        assert!(!m.pointer_leave(), "leave ignored mid-transition");

        let mut last = m.rendered_stroke_width();
        let mut opened_at = None;
        for frame in 0..120 {
            m.tick(DT);
            let w = m.rendered_stroke_width();
            assert!(w < last, "frame {}: {} !< {}", frame, w, last);
            assert!(w > 50.0 * 0.25);
            last = w;
            if opened_at.is_none() && m.state() == StrandState::Transitioning(TransitionPhase::Open) {
                opened_at = Some(frame);
            }
        }
        assert!(opened_at.is_some(), "opening should finish within 2 s");
        assert_eq!(m.overlay_progress(), 1.0);
        assert_eq!(m.content_progress(), 1.0);

        assert!(m.close());
        run_until_idle(&mut m);
        assert_eq!(m.state(), StrandState::Idle);
        for _ in 0..300 {
            m.tick(DT);
        }
        let w = m.rendered_stroke_width();
        assert!((w - 50.0).abs() < 0.5, "stroke back to base: {}", w);
    }

    #[test]
    fn straighten_then_release_directives() {
        let mut m = machine();
        m.activate();
        let first = m.tick(DT);
        match first.motion {
            CurveMotion::Straighten(p) => assert!(p > 0.0 && p < 1.0),
            other => panic!("expected straighten, got {:?}", other),
        }
        for _ in 0..200 {
            m.tick(DT);
        }
        assert_eq!(m.tick(DT).motion, CurveMotion::Hold);

        m.close();
        let mut captured = 0;
        let mut last_release = 0.0;
        loop {
            let d = m.tick(DT);
            if d.capture_pose {
                captured += 1;
            }
            if let CurveMotion::Release(p) = d.motion {
                assert!(p >= last_release);
                last_release = p;
            }
            if d.released {
                break;
            }
        }
        assert_eq!(captured, 1);
        assert!((last_release - 1.0).abs() < 1e-6);
    }

    #[test]
    fn close_rejected_unless_open() {
        let mut m = machine();
        assert!(!m.close());
        m.pointer_enter();
        assert!(!m.close());
        m.activate();
        assert!(!m.activate(), "already transitioning");
        assert!(m.close());
        assert!(!m.close(), "already closing");
    }

    #[test]
    fn close_during_opening_still_completes() {
        let mut m = machine();
        m.activate();
        for _ in 0..10 {
            m.tick(DT);
        }
        assert!(m.close());
        let frames = run_until_idle(&mut m);
        // Closing 1.2 s plus release 0.6 s.
        assert!((105..=112).contains(&frames), "took {} frames", frames);
    }

    #[test]
    fn early_close_slides_out_from_current_reveal() {
        let mut m = machine();
        m.activate();
        for _ in 0..18 {
            m.tick(DT);
        }
        let overlay = m.overlay_progress();
        let content = m.content_progress();
        assert!(overlay < 0.01 && content == 0.0);

        assert!(m.close());
        assert_eq!(m.overlay_progress(), overlay, "close itself moves nothing");
        let mut last = (overlay, content);
        for frame in 0..90 {
            m.tick(DT);
            let now = (m.overlay_progress(), m.content_progress());
            assert!(now.0 <= last.0, "frame {}: overlay {} rose from {}", frame, now.0, last.0);
            assert!(now.1 <= last.1, "frame {}: content {} rose from {}", frame, now.1, last.1);
            last = now;
        }
        assert_eq!(last, (0.0, 0.0));
    }

    #[test]
    fn close_mid_opening_starts_from_partial_overlay() {
        let mut m = machine();
        m.activate();
        for _ in 0..60 {
            m.tick(DT);
        }
        let overlay = m.overlay_progress();
        assert!(overlay > 0.3 && overlay < 1.0);
        m.close();
        m.tick(DT);
        assert!(m.overlay_progress() <= overlay, "{} jumped past {}", m.overlay_progress(), overlay);
        assert!(m.overlay_progress() > overlay - 0.05);
    }

    #[test]
    fn reveal_progress_follows_timeline() {
        let mut m = machine();
        m.activate();
        for _ in 0..6 {
            m.tick(DT);
        }
        // 0.1 s in: overlay not started, content not started.
        assert_eq!(m.overlay_progress(), 0.0);
        assert_eq!(m.content_progress(), 0.0);
        for _ in 0..54 {
            m.tick(DT);
        }
        // 1.0 s in: overlay moving, content just started.
        let overlay = m.overlay_progress();
        assert!(overlay > 0.3 && overlay < 1.0, "overlay {}", overlay);
        assert!(m.content_progress() > 0.0);
        for _ in 0..120 {
            m.tick(DT);
        }
        m.close();
        m.tick(DT);
        assert!(m.overlay_progress() > 0.99);
        assert!(m.content_progress() < 1.0);
        for _ in 0..80 {
            m.tick(DT);
        }
        assert_eq!(m.overlay_progress(), 0.0);
        assert_eq!(m.content_progress(), 0.0);
    }

    #[test]
    fn token_admits_one_holder() {
        let mut token = TransitionToken::new();
        assert!(token.try_acquire(StrandId(1)));
        assert!(!token.try_acquire(StrandId(2)));
        assert!(!token.try_acquire(StrandId(1)));
        assert!(!token.release(StrandId(2)));
        assert_eq!(token.holder(), Some(StrandId(1)));
        assert!(token.release(StrandId(1)));
        assert!(!token.is_held());
    }
}
