// extensions/easing.rs
//
// Easing curves for timed tweens, plus the per-frame low-pass helpers the
// strands use for everything that isn't timed.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start (content fading out).
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    /// Very strong slow start and end (overlay slides).
    QuartInOut,
    /// Overshoot by 1.5 then settle (strand straightening).
    BackOut,
}

impl Easing {
    /// Overshoot used by `BackOut`.
    const BACK_OVERSHOOT: f32 = 1.5;

    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (BackOut overshoots).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::BackOut => {
                let c1 = Self::BACK_OVERSHOOT;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// One step of a first-order low-pass filter: move `current` a fixed
/// fraction of the way to `goal`.
#[inline]
pub fn approach(current: f32, goal: f32, rate: f32) -> f32 {
    current + (goal - current) * rate
}

/// Signed difference `to - from` in degrees, wrapped into [-180, 180].
#[inline]
pub fn shortest_angle_delta_deg(from: f32, to: f32) -> f32 {
    let mut d = (to - from) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}
